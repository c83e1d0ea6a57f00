//! End-to-end compilation tests: command tokens in, serialized stylesheet
//! out. Assertions check the generated XSLT fragments rather than the whole
//! document, so attribute ordering on the root stays a non-issue.

use xmlsel::assembler;
use xmlsel::cli::SelectConfig;
use xmlsel::error::UsageError;
use xmlsel::output;

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn compile(config: &SelectConfig, list: &[&str]) -> String {
    let assembly = assembler::assemble(config, &tokens(list)).unwrap();
    output::to_xml(&assembly.tree, assembly.root, false).unwrap()
}

fn compile_default(list: &[&str]) -> String {
    compile(&SelectConfig::default(), list)
}

fn compile_err(list: &[&str]) -> UsageError {
    assembler::assemble(&SelectConfig::default(), &tokens(list)).unwrap_err()
}

#[test]
fn match_and_value_of_produce_for_each_and_helper_call() {
    let xml = compile_default(&["-t", "-m", "book", "-v", "title"]);
    assert!(xml.contains(
        "<xsl:for-each select=\"book\">\
         <xsl:call-template name=\"value-of-template\">\
         <xsl:with-param name=\"select\" select=\"title\"/>\
         </xsl:call-template></xsl:for-each>"
    ));
}

#[test]
fn value_of_pulls_in_the_helper_template_and_exslt() {
    let xml = compile_default(&["-t", "-v", "title"]);
    assert!(xml.contains("<xsl:template name=\"value-of-template\">"));
    assert!(xml.contains("<xsl:param name=\"select\"/>"));
    assert!(xml.contains("<xsl:value-of select=\"$select\"/>"));
    assert!(xml.contains(
        "<xsl:for-each select=\"exslt:node-set($select)[position()&gt;1]\">"
    ));
    assert!(xml.contains("xmlns:exslt=\"http://exslt.org/common\""));
    assert!(xml.contains("extension-element-prefixes=\"exslt\""));
    assert!(xml.contains("exclude-result-prefixes=\"exslt\""));
}

#[test]
fn copy_of_needs_no_helper() {
    let xml = compile_default(&["-t", "-c", "book"]);
    assert!(xml.contains("<xsl:copy-of select=\"book\"/>"));
    assert!(!xml.contains("value-of-template"));
    assert!(!xml.contains("exslt"));
}

#[test]
fn single_template_matches_the_document_root() {
    let xml = compile_default(&["-t", "-c", "."]);
    assert!(xml.contains("<xsl:template match=\"/\"><xsl:copy-of select=\".\"/></xsl:template>"));
}

#[test]
fn multiple_templates_are_named_and_dispatched_in_order() {
    let xml = compile_default(&["-t", "-c", "a", "-t", "-c", "b"]);
    assert!(xml.contains("<xsl:template name=\"t1\"><xsl:copy-of select=\"a\"/></xsl:template>"));
    assert!(xml.contains("<xsl:template name=\"t2\"><xsl:copy-of select=\"b\"/></xsl:template>"));
    assert!(xml.contains(
        "<xsl:template match=\"/\">\
         <xsl:call-template name=\"t1\"/>\
         <xsl:call-template name=\"t2\"/>\
         </xsl:template>"
    ));
}

#[test]
fn sort_follows_its_match_with_decoded_attributes() {
    let xml = compile_default(&["-t", "-m", "items/item", "-s", "D:N:U", "@id", "-c", "."]);
    assert!(xml.contains(
        "<xsl:for-each select=\"items/item\">\
         <xsl:sort order=\"descending\" data-type=\"number\" \
         case-order=\"upper-first\" select=\"@id\"/>"
    ));
}

#[test]
fn unrecognized_sort_letters_omit_the_attributes() {
    let xml = compile_default(&["-t", "-m", "item", "-s", "X:Y:Z", "name", "-c", "."]);
    assert!(xml.contains("<xsl:sort select=\"name\"/>"));
}

#[test]
fn secondary_sort_keys_stack() {
    let xml = compile_default(&[
        "-t", "-m", "item", "-s", "A:T:U", "surname", "-s", "A:T:U", "forename", "-c", ".",
    ]);
    assert!(xml.contains(
        "<xsl:sort order=\"ascending\" data-type=\"text\" \
         case-order=\"upper-first\" select=\"surname\"/>\
         <xsl:sort order=\"ascending\" data-type=\"text\" \
         case-order=\"upper-first\" select=\"forename\"/>"
    ));
}

#[test]
fn newline_emits_a_character_reference_literal() {
    let xml = compile_default(&["-t", "-o", "hi", "-n"]);
    assert!(xml.contains("hi<xsl:value-of select=\"'&#10;'\"/>"));
}

#[test]
fn input_name_wires_the_input_file_parameter() {
    let assembly =
        assembler::assemble(&SelectConfig::default(), &tokens(&["-t", "-f", "-n"])).unwrap();
    assert!(assembly.needs_input_param);
    let xml = output::to_xml(&assembly.tree, assembly.root, false).unwrap();
    assert!(xml.contains("<xsl:param name=\"inputFile\" select=\"'-'\"/>"));
    assert!(xml.contains("<xsl:value-of select=\"$inputFile\"/>"));
}

#[test]
fn element_and_attribute_nest_until_broken() {
    let xml = compile_default(&[
        "-t", "-e", "entry", "-a", "id", "-v", "@id", "-b", "-v", "name", "-b", "-o", "done",
    ]);
    assert!(xml.contains(
        "<xsl:element name=\"entry\"><xsl:attribute name=\"id\">"
    ));
    // The first break leaves both the attribute and the element.
    assert!(xml.contains("</xsl:attribute></xsl:element>"));
    assert!(xml.contains("</xsl:element><xsl:call-template"));
    assert!(xml.ends_with("done</xsl:template></xsl:stylesheet>") || xml.contains("done</xsl:template>"));
}

#[test]
fn if_elif_else_build_one_choose() {
    let xml = compile_default(&[
        "-t", "-i", "a", "-o", "A", "--elif", "b", "-o", "B", "--else", "-o", "C", "-b", "-o",
        "after",
    ]);
    assert!(xml.contains(
        "<xsl:choose>\
         <xsl:when test=\"a\">A</xsl:when>\
         <xsl:when test=\"b\">B</xsl:when>\
         <xsl:otherwise>C</xsl:otherwise>\
         </xsl:choose>after"
    ));
}

#[test]
fn break_leaves_the_enclosing_match_as_well() {
    let xml = compile_default(&["-t", "-m", "x", "-i", "a", "-o", "A", "-b", "-o", "out"]);
    assert!(xml.contains("</xsl:choose></xsl:for-each>out"));
}

#[test]
fn else_without_if_is_rejected() {
    assert!(matches!(
        compile_err(&["-t", "--else", "-o", "x"]),
        UsageError::ElseWithoutIf(_)
    ));
    assert!(matches!(
        compile_err(&["-t", "--elif", "a", "-o", "x"]),
        UsageError::ElseWithoutIf(_)
    ));
}

#[test]
fn sort_without_match_is_rejected() {
    assert!(matches!(
        compile_err(&["-t", "-s", "A:N:U", "x"]),
        UsageError::SortWithoutMatch
    ));
    // Any non-sort option between the match and the sort breaks the chain.
    assert!(matches!(
        compile_err(&["-t", "-m", "x", "-c", ".", "-s", "A:N:U", "y"]),
        UsageError::SortWithoutMatch
    ));
}

#[test]
fn malformed_sort_triplet_is_rejected() {
    assert!(matches!(
        compile_err(&["-t", "-m", "x", "-s", "ascending", "y"]),
        UsageError::InvalidSortSpec(_)
    ));
}

#[test]
fn empty_template_is_rejected() {
    assert!(matches!(compile_err(&["-t"]), UsageError::EmptyTemplate));
    assert!(matches!(
        compile_err(&["-t", "-t", "-c", "."]),
        UsageError::EmptyTemplate
    ));
}

#[test]
fn token_stream_without_templates_is_rejected() {
    assert!(matches!(compile_err(&["file.xml"]), UsageError::NoTemplates));
}

#[test]
fn unknown_template_option_is_rejected() {
    assert!(matches!(
        compile_err(&["-t", "-Z"]),
        UsageError::UnknownOption(_)
    ));
}

#[test]
fn missing_option_argument_is_rejected() {
    assert!(matches!(
        compile_err(&["-t", "-m"]),
        UsageError::MissingArgument(_)
    ));
}

#[test]
fn var_with_assignment_stays_at_the_current_level() {
    let xml = compile_default(&["-t", "--var", "n=count(//item)", "-v", "$n"]);
    assert!(xml.contains("<xsl:variable name=\"n\" select=\"count(//item)\"/>"));
}

#[test]
fn var_body_form_nests_until_broken() {
    let xml = compile_default(&["-t", "--var", "x", "-o", "hi", "-b", "-v", "$x"]);
    assert!(xml.contains("<xsl:variable name=\"x\">hi</xsl:variable><xsl:call-template"));
}

#[test]
fn known_prefixes_in_expressions_are_auto_declared() {
    let xml = compile_default(&["-t", "-v", "math:sqrt(2)"]);
    assert!(xml.contains("xmlns:math=\"http://exslt.org/math\""));
    // math is spotted during compilation, exslt when the helper lands.
    assert!(xml.contains("extension-element-prefixes=\"math exslt\""));
}

#[test]
fn user_namespaces_land_on_the_stylesheet_root() {
    let config = SelectConfig {
        namespaces: vec![("x".to_string(), "urn:example".to_string())],
        ..Default::default()
    };
    let xml = compile(&config, &["-t", "-c", "x:item"]);
    assert!(xml.contains("xmlns:x=\"urn:example\""));
    assert!(!xml.contains("extension-element-prefixes"));
}

#[test]
fn default_output_settings_omit_the_declaration() {
    let xml = compile_default(&["-t", "-c", "."]);
    assert!(xml.contains("<xsl:output omit-xml-declaration=\"yes\" indent=\"no\"/>"));
}

#[test]
fn output_flags_shape_the_output_element() {
    let config = SelectConfig {
        xml_decl: true,
        indent: true,
        encoding: Some("iso-8859-1".to_string()),
        text: true,
        ..Default::default()
    };
    let xml = compile(&config, &["-t", "-c", "."]);
    assert!(xml.contains(
        "<xsl:output omit-xml-declaration=\"no\" indent=\"yes\" \
         encoding=\"iso-8859-1\" method=\"text\"/>"
    ));
}

#[test]
fn root_wrap_nests_the_entry_template_in_a_literal_element() {
    let config = SelectConfig { root_wrap: true, ..Default::default() };
    let xml = compile(&config, &["-t", "-c", "."]);
    assert!(xml.contains(
        "<xsl:template match=\"/\"><xml-select><xsl:copy-of select=\".\"/>\
         </xml-select></xsl:template>"
    ));
}

#[test]
fn root_wrap_covers_the_dispatcher_of_multiple_templates() {
    let config = SelectConfig { root_wrap: true, ..Default::default() };
    let xml = compile(&config, &["-t", "-c", "a", "-t", "-c", "b"]);
    assert!(xml.contains(
        "<xsl:template match=\"/\"><xml-select>\
         <xsl:call-template name=\"t1\"/>\
         <xsl:call-template name=\"t2\"/>\
         </xml-select></xsl:template>"
    ));
}

#[test]
fn text_mode_suppresses_root_wrapping() {
    let config = SelectConfig { root_wrap: true, text: true, ..Default::default() };
    let xml = compile(&config, &["-t", "-c", "."]);
    assert!(!xml.contains("xml-select"));
}

#[test]
fn trailing_file_names_are_left_for_the_run_loop() {
    let assembly = assembler::assemble(
        &SelectConfig::default(),
        &tokens(&["-t", "-c", ".", "a.xml", "-", "b.xml"]),
    )
    .unwrap();
    assert_eq!(assembly.files_start, 3);
}
