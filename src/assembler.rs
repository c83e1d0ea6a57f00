//! Assembles the whole stylesheet: output settings, namespace declarations,
//! one compiled template per `-t` block, the multi-template dispatcher, root
//! wrapping, the input-file parameter and the value-of helper template.

use crate::cli::SelectConfig;
use crate::compiler::{self, CompileInfo, VALUE_OF_TEMPLATE};
use crate::error::UsageError;
use crate::grammar;
use crate::namespaces;
use crate::tree::{NodeId, ProgramTree};

const XSLT_NS: &str = "http://www.w3.org/1999/XSL/Transform";

/// A fully assembled program, plus where the trailing input files begin in
/// the token slice handed to [`assemble`].
#[derive(Debug)]
pub struct Assembly {
    pub tree: ProgramTree,
    pub root: NodeId,
    pub needs_input_param: bool,
    pub files_start: usize,
}

/// Builds the program tree from the token slice beginning at the first
/// template marker.
pub fn assemble(config: &SelectConfig, tokens: &[String]) -> Result<Assembly, UsageError> {
    if !tokens.iter().any(|t| grammar::is_template_marker(t)) {
        return Err(UsageError::NoTemplates);
    }

    let mut tree = ProgramTree::new();
    let root = tree.element("xsl:stylesheet");
    tree.set_attr(root, "version", "1.0");
    tree.set_attr(root, "xmlns:xsl", XSLT_NS);
    for (prefix, uri) in &config.namespaces {
        tree.set_attr(root, &format!("xmlns:{prefix}"), uri);
    }

    let output = tree.element("xsl:output");
    tree.set_attr(output, "omit-xml-declaration", if config.xml_decl { "no" } else { "yes" });
    tree.set_attr(output, "indent", if config.indent { "yes" } else { "no" });
    if let Some(encoding) = &config.encoding {
        tree.set_attr(output, "encoding", encoding);
    }
    if config.text {
        tree.set_attr(output, "method", "text");
    }
    tree.append(root, output);

    let mut info = CompileInfo::default();
    let mut templates = Vec::new();
    let mut idx = 0;
    loop {
        let template = tree.element("xsl:template");
        let outcome =
            compiler::compile_template(&mut tree, root, template, tokens, idx, &mut info)?;
        templates.push(template);
        idx = outcome.next;
        if outcome.last {
            break;
        }
    }
    log::debug!("assembling stylesheet from {} template(s)", templates.len());

    if info.needs_input_param {
        let param = tree.element("xsl:param");
        tree.set_attr(param, "name", "inputFile");
        tree.set_attr(param, "select", "'-'");
        tree.append(root, param);
    }

    // The single entry point: the sole template, or a dispatcher calling the
    // named sub-templates in declaration order.
    let entry = if templates.len() == 1 {
        let template = templates[0];
        tree.set_attr(template, "match", "/");
        tree.append(root, template);
        template
    } else {
        for (n, &template) in templates.iter().enumerate() {
            tree.set_attr(template, "name", &format!("t{}", n + 1));
            tree.append(root, template);
        }
        let dispatcher = tree.element("xsl:template");
        tree.set_attr(dispatcher, "match", "/");
        for n in 1..=templates.len() {
            let call = tree.element("xsl:call-template");
            tree.set_attr(call, "name", &format!("t{n}"));
            tree.append(dispatcher, call);
        }
        tree.append(root, dispatcher);
        dispatcher
    };

    if config.root_wrap && !config.text {
        wrap_in_root_element(&mut tree, root, entry);
    }

    if info.needs_value_of_helper {
        append_value_of_helper(&mut tree, root);
    }

    let prefixes = namespaces::extension_prefixes(&tree, root);
    if !prefixes.is_empty() {
        let list = prefixes.join(" ");
        tree.set_attr(root, "extension-element-prefixes", &list);
        tree.set_attr(root, "exclude-result-prefixes", &list);
    }

    Ok(Assembly {
        tree,
        root,
        needs_input_param: info.needs_input_param,
        files_start: idx,
    })
}

/// Turns the entry template into a literal wrapper element nested under a
/// fresh `match="/"` template, so the whole output gets one document root.
fn wrap_in_root_element(tree: &mut ProgramTree, root: NodeId, entry: NodeId) {
    tree.detach(entry);
    tree.rename(entry, "xml-select");
    tree.remove_attr(entry, "match");
    tree.remove_attr(entry, "name");
    let wrapper = tree.element("xsl:template");
    tree.set_attr(wrapper, "match", "/");
    tree.append(wrapper, entry);
    tree.append(root, wrapper);
}

/// The helper behind `--value-of`: emit the first item of the selection, then
/// a newline before each further item of the converted node-set.
fn append_value_of_helper(tree: &mut ProgramTree, root: NodeId) {
    let helper = tree.element("xsl:template");
    tree.set_attr(helper, "name", VALUE_OF_TEMPLATE);

    let param = tree.element("xsl:param");
    tree.set_attr(param, "name", "select");
    tree.append(helper, param);

    let first = tree.element("xsl:value-of");
    tree.set_attr(first, "select", "$select");
    tree.append(helper, first);

    let rest = tree.element("xsl:for-each");
    let select = "exslt:node-set($select)[position()>1]";
    tree.set_attr(rest, "select", select);
    namespaces::declare_known_prefixes(tree, root, select);
    let newline = tree.element("xsl:value-of");
    tree.set_attr(newline, "select", "'\n'");
    tree.append(rest, newline);
    let item = tree.element("xsl:value-of");
    tree.set_attr(item, "select", ".");
    tree.append(rest, item);
    tree.append(helper, rest);

    tree.append(root, helper);
}
