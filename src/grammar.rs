//! The command grammar: a fixed registry of option descriptors. Each template
//! option maps a CLI token onto one stylesheet construct, an argument recipe
//! and a nesting effect, which is all the compiler needs to drive a template.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptId {
    Template,
    CopyOf,
    ValueOf,
    Output,
    Newline,
    InputName,
    Match,
    If,
    Elif,
    Else,
    Elem,
    Attr,
    Break,
    Sort,
    Var,
}

/// How one option argument is encoded into the program tree.
/// `NewlineLiteral` and `InputFileRef` consume no CLI token; the rest consume
/// exactly one.
#[derive(Debug, Clone, Copy)]
pub enum ArgKind {
    /// Copy the token into the named attribute.
    Attr(&'static str),
    /// Copy the token into the named attribute and scan it for known
    /// namespace prefixes.
    XpathAttr(&'static str),
    /// Append the token as text content.
    Text,
    /// Emit the fixed newline-literal select expression.
    NewlineLiteral,
    /// Reference the stylesheet-level input-file parameter.
    InputFileRef,
    /// Decode an `<order>:<data-type>:<case-order>` triplet into sort
    /// attributes.
    SortTriplet,
    /// Split `name=select`, or use the whole token as a name.
    VarAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestEffect {
    /// Ascend while the cursor node carries an ascent mark.
    Ascend,
    Stay,
    /// Descend into the freshly created child.
    Descend,
}

#[derive(Debug)]
pub struct OptionSpec {
    pub id: OptId,
    pub short: Option<&'static str>,
    pub long: &'static str,
    /// Element the option creates; `None` for options that only navigate or
    /// append text.
    pub element: Option<&'static str>,
    pub args: &'static [ArgKind],
    pub nest: NestEffect,
}

pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        id: OptId::Template,
        short: Some("-t"),
        long: "--template",
        element: None,
        args: &[],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::CopyOf,
        short: Some("-c"),
        long: "--copy-of",
        element: Some("xsl:copy-of"),
        args: &[ArgKind::XpathAttr("select")],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::ValueOf,
        short: Some("-v"),
        long: "--value-of",
        element: Some("xsl:call-template"),
        args: &[ArgKind::XpathAttr("select")],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::Output,
        short: Some("-o"),
        long: "--output",
        element: None,
        args: &[ArgKind::Text],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::Newline,
        short: Some("-n"),
        long: "--nl",
        element: Some("xsl:value-of"),
        args: &[ArgKind::NewlineLiteral],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::InputName,
        short: Some("-f"),
        long: "--inp-name",
        element: Some("xsl:value-of"),
        args: &[ArgKind::InputFileRef],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::Match,
        short: Some("-m"),
        long: "--match",
        element: Some("xsl:for-each"),
        args: &[ArgKind::XpathAttr("select")],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::If,
        short: Some("-i"),
        long: "--if",
        element: Some("xsl:choose"),
        args: &[ArgKind::XpathAttr("test")],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::Elif,
        short: None,
        long: "--elif",
        element: Some("xsl:when"),
        args: &[ArgKind::XpathAttr("test")],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::Else,
        short: None,
        long: "--else",
        element: Some("xsl:otherwise"),
        args: &[],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::Elem,
        short: Some("-e"),
        long: "--elem",
        element: Some("xsl:element"),
        args: &[ArgKind::Attr("name")],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::Attr,
        short: Some("-a"),
        long: "--attr",
        element: Some("xsl:attribute"),
        args: &[ArgKind::Attr("name")],
        nest: NestEffect::Descend,
    },
    OptionSpec {
        id: OptId::Break,
        short: Some("-b"),
        long: "--break",
        element: None,
        args: &[],
        nest: NestEffect::Ascend,
    },
    OptionSpec {
        id: OptId::Sort,
        short: Some("-s"),
        long: "--sort",
        element: Some("xsl:sort"),
        args: &[ArgKind::SortTriplet, ArgKind::XpathAttr("select")],
        nest: NestEffect::Stay,
    },
    OptionSpec {
        id: OptId::Var,
        short: None,
        long: "--var",
        element: Some("xsl:variable"),
        args: &[ArgKind::VarAssign],
        nest: NestEffect::Descend,
    },
];

/// Resolves a token by exact short or long name.
pub fn resolve(token: &str) -> Option<&'static OptionSpec> {
    OPTIONS
        .iter()
        .find(|spec| spec.short == Some(token) || spec.long == token)
}

pub fn is_template_marker(token: &str) -> bool {
    token == "-t" || token == "--template"
}
