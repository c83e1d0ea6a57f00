//! Serializes a program tree to XSLT text. The compact form feeds the
//! external engine; the indented form backs `-C`. Attribute values are
//! escaped by hand so newline literals become character references and
//! survive attribute-value normalization on re-parse.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::error::SelectError;
use crate::tree::{NodeId, NodeKind, ProgramTree};

pub fn to_xml(tree: &ProgramTree, root: NodeId, indent: bool) -> Result<String, SelectError> {
    let mut buf = Vec::new();
    if indent {
        let mut writer = Writer::new_with_indent(&mut buf, b' ', 2);
        write_document(&mut writer, tree, root)?;
    } else {
        let mut writer = Writer::new(&mut buf);
        write_document(&mut writer, tree, root)?;
    }
    String::from_utf8(buf).map_err(|e| SelectError::Serialize(e.to_string()))
}

fn write_document<W: Write>(
    writer: &mut Writer<W>,
    tree: &ProgramTree,
    root: NodeId,
) -> Result<(), SelectError> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(|e| SelectError::Serialize(e.to_string()))?;
    write_node(writer, tree, root)
}

fn write_node<W: Write>(
    writer: &mut Writer<W>,
    tree: &ProgramTree,
    id: NodeId,
) -> Result<(), SelectError> {
    match tree.kind(id) {
        NodeKind::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| SelectError::Serialize(e.to_string()))?,
        NodeKind::Element { name, attrs } => {
            let mut start = BytesStart::new(name.as_str());
            for (key, value) in attrs {
                start.push_attribute(Attribute {
                    key: QName(key.as_bytes()),
                    value: Cow::Owned(escape_attribute(value).into_bytes()),
                });
            }
            if tree.children(id).is_empty() {
                writer
                    .write_event(Event::Empty(start))
                    .map_err(|e| SelectError::Serialize(e.to_string()))?;
            } else {
                writer
                    .write_event(Event::Start(start))
                    .map_err(|e| SelectError::Serialize(e.to_string()))?;
                for &child in tree.children(id) {
                    write_node(writer, tree, child)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new(name.as_str())))
                    .map_err(|e| SelectError::Serialize(e.to_string()))?;
            }
        }
    }
    Ok(())
}

/// Escapes an attribute value. Whitespace other than a plain space must be a
/// character reference or a re-parse would normalize it away.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
