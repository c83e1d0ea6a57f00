//! Namespace inference. Expressions are scanned lexically for qualified-name
//! prefixes; prefixes of well-known extension namespaces are declared on the
//! stylesheet root so the engine can bind its extension functions. No
//! expression grammar is parsed, so a colon inside an unrelated substring may
//! declare a namespace that is never used; that is harmless.

use crate::tree::{NodeId, ProgramTree};

pub struct NsEntry {
    pub prefix: &'static str,
    pub uri: &'static str,
}

/// The extension namespaces the engine is expected to know.
pub const KNOWN_NAMESPACES: &[NsEntry] = &[
    NsEntry { prefix: "exslt", uri: "http://exslt.org/common" },
    NsEntry { prefix: "math", uri: "http://exslt.org/math" },
    NsEntry { prefix: "date", uri: "http://exslt.org/dates-and-times" },
    NsEntry { prefix: "func", uri: "http://exslt.org/functions" },
    NsEntry { prefix: "set", uri: "http://exslt.org/sets" },
    NsEntry { prefix: "str", uri: "http://exslt.org/strings" },
    NsEntry { prefix: "dyn", uri: "http://exslt.org/dynamic" },
    NsEntry { prefix: "saxon", uri: "http://icl.com/saxon" },
    NsEntry { prefix: "xalanredirect", uri: "org.apache.xalan.xslt.extensions.Redirect" },
    NsEntry { prefix: "xt", uri: "http://www.jclark.com/xt" },
    NsEntry { prefix: "libxslt", uri: "http://xmlsoft.org/XSLT/namespace" },
    NsEntry { prefix: "test", uri: "http://xmlsoft.org/XSLT/" },
];

const MAX_PREFIX_LEN: usize = 20;

/// Scans `expr` and declares every known prefix it mentions on the root,
/// unless the root already declares it.
pub fn declare_known_prefixes(tree: &mut ProgramTree, root: NodeId, expr: &str) {
    for (pos, ch) in expr.char_indices() {
        if ch != ':' {
            continue;
        }
        let candidate = prefix_candidate(&expr[..pos]);
        if candidate.is_empty() {
            continue;
        }
        if let Some(entry) = KNOWN_NAMESPACES.iter().find(|e| e.prefix == candidate) {
            let attr = format!("xmlns:{}", entry.prefix);
            if !tree.has_attr(root, &attr) {
                log::debug!("auto-declaring namespace {} -> {}", entry.prefix, entry.uri);
                tree.set_attr(root, &attr, entry.uri);
            }
        }
    }
}

/// The maximal alphanumeric run ending at the colon, capped at
/// `MAX_PREFIX_LEN` characters.
fn prefix_candidate(before: &str) -> &str {
    let mut start = before.len();
    let mut taken = 0;
    for (idx, ch) in before.char_indices().rev() {
        if !ch.is_ascii_alphanumeric() || taken == MAX_PREFIX_LEN {
            break;
        }
        start = idx;
        taken += 1;
    }
    &before[start..]
}

/// Well-known prefixes actually declared on the root, in declaration order.
pub fn extension_prefixes(tree: &ProgramTree, root: NodeId) -> Vec<&'static str> {
    let mut prefixes = Vec::new();
    for (name, _) in tree.attrs(root) {
        if let Some(prefix) = name.strip_prefix("xmlns:") {
            if let Some(entry) = KNOWN_NAMESPACES.iter().find(|e| e.prefix == prefix) {
                prefixes.push(entry.prefix);
            }
        }
    }
    prefixes
}
