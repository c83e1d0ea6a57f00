//! Compiles one template: a run of command tokens starting at a `-t` marker
//! is translated into a fragment of the program tree. The compiler keeps a
//! write cursor inside the fragment; descend-effect options move it down and
//! mark the new node so `--break` knows how far it may ascend.

use crate::error::UsageError;
use crate::grammar::{self, ArgKind, NestEffect, OptId, OptionSpec};
use crate::namespaces;
use crate::sortkey;
use crate::tree::{AscentMark, NodeId, ProgramTree};

/// Name of the synthesized helper template `--value-of` calls into.
pub const VALUE_OF_TEMPLATE: &str = "value-of-template";

/// Stylesheet-level requirements discovered while compiling templates.
#[derive(Debug, Default)]
pub struct CompileInfo {
    pub needs_input_param: bool,
    pub needs_value_of_helper: bool,
}

#[derive(Debug)]
pub struct TemplateOutcome {
    /// Index of the next template marker or of the first trailing file name.
    pub next: usize,
    /// Whether this was the last template in the stream.
    pub last: bool,
}

/// Compiles the template starting at `tokens[start]` (the `-t` marker) into
/// children of `template`. Namespace declarations land on `root`.
pub fn compile_template(
    tree: &mut ProgramTree,
    root: NodeId,
    template: NodeId,
    tokens: &[String],
    start: usize,
    info: &mut CompileInfo,
) -> Result<TemplateOutcome, UsageError> {
    let mut cursor = template;
    let mut prev: Option<OptId> = None;
    let mut directives = 0usize;
    let mut i = start + 1;

    let outcome = loop {
        let Some(token) = tokens.get(i) else {
            break TemplateOutcome { next: i, last: true };
        };
        if !token.starts_with('-') || token == "-" {
            break TemplateOutcome { next: i, last: true };
        }
        let spec =
            grammar::resolve(token).ok_or_else(|| UsageError::UnknownOption(token.clone()))?;
        if spec.id == OptId::Template {
            break TemplateOutcome { next: i, last: false };
        }
        if spec.id == OptId::Sort && !matches!(prev, Some(OptId::Match) | Some(OptId::Sort)) {
            return Err(UsageError::SortWithoutMatch);
        }
        i += 1;
        apply_option(tree, root, template, &mut cursor, spec, tokens, &mut i, info)?;
        directives += 1;
        prev = Some(spec.id);
    };

    if directives == 0 {
        return Err(UsageError::EmptyTemplate);
    }
    log::debug!(
        "compiled template with {} directive(s), next token index {}",
        directives,
        outcome.next
    );
    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
fn apply_option(
    tree: &mut ProgramTree,
    root: NodeId,
    template: NodeId,
    cursor: &mut NodeId,
    spec: &OptionSpec,
    tokens: &[String],
    i: &mut usize,
    info: &mut CompileInfo,
) -> Result<(), UsageError> {
    match spec.id {
        OptId::Break => {
            while tree.mark(*cursor) != AscentMark::None {
                match tree.parent(*cursor) {
                    Some(parent) => *cursor = parent,
                    None => break,
                }
            }
            Ok(())
        }
        OptId::Output => {
            let text = take_argument(tokens, i, spec)?;
            tree.append_text(*cursor, &text);
            Ok(())
        }
        OptId::If => {
            let test = take_argument(tokens, i, spec)?;
            let choose = tree.element("xsl:choose");
            tree.set_mark(choose, AscentMark::Choice);
            tree.append(*cursor, choose);
            let when = tree.element("xsl:when");
            tree.set_mark(when, AscentMark::Scope);
            tree.set_attr(when, "test", &test);
            namespaces::declare_known_prefixes(tree, root, &test);
            tree.append(choose, when);
            *cursor = when;
            Ok(())
        }
        OptId::Elif | OptId::Else => {
            let choose = find_choice_ancestor(tree, template, *cursor)
                .ok_or_else(|| UsageError::ElseWithoutIf(spec.long.to_string()))?;
            let branch = if spec.id == OptId::Elif {
                let test = take_argument(tokens, i, spec)?;
                let when = tree.element("xsl:when");
                tree.set_attr(when, "test", &test);
                namespaces::declare_known_prefixes(tree, root, &test);
                when
            } else {
                tree.element("xsl:otherwise")
            };
            tree.set_mark(branch, AscentMark::Scope);
            tree.append(choose, branch);
            *cursor = branch;
            Ok(())
        }
        OptId::ValueOf => {
            // A select may return multiple items; the helper template joins
            // them with newlines via the engine's node-set extension.
            let expr = take_argument(tokens, i, spec)?;
            let call = tree.element("xsl:call-template");
            tree.set_attr(call, "name", VALUE_OF_TEMPLATE);
            let param = tree.element("xsl:with-param");
            tree.set_attr(param, "name", "select");
            tree.set_attr(param, "select", &expr);
            namespaces::declare_known_prefixes(tree, root, &expr);
            tree.append(call, param);
            tree.append(*cursor, call);
            info.needs_value_of_helper = true;
            Ok(())
        }
        OptId::Var => {
            let binding = take_argument(tokens, i, spec)?;
            let var = tree.element("xsl:variable");
            match binding.split_once('=') {
                Some((name, expr)) => {
                    tree.set_attr(var, "name", name);
                    tree.set_attr(var, "select", expr);
                    namespaces::declare_known_prefixes(tree, root, expr);
                    tree.append(*cursor, var);
                }
                None => {
                    // Body form: the variable content is built by the
                    // following options until a --break closes it.
                    tree.set_attr(var, "name", &binding);
                    tree.set_mark(var, AscentMark::Scope);
                    tree.append(*cursor, var);
                    *cursor = var;
                }
            }
            Ok(())
        }
        _ => apply_registry_option(tree, root, cursor, spec, tokens, i, info),
    }
}

/// The registry-driven path: create the option's element, encode each
/// argument descriptor, then apply the nesting effect.
fn apply_registry_option(
    tree: &mut ProgramTree,
    root: NodeId,
    cursor: &mut NodeId,
    spec: &OptionSpec,
    tokens: &[String],
    i: &mut usize,
    info: &mut CompileInfo,
) -> Result<(), UsageError> {
    let Some(name) = spec.element else {
        return Ok(());
    };
    let node = tree.element(name);
    for arg in spec.args {
        match arg {
            ArgKind::Attr(attr) => {
                let value = take_argument(tokens, i, spec)?;
                tree.set_attr(node, attr, &value);
            }
            ArgKind::XpathAttr(attr) => {
                let value = take_argument(tokens, i, spec)?;
                tree.set_attr(node, attr, &value);
                namespaces::declare_known_prefixes(tree, root, &value);
            }
            ArgKind::Text => {
                let value = take_argument(tokens, i, spec)?;
                tree.append_text(node, &value);
            }
            ArgKind::NewlineLiteral => {
                tree.set_attr(node, "select", "'\n'");
            }
            ArgKind::InputFileRef => {
                tree.set_attr(node, "select", "$inputFile");
                info.needs_input_param = true;
            }
            ArgKind::SortTriplet => {
                let value = take_argument(tokens, i, spec)?;
                let key = sortkey::parse(&value)?;
                for (attr, attr_value) in key.attribute_pairs() {
                    tree.set_attr(node, attr, attr_value);
                }
            }
            ArgKind::VarAssign => {
                // --var is handled before the registry path.
            }
        }
    }
    tree.append(*cursor, node);
    if spec.nest == NestEffect::Descend {
        tree.set_mark(node, AscentMark::Scope);
        *cursor = node;
    }
    Ok(())
}

fn take_argument(
    tokens: &[String],
    i: &mut usize,
    spec: &OptionSpec,
) -> Result<String, UsageError> {
    let token = tokens
        .get(*i)
        .ok_or_else(|| UsageError::MissingArgument(spec.long.to_string()))?;
    *i += 1;
    Ok(token.clone())
}

/// Nearest ancestor created by `--if`, stopping at the template root.
fn find_choice_ancestor(
    tree: &ProgramTree,
    template: NodeId,
    cursor: NodeId,
) -> Option<NodeId> {
    let mut node = cursor;
    loop {
        if tree.mark(node) == AscentMark::Choice {
            return Some(node);
        }
        if node == template {
            return None;
        }
        node = tree.parent(node)?;
    }
}
