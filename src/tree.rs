//! The program tree: an index-based arena holding the stylesheet under
//! construction. Element names are stored prefixed (`xsl:for-each`); namespace
//! declarations are ordinary `xmlns:*` attributes on the root.

/// Index of a node inside a [`ProgramTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Why a node is on the ascent path, if it is.
///
/// `Choice` anchors `--elif`/`--else`; `--break` ascends through both kinds.
/// The template root carries `None`, which is what stops every ascent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AscentMark {
    #[default]
    None,
    Scope,
    Choice,
}

#[derive(Debug)]
pub enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct ProgramNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    mark: AscentMark,
}

#[derive(Debug, Default)]
pub struct ProgramTree {
    nodes: Vec<ProgramNode>,
}

impl ProgramTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element node.
    pub fn element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_string(),
            attrs: Vec::new(),
        })
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ProgramNode {
            kind,
            parent: None,
            children: Vec::new(),
            mark: AscentMark::None,
        });
        id
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn append_text(&mut self, parent: NodeId, content: &str) {
        let id = self.push(NodeKind::Text(content.to_string()));
        self.append(parent, id);
    }

    /// Unlinks a node from its parent; the node keeps its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Sets an attribute, replacing an existing one of the same name in place.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
                entry.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            attrs.retain(|(n, _)| n != name);
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn name(&self, id: NodeId) -> &str {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => name,
            NodeKind::Text(_) => "",
        }
    }

    pub fn rename(&mut self, id: NodeId, new_name: &str) {
        if let NodeKind::Element { name, .. } = &mut self.nodes[id.0].kind {
            *name = new_name.to_string();
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn mark(&self, id: NodeId) -> AscentMark {
        self.nodes[id.0].mark
    }

    pub fn set_mark(&mut self, id: NodeId, mark: AscentMark) {
        self.nodes[id.0].mark = mark;
    }
}
