use std::sync::Arc;

/// Stable identity of a node inside a [`Document`](crate::Document).
///
/// Keys are allocated monotonically and never reused, so a key that outlives
/// its node simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

pub type Attribute = (Arc<str>, Option<String>);

/// Arena payload of a single node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<Attribute>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    pub fn element(name: &str) -> Self {
        NodeKind::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
        }
    }

    pub fn allows_children(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element { .. })
    }
}

/// Owned, materialized view of a subtree.
///
/// The live document is an arena; this tree is what snapshots, diffs and
/// debugging output work on.
#[derive(Clone, Debug)]
pub enum Node {
    Document {
        id: NodeKey,
        children: Vec<Node>,
    },
    Element {
        id: NodeKey,
        name: Arc<str>,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        id: NodeKey,
        text: String,
    },
    Comment {
        id: NodeKey,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> NodeKey {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }
}
