use crate::{Document, Node, NodeKey, NodeKind};

/// Pre-order walk over a live subtree (inclusive of `root`).
///
/// Each step reads the current child list, so the iterator must not be held
/// across mutations of the document.
pub fn descendants(doc: &Document, root: NodeKey) -> Descendants<'_> {
    let stack = if doc.is_live(root) {
        vec![root]
    } else {
        Vec::new()
    };
    Descendants { doc, stack }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeKey>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(key).iter().rev().copied());
        Some(key)
    }
}

/// Every element named `tag` in the subtree, in tree order.
pub fn find_elements_by_tag(doc: &Document, root: NodeKey, tag: &str) -> Vec<NodeKey> {
    descendants(doc, root)
        .filter(|&key| {
            doc.element_name(key)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
        })
        .collect()
}

/// Every element whose class list contains `class`, in tree order.
pub fn find_elements_by_class(doc: &Document, root: NodeKey, class: &str) -> Vec<NodeKey> {
    descendants(doc, root)
        .filter(|&key| doc.has_class(key, class))
        .collect()
}

/// Nearest ancestor (exclusive) for which `pred` holds.
pub fn closest_ancestor(
    doc: &Document,
    key: NodeKey,
    mut pred: impl FnMut(NodeKey, &NodeKind) -> bool,
) -> Option<NodeKey> {
    let mut current = doc.parent(key);
    while let Some(k) = current {
        if let Some(kind) = doc.kind(k) {
            if pred(k, kind) {
                return Some(k);
            }
        }
        current = doc.parent(k);
    }
    None
}

pub fn find_node_by_id(node: &Node, id: NodeKey) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|child| find_node_by_id(child, id))
}
