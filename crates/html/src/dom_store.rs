//! Arena-backed live document.
//!
//! The document is the single owner of every node. Callers address nodes by
//! [`NodeKey`] and must re-query node state instead of caching it: any host
//! code may mutate or remove nodes between two calls.
//!
//! Removal destroys: a removed or replaced node and its whole subtree stop
//! resolving, and their keys are never handed out again.

use crate::mutation::{MutationRecord, ObserverId, ObserverRegistry};
use crate::types::{Node, NodeKey, NodeKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    MissingKey(NodeKey),
    #[error("node {0:?} has the wrong kind for this operation")]
    WrongNodeKind(NodeKey),
    #[error("node {0:?} cannot be used as or moved under this parent")]
    InvalidParent(NodeKey),
    #[error("{before:?} is not a child of {parent:?}")]
    InvalidSibling { parent: NodeKey, before: NodeKey },
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeKey, child: NodeKey },
    #[error("offset {offset} is past the end of text node {key:?} (len {len})")]
    OffsetOutOfRange {
        key: NodeKey,
        offset: usize,
        len: usize,
    },
    #[error("offset {offset} splits a UTF-8 sequence in text node {key:?}")]
    NotCharBoundary { key: NodeKey, offset: usize },
    #[error("element {0:?} already has a shadow root")]
    ShadowRootExists(NodeKey),
}

pub struct Document {
    arena: DomArena,
    root: NodeKey,
    body: NodeKey,
    observers: ObserverRegistry,
}

impl Document {
    /// `#document > html > body`
    pub fn new() -> Self {
        let mut arena = DomArena::new();
        let root = arena.insert_node(NodeKind::Document);
        let html = arena.insert_node(NodeKind::element("html"));
        let body = arena.insert_node(NodeKind::element("body"));
        arena.link(root, html);
        arena.link(html, body);
        Self {
            arena,
            root,
            body,
            observers: ObserverRegistry::default(),
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn body(&self) -> NodeKey {
        self.body
    }

    pub fn len(&self) -> usize {
        self.arena.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.live.is_empty()
    }

    // ---------------------------------------------------------------------
    // Node creation
    // ---------------------------------------------------------------------

    pub fn create_element(&mut self, name: &str) -> NodeKey {
        self.arena.insert_node(NodeKind::element(name))
    }

    pub fn create_element_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeKey {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (Arc::from(k.to_ascii_lowercase()), Some((*v).to_string())))
            .collect();
        self.arena.insert_node(NodeKind::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeKey {
        self.arena.insert_node(NodeKind::Text { text: text.into() })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeKey {
        self.arena
            .insert_node(NodeKind::Comment { text: text.into() })
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn is_live(&self, key: NodeKey) -> bool {
        self.arena.live.contains_key(&key)
    }

    /// Live and reachable from the document root.
    pub fn is_connected(&self, key: NodeKey) -> bool {
        self.is_live(key) && self.arena.is_inclusive_ancestor(self.root, key)
    }

    pub fn kind(&self, key: NodeKey) -> Option<&NodeKind> {
        self.arena.record(key).map(|r| &r.kind)
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.arena.record(key).and_then(|r| r.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.arena
            .record(key)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|k| *k == key)?;
        siblings.get(pos + 1).copied()
    }

    pub fn element_name(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key)? {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn get_attribute(&self, key: NodeKey, attr: &str) -> Option<&str> {
        match self.kind(key)? {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(attr))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.get_attribute(key, "class")
            .is_some_and(|value| crate::dom_utils::class_list_contains(value, class))
    }

    /// Content of a text or comment node.
    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match self.kind(key)? {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of every text node in the subtree, in tree order.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        for node in crate::traverse::descendants(self, key) {
            if let Some(NodeKind::Text { text }) = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    pub fn has_shadow_root(&self, key: NodeKey) -> bool {
        self.arena.record(key).is_some_and(|r| r.shadow_root)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.arena.append_child(parent, child)?;
        self.notify(MutationRecord::added(parent, vec![child]));
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: NodeKey,
    ) -> Result<(), DomError> {
        self.arena.insert_before(parent, child, before)?;
        self.notify(MutationRecord::added(parent, vec![child]));
        Ok(())
    }

    /// Replace `old` (a child of its parent) with the parentless node `new`.
    ///
    /// `old` and its subtree are destroyed.
    pub fn replace_child(&mut self, new: NodeKey, old: NodeKey) -> Result<(), DomError> {
        let parent = self.parent(old).ok_or(DomError::InvalidParent(old))?;
        self.arena.replace_child(parent, new, old)?;
        self.notify(MutationRecord {
            target: parent,
            added: vec![new],
            removed: vec![old],
        });
        self.arena.destroy_subtree(old);
        Ok(())
    }

    /// Detach and destroy `key` with its subtree.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), DomError> {
        if key == self.root {
            return Err(DomError::InvalidParent(key));
        }
        self.arena.ensure_live(key)?;
        if let Some(parent) = self.arena.detach(key) {
            self.notify(MutationRecord::removed(parent, vec![key]));
        }
        self.arena.destroy_subtree(key);
        Ok(())
    }

    pub fn set_attribute(&mut self, key: NodeKey, attr: &str, value: &str) -> Result<(), DomError> {
        self.arena.set_attribute(key, attr, value)
    }

    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        self.arena.set_text(key, text)
    }

    /// Split a text node at byte `offset`.
    ///
    /// The node keeps `[0, offset)`; a new text node holding the rest is
    /// returned and, if the node has a parent, inserted right after it.
    pub fn split_text(&mut self, key: NodeKey, offset: usize) -> Result<NodeKey, DomError> {
        let tail = self.arena.truncate_text(key, offset)?;
        let new = self.create_text(tail);
        if let Some(parent) = self.parent(key) {
            match self.next_sibling(key) {
                Some(next) => self.arena.insert_before(parent, new, next)?,
                None => self.arena.append_child(parent, new)?,
            }
            self.notify(MutationRecord::added(parent, vec![new]));
        }
        Ok(new)
    }

    /// Attach an isolated rendering surface to an element, once.
    pub fn attach_shadow(&mut self, key: NodeKey) -> Result<(), DomError> {
        let record = self.arena.record_mut(key)?;
        if !matches!(record.kind, NodeKind::Element { .. }) {
            return Err(DomError::WrongNodeKind(key));
        }
        if record.shadow_root {
            return Err(DomError::ShadowRootExists(key));
        }
        record.shadow_root = true;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------------

    /// Subscribe to child-list changes anywhere in the subtree of `root`.
    pub fn observe(
        &mut self,
        root: NodeKey,
        capacity: usize,
    ) -> Result<(ObserverId, Receiver<MutationRecord>), DomError> {
        self.arena.ensure_live(root)?;
        Ok(self.observers.register(root, capacity))
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Returns whether records were dropped for `id` since the last call.
    pub fn take_overflow(&mut self, id: ObserverId) -> bool {
        self.observers.take_overflow(id)
    }

    fn notify(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let arena = &self.arena;
        let target = record.target;
        self.observers
            .notify(&record, |root| arena.is_inclusive_ancestor(root, target));
    }

    // ---------------------------------------------------------------------
    // Materialization
    // ---------------------------------------------------------------------

    pub fn materialize(&self, key: NodeKey) -> Result<Node, DomError> {
        self.arena.materialize(key)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

struct DomArena {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeKey, usize>,
    /// Slots of destroyed nodes, reused before the arena grows.
    free: Vec<usize>,
    next_key: u32,
}

impl DomArena {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            free: Vec::new(),
            next_key: 1,
        }
    }

    fn insert_node(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1).max(1);
        let record = NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            shadow_root: false,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index] = record;
                index
            }
            None => {
                self.nodes.push(record);
                self.nodes.len() - 1
            }
        };
        self.live.insert(key, index);
        key
    }

    /// Infallible append for freshly created nodes.
    fn link(&mut self, parent: NodeKey, child: NodeKey) {
        if let (Some(&p), Some(&c)) = (self.live.get(&parent), self.live.get(&child)) {
            self.nodes[p].children.push(child);
            self.nodes[c].parent = Some(parent);
        }
    }

    fn index(&self, key: NodeKey) -> Result<usize, DomError> {
        if key == NodeKey::INVALID {
            return Err(DomError::MissingKey(key));
        }
        self.live
            .get(&key)
            .copied()
            .ok_or(DomError::MissingKey(key))
    }

    fn ensure_live(&self, key: NodeKey) -> Result<(), DomError> {
        self.index(key).map(|_| ())
    }

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        self.live.get(&key).map(|&index| &self.nodes[index])
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        let index = self.index(key)?;
        Ok(&mut self.nodes[index])
    }

    fn check_insertable(&self, parent: NodeKey, child: NodeKey) -> Result<(usize, usize), DomError> {
        let parent_index = self.index(parent)?;
        let child_index = self.index(child)?;
        if parent == child || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if !self.nodes[parent_index].kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if self.nodes[child_index].parent.is_some()
            || matches!(self.nodes[child_index].kind, NodeKind::Document)
        {
            return Err(DomError::InvalidParent(child));
        }
        Ok((parent_index, child_index))
    }

    fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let (parent_index, child_index) = self.check_insertable(parent, child)?;
        self.nodes[parent_index].children.push(child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: NodeKey,
    ) -> Result<(), DomError> {
        let (parent_index, child_index) = self.check_insertable(parent, child)?;
        let pos = self.nodes[parent_index]
            .children
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::InvalidSibling { parent, before })?;
        self.nodes[parent_index].children.insert(pos, child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    fn replace_child(&mut self, parent: NodeKey, new: NodeKey, old: NodeKey) -> Result<(), DomError> {
        let (parent_index, new_index) = self.check_insertable(parent, new)?;
        let old_index = self.index(old)?;
        let pos = self.nodes[parent_index]
            .children
            .iter()
            .position(|k| *k == old)
            .ok_or(DomError::InvalidSibling { parent, before: old })?;
        self.nodes[parent_index].children[pos] = new;
        self.nodes[new_index].parent = Some(parent);
        self.nodes[old_index].parent = None;
        Ok(())
    }

    /// Unlink `key` from its parent, returning the former parent.
    fn detach(&mut self, key: NodeKey) -> Option<NodeKey> {
        let index = *self.live.get(&key)?;
        let parent = self.nodes[index].parent.take()?;
        if let Some(&parent_index) = self.live.get(&parent) {
            self.nodes[parent_index].children.retain(|k| *k != key);
        }
        Some(parent)
    }

    fn destroy_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let Some(index) = self.live.remove(&current) else {
                continue;
            };
            let record = std::mem::replace(&mut self.nodes[index], NodeRecord::vacant());
            stack.extend(record.children);
            self.free.push(index);
        }
    }

    fn set_attribute(&mut self, key: NodeKey, attr: &str, value: &str) -> Result<(), DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element { attributes, .. } => {
                if let Some(slot) = attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(attr)) {
                    slot.1 = Some(value.to_string());
                } else {
                    attributes.push((Arc::from(attr.to_ascii_lowercase()), Some(value.to_string())));
                }
                Ok(())
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Text { text: existing } | NodeKind::Comment { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    fn truncate_text(&mut self, key: NodeKey, offset: usize) -> Result<String, DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Text { text } => {
                if offset > text.len() {
                    return Err(DomError::OffsetOutOfRange {
                        key,
                        offset,
                        len: text.len(),
                    });
                }
                if !text.is_char_boundary(offset) {
                    return Err(DomError::NotCharBoundary { key, offset });
                }
                Ok(text.split_off(offset))
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.record(key).and_then(|r| r.parent);
        }
        false
    }

    fn materialize(&self, key: NodeKey) -> Result<Node, DomError> {
        let index = self.index(key)?;
        let record = &self.nodes[index];
        let children = record
            .children
            .iter()
            .map(|child| self.materialize(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let node = match &record.kind {
            NodeKind::Document => Node::Document { id: key, children },
            NodeKind::Element { name, attributes } => Node::Element {
                id: key,
                name: Arc::clone(name),
                attributes: attributes.clone(),
                children,
            },
            NodeKind::Text { text } => Node::Text {
                id: key,
                text: text.clone(),
            },
            NodeKind::Comment { text } => Node::Comment {
                id: key,
                text: text.clone(),
            },
        };
        Ok(node)
    }
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    shadow_root: bool,
}

impl NodeRecord {
    fn vacant() -> Self {
        Self {
            kind: NodeKind::Comment {
                text: String::new(),
            },
            parent: None,
            children: Vec::new(),
            shadow_root: false,
        }
    }
}
