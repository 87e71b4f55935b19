//! Declarative subtree construction.
//!
//! Host code (tests, the demo binary, embedders replaying page content)
//! describes a fragment as a [`NodeSpec`] tree and inserts it in one call.
//! The fragment is assembled detached and attached last, so observers see a
//! single insertion record for the fragment root.

use crate::{Document, DomError, NodeKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeSpec {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<NodeSpec>,
    },
    Text(String),
    Comment(String),
}

impl NodeSpec {
    pub fn element(name: &str) -> Self {
        NodeSpec::Element {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: &str) -> Self {
        NodeSpec::Text(text.to_string())
    }

    pub fn comment(text: &str) -> Self {
        NodeSpec::Comment(text.to_string())
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        if let NodeSpec::Element { attributes, .. } = &mut self {
            attributes.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        if let NodeSpec::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn children(mut self, extra: impl IntoIterator<Item = NodeSpec>) -> Self {
        if let NodeSpec::Element { children, .. } = &mut self {
            children.extend(extra);
        }
        self
    }

    /// `<p>text</p>`
    pub fn paragraph(text: &str) -> Self {
        NodeSpec::element("p").child(NodeSpec::text(text))
    }
}

impl Document {
    /// Create the fragment described by `spec` without attaching it.
    pub fn create_fragment(&mut self, spec: &NodeSpec) -> Result<NodeKey, DomError> {
        let root = self.create_spec_node(spec);
        let mut stack = vec![(root, spec)];
        while let Some((key, spec)) = stack.pop() {
            if let NodeSpec::Element { children, .. } = spec {
                for child in children {
                    let child_key = self.create_spec_node(child);
                    self.append_child(key, child_key)?;
                    stack.push((child_key, child));
                }
            }
        }
        Ok(root)
    }

    /// Build `spec` and append it as the last child of `parent`.
    pub fn append_fragment(&mut self, parent: NodeKey, spec: &NodeSpec) -> Result<NodeKey, DomError> {
        let root = self.create_fragment(spec)?;
        self.append_child(parent, root)?;
        Ok(root)
    }

    fn create_spec_node(&mut self, spec: &NodeSpec) -> NodeKey {
        match spec {
            NodeSpec::Element {
                name, attributes, ..
            } => {
                let attrs: Vec<(&str, &str)> = attributes
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                self.create_element_with(name, &attrs)
            }
            NodeSpec::Text(text) => self.create_text(text.as_str()),
            NodeSpec::Comment(text) => self.create_comment(text.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_preserves_child_order() {
        let mut doc = Document::new();
        let spec = NodeSpec::element("div")
            .attr("class", "post")
            .child(NodeSpec::paragraph("first"))
            .child(NodeSpec::text("second"))
            .child(NodeSpec::comment("third"));
        let div = doc.append_fragment(doc.body(), &spec).unwrap();
        let kids = doc.children(div).to_vec();
        assert_eq!(kids.len(), 3);
        assert_eq!(doc.text_content(kids[0]), "first");
        assert_eq!(doc.text(kids[1]), Some("second"));
        assert_eq!(doc.text(kids[2]), Some("third"));
        assert!(doc.has_class(div, "post"));
    }

    #[test]
    fn fragment_insert_is_one_record() {
        let mut doc = Document::new();
        let (_, rx) = doc.observe(doc.body(), 16).unwrap();
        let p = doc
            .append_fragment(doc.body(), &NodeSpec::paragraph("hello"))
            .unwrap();
        let records: Vec<_> = rx.try_iter().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].added, vec![p]);
    }
}
