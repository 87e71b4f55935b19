//! Line-per-node dump of a subtree for test comparisons.
//!
//! Not a stable format. Two subtrees are equal when their dumps are equal:
//! same node kinds, element names, attributes in order, and exact text
//! (empty text nodes included). Keys are left out by default because
//! annotation passes allocate fresh ones.

use crate::{Document, DomError, Node, NodeKey};
use std::fmt::{self, Write};

#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self { ignore_ids: true }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let mut line = "  ".repeat(depth);
            write_node(&mut line, node, options);
            lines.push(line);
            stack.extend(node.children().iter().rev().map(|c| (c, depth + 1)));
        }
        Self { lines }
    }

    /// Snapshot of a live subtree.
    pub fn of(doc: &Document, key: NodeKey, options: DomSnapshotOptions) -> Result<Self, DomError> {
        Ok(Self::new(&doc.materialize(key)?, options))
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Panics at the first differing line, printing both dumps.
pub fn assert_dom_eq(expected: &Node, actual: &Node, options: DomSnapshotOptions) {
    let expected = DomSnapshot::new(expected, options);
    let actual = DomSnapshot::new(actual, options);
    if expected == actual {
        return;
    }
    let line = expected
        .lines
        .iter()
        .zip(&actual.lines)
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected.lines.len().min(actual.lines.len()));
    panic!("DOM mismatch at line {}\nexpected:\n{expected}\nactual:\n{actual}", line + 1);
}

fn write_node(out: &mut String, node: &Node, options: DomSnapshotOptions) {
    match node {
        Node::Document { .. } => out.push_str("#document"),
        Node::Element {
            name, attributes, ..
        } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                if let Some(value) = value {
                    out.push_str("=\"");
                    escape_into(out, value);
                    out.push('"');
                }
            }
            out.push('>');
        }
        Node::Text { text, .. } => {
            out.push('"');
            escape_into(out, text);
            out.push('"');
        }
        Node::Comment { text, .. } => {
            out.push_str("<!-- ");
            escape_into(out, text);
            out.push_str(" -->");
        }
    }
    if !options.ignore_ids {
        let _ = write!(out, " #{}", node.id().0);
    }
}

fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
