use crate::{Document, NodeKey, NodeKind};

/// Elements whose text is not prose and must never be annotated.
pub fn is_non_prose_element(name: &str) -> bool {
    let n = name.to_ascii_lowercase();
    matches!(n.as_str(), "script" | "style" | "pre" | "code")
}

/// `class="a b c"` token membership.
pub fn class_list_contains(value: &str, class: &str) -> bool {
    value.split_ascii_whitespace().any(|token| token == class)
}

pub fn is_whitespace_only(text: &str) -> bool {
    text.trim().is_empty()
}

/// Indented one-line-per-node outline of a live subtree, capped at `cap` lines.
pub fn outline(doc: &Document, root: NodeKey, cap: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((key, depth)) = stack.pop() {
        if out.len() >= cap {
            break;
        }
        let indent = "  ".repeat(depth);
        match doc.kind(key) {
            Some(NodeKind::Document) => out.push(format!("{indent}#document")),
            Some(NodeKind::Element { name, attributes }) => {
                let mut line = format!("{indent}<{name}");
                for (k, v) in attributes {
                    if k.starts_with("data-") || k.as_ref() == "class" {
                        line.push_str(&format!(r#" {k}="{}""#, v.as_deref().unwrap_or("")));
                    }
                }
                line.push('>');
                out.push(line);
            }
            Some(NodeKind::Text { text }) => {
                let t = text.replace('\n', " ");
                if !t.trim().is_empty() {
                    let show = if t.chars().count() > 60 {
                        format!("{}…", t.chars().take(60).collect::<String>())
                    } else {
                        t
                    };
                    out.push(format!("{indent}\"{show}\""));
                }
            }
            Some(NodeKind::Comment { text }) => out.push(format!("{indent}<!-- {text} -->")),
            None => continue,
        }
        for child in doc.children(key).iter().rev() {
            stack.push((*child, depth + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_prose_is_case_insensitive() {
        assert!(is_non_prose_element("SCRIPT"));
        assert!(is_non_prose_element("pre"));
        assert!(!is_non_prose_element("p"));
    }

    #[test]
    fn class_tokens_match_exactly() {
        assert!(class_list_contains("a tooltip-content b", "tooltip-content"));
        assert!(!class_list_contains("tooltip-contents", "tooltip-content"));
    }

    #[test]
    fn outline_shows_data_attributes() {
        let mut doc = Document::new();
        let anchor = doc.create_element_with("xtooltip-star-anchor", &[("data-key", "apple")]);
        let text = doc.create_text("apple");
        doc.append_child(anchor, text).unwrap();
        doc.append_child(doc.body(), anchor).unwrap();
        let lines = outline(&doc, doc.body(), 10);
        assert_eq!(
            lines,
            vec![
                "<body>".to_string(),
                r#"  <xtooltip-star-anchor data-key="apple">"#.to_string(),
                "    \"apple\"".to_string(),
            ]
        );
    }
}
