//! In-place annotation of a document subtree.
//!
//! A pass walks the subtree with an explicit worklist, snapshotting each
//! element's child list before descending, so nodes created by the pass
//! itself are never revisited. Text nodes are scanned with
//! [`match_words`]; each interesting span is isolated with at most two
//! splits and replaced by a star anchor element.
//!
//! Whether something is "already annotated" is read from the live node
//! (its tag) on every visit. Passes therefore compose: running one twice,
//! or on overlapping subtrees, leaves the document unchanged the second
//! time.

use crate::matcher::{Span, match_words};
use core_types::{AnchorKind, Word, WordSet};
use html::dom_utils::{is_non_prose_element, is_whitespace_only};
use html::traverse::closest_ancestor;
use html::{Document, DomError, NodeKey, NodeKind};

pub const STAR_ANCHOR_TAG: &str = "xtooltip-star-anchor";
pub const QUERY_ANCHOR_TAG: &str = "xtooltip-query-anchor";
pub const TOOLTIP_CONTENT_CLASS: &str = "tooltip-content";

pub const DATA_KEY: &str = "data-key";
pub const DATA_TEXT: &str = "data-text";

const ANCHOR_STYLE: &str = "overflow: visible";

/// Counters for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Live nodes taken off the worklist.
    pub visited: usize,
    /// Anchors created.
    pub anchored: usize,
    /// Star anchors turned back into text.
    pub reverted: usize,
    /// Dead keys and failed rewrites.
    pub skipped: usize,
}

impl AnnotateStats {
    pub fn merge(&mut self, other: AnnotateStats) {
        self.visited += other.visited;
        self.anchored += other.anchored;
        self.reverted += other.reverted;
        self.skipped += other.skipped;
    }
}

/// Which anchor `key` is, if any.
///
/// Query anchors are recognised by tag or by class, since the selection
/// query marks a plain `div`.
pub fn anchor_kind(doc: &Document, key: NodeKey) -> Option<AnchorKind> {
    let name = doc.element_name(key)?;
    if name == STAR_ANCHOR_TAG {
        Some(AnchorKind::Star)
    } else if name == QUERY_ANCHOR_TAG || doc.has_class(key, QUERY_ANCHOR_TAG) {
        Some(AnchorKind::Query)
    } else {
        None
    }
}

pub fn is_anchor(doc: &Document, key: NodeKey) -> bool {
    anchor_kind(doc, key).is_some()
}

/// Whether some ancestor of `key` is an element a pass never descends
/// into: non-prose content, an anchor, or tooltip content.
///
/// A pass rooted at `key` itself only checks downwards, so incremental
/// passes over inserted nodes test this first.
pub fn has_skipped_ancestor(doc: &Document, key: NodeKey) -> bool {
    closest_ancestor(doc, key, |ancestor, kind| match kind {
        NodeKind::Element { name, .. } => {
            is_non_prose_element(name)
                || is_anchor(doc, ancestor)
                || doc.has_class(ancestor, TOOLTIP_CONTENT_CLASS)
        }
        _ => false,
    })
    .is_some()
}

/// Annotate the subtree rooted at `root` against `interesting`.
///
/// Never fails; anything that cannot be rewritten is logged and left alone.
pub fn annotate(doc: &mut Document, root: NodeKey, interesting: &WordSet) -> AnnotateStats {
    let mut stats = AnnotateStats::default();
    let mut worklist = vec![root];

    while let Some(key) = worklist.pop() {
        let Some(kind) = doc.kind(key) else {
            log::trace!(target: "annotate.annotator", "skipping dead node {key:?}");
            stats.skipped += 1;
            continue;
        };
        stats.visited += 1;

        match kind {
            NodeKind::Document => {}
            NodeKind::Comment { .. } => continue,
            NodeKind::Text { .. } => {
                annotate_text(doc, key, interesting, &mut stats);
                continue;
            }
            NodeKind::Element { name, .. } => {
                if is_non_prose_element(name) {
                    continue;
                }
                match anchor_kind(doc, key) {
                    Some(AnchorKind::Star) => {
                        revert_if_stale(doc, key, interesting, &mut stats);
                        continue;
                    }
                    Some(AnchorKind::Query) => continue,
                    None => {}
                }
                if doc.has_class(key, TOOLTIP_CONTENT_CLASS) {
                    continue;
                }
            }
        }

        // Reverse so the stack pops children in document order.
        let snapshot = doc.children(key).to_vec();
        worklist.extend(snapshot.into_iter().rev());
    }

    log::trace!(
        target: "annotate.annotator",
        "pass over {root:?}: visited={} anchored={} reverted={} skipped={}",
        stats.visited,
        stats.anchored,
        stats.reverted,
        stats.skipped
    );
    stats
}

fn annotate_text(doc: &mut Document, key: NodeKey, interesting: &WordSet, stats: &mut AnnotateStats) {
    let text = match doc.text(key) {
        Some(text) if !is_whitespace_only(text) => text.to_string(),
        _ => return,
    };

    // Right to left: splitting never moves the offsets of spans not yet
    // processed.
    for span in match_words(&text).into_iter().rev() {
        let Some(word) = Word::normalize_token(span.word) else {
            continue;
        };
        if !interesting.contains(word.as_str()) {
            continue;
        }
        match wrap_span(doc, key, &span, &word) {
            Ok(()) => stats.anchored += 1,
            Err(err) => {
                log::debug!(
                    target: "annotate.annotator",
                    "could not anchor {:?} in {key:?}: {err}",
                    span.word
                );
                stats.skipped += 1;
                return;
            }
        }
    }
}

/// Isolate `span` in text node `key` and swap it for a star anchor.
///
/// `key` holds `[0, len)` on entry and `[0, span.start)` on return, unless
/// the span started at 0 and `key` itself was replaced.
fn wrap_span(doc: &mut Document, key: NodeKey, span: &Span<'_>, word: &Word) -> Result<(), DomError> {
    let len = doc.text(key).map(str::len).ok_or(DomError::WrongNodeKind(key))?;
    if span.end < len {
        doc.split_text(key, span.end)?;
    }
    let target = if span.start > 0 {
        doc.split_text(key, span.start)?
    } else {
        key
    };
    let anchor = create_star_anchor(doc, word.as_str(), span.word)?;
    doc.replace_child(anchor, target)
}

fn create_star_anchor(doc: &mut Document, key: &str, text: &str) -> Result<NodeKey, DomError> {
    let anchor = doc.create_element_with(
        STAR_ANCHOR_TAG,
        &[(DATA_KEY, key), (DATA_TEXT, text), ("style", ANCHOR_STYLE)],
    );
    let label = doc.create_text(text);
    doc.append_child(anchor, label)?;
    Ok(anchor)
}

fn revert_if_stale(doc: &mut Document, anchor: NodeKey, interesting: &WordSet, stats: &mut AnnotateStats) {
    let still_wanted = doc
        .get_attribute(anchor, DATA_KEY)
        .is_some_and(|key| interesting.contains(key));
    if still_wanted {
        return;
    }
    let text = match doc.get_attribute(anchor, DATA_TEXT) {
        Some(text) => text.to_string(),
        None => doc.text_content(anchor),
    };
    let replacement = doc.create_text(text);
    match doc.replace_child(replacement, anchor) {
        Ok(()) => stats.reverted += 1,
        Err(err) => {
            log::debug!(target: "annotate.annotator", "could not revert {anchor:?}: {err}");
            stats.skipped += 1;
        }
    }
}
