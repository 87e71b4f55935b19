//! Transient anchor for the current text selection.

use annotate::{DATA_KEY, DATA_TEXT, QUERY_ANCHOR_TAG};
use core_types::is_english_word;
use html::traverse::{find_elements_by_class, find_elements_by_tag};
use html::{Document, DomError, NodeKey};
use layout::Rect;

/// Remove every query anchor in the document. Returns how many went.
pub fn remove_query_anchors(doc: &mut Document) -> Result<usize, DomError> {
    let root = doc.root();
    let mut anchors = find_elements_by_class(doc, root, QUERY_ANCHOR_TAG);
    anchors.extend(find_elements_by_tag(doc, root, QUERY_ANCHOR_TAG));
    let mut removed = 0;
    for anchor in anchors {
        // An earlier removal may have taken this one with it.
        if doc.is_live(anchor) {
            doc.remove(anchor)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Replace any previous query anchor with one for `selection`.
///
/// Only a single English word is accepted; anything else just clears the
/// old anchor and returns `None`. The anchor is a fixed-position box over
/// `rect`, appended to `body`.
pub fn query_selection(
    doc: &mut Document,
    selection: &str,
    rect: Rect,
) -> Result<Option<NodeKey>, DomError> {
    remove_query_anchors(doc)?;
    let text = selection.trim();
    if text.is_empty() || !is_english_word(text) {
        log::trace!(target: "overlay.query", "ignoring selection {selection:?}");
        return Ok(None);
    }
    let key = text.to_ascii_lowercase();
    let style = format!(
        "position: fixed; pointer-events: none; display: block; top: {}px; left: {}px; width: {}px; height: {}px",
        rect.top(),
        rect.left(),
        rect.width,
        rect.height
    );
    let anchor = doc.create_element_with(
        "div",
        &[
            ("class", QUERY_ANCHOR_TAG),
            ("style", style.as_str()),
            (DATA_KEY, key.as_str()),
            (DATA_TEXT, text),
        ],
    );
    let body = doc.body();
    doc.append_child(body, anchor)?;
    log::debug!(target: "overlay.query", "query anchor {anchor:?} for {key:?}");
    Ok(Some(anchor))
}
