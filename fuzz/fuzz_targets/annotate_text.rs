#![no_main]

use annotate::{STAR_ANCHOR_TAG, annotate, is_anchor, match_words};
use core_types::{Word, WordSet};
use html::dom_snapshot::{DomSnapshot, DomSnapshotOptions};
use html::traverse::{closest_ancestor, descendants, find_elements_by_tag};
use html::{Document, NodeSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if text.len() > 16 * 1024 {
        return;
    }

    // Every other token of the input is interesting.
    let words: WordSet = match_words(&text)
        .iter()
        .step_by(2)
        .filter_map(|span| Word::normalize_token(span.word))
        .collect();

    let mut doc = Document::new();
    let body = doc.body();
    for chunk in text.split('\n') {
        doc.append_fragment(body, &NodeSpec::paragraph(chunk))
            .expect("append to body");
    }
    let original = doc.text_content(body);
    let empty_before = count_empty_text(&doc, body);

    annotate(&mut doc, body, &words);
    assert_eq!(doc.text_content(body), original);
    let once = DomSnapshot::of(&doc, body, DomSnapshotOptions::default()).expect("live body");

    let again = annotate(&mut doc, body, &words);
    assert_eq!(again.anchored, 0);
    let twice = DomSnapshot::of(&doc, body, DomSnapshotOptions::default()).expect("live body");
    assert_eq!(once.as_lines(), twice.as_lines());

    for anchor in find_elements_by_tag(&doc, body, STAR_ANCHOR_TAG) {
        assert!(closest_ancestor(&doc, anchor, |k, _| is_anchor(&doc, k)).is_none());
    }
    // Splits never leave empty text nodes behind.
    assert_eq!(count_empty_text(&doc, body), empty_before);
});

fn count_empty_text(doc: &Document, root: html::NodeKey) -> usize {
    descendants(doc, root)
        .filter(|key| doc.text(*key).is_some_and(str::is_empty))
        .count()
}
