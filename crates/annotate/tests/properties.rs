//! Randomized checks over generated paragraphs.

use annotate::{STAR_ANCHOR_TAG, annotate, is_anchor, match_words};
use core_types::{Word, WordSet};
use html::dom_snapshot::{DomSnapshot, DomSnapshotOptions, assert_dom_eq};
use html::traverse::{closest_ancestor, descendants, find_elements_by_tag};
use html::{Document, NodeSpec};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

const VOCABULARY: &[&str] = &[
    "apple", "Apple", "APPLE", "pear", "tea", "an", "a", "of", "osmosis", "Rust", "code",
    "日本", "café", "naïve", "x1y", "don't", "well-known",
];
const SEPARATORS: &[&str] = &[" ", " ", ", ", ". ", "\n", "\t", "-", "", "—", "'"];
const CASES: usize = 200;

fn interesting() -> WordSet {
    ["apple", "pear", "tea", "osmosis", "rust"]
        .into_iter()
        .map(|w| Word::parse(w).unwrap())
        .collect()
}

fn random_text(rng: &mut SmallRng) -> String {
    let mut text = String::new();
    for _ in 0..rng.gen_range(1..12) {
        text.push_str(VOCABULARY[rng.gen_range(0..VOCABULARY.len())]);
        text.push_str(SEPARATORS[rng.gen_range(0..SEPARATORS.len())]);
    }
    text
}

/// Document plus each paragraph's text and every text node's initial text.
fn random_doc(rng: &mut SmallRng) -> (Document, Vec<String>, Vec<String>) {
    let mut doc = Document::new();
    let body = doc.body();
    let mut texts = Vec::new();
    let mut chunks = Vec::new();
    for _ in 0..rng.gen_range(1..5) {
        let mut spec = NodeSpec::element("p");
        let mut paragraph = String::new();
        for _ in 0..rng.gen_range(1..4) {
            let text = random_text(rng);
            paragraph.push_str(&text);
            chunks.push(text.clone());
            spec = if rng.gen_bool(0.3) {
                spec.child(NodeSpec::element("em").child(NodeSpec::text(&text)))
            } else {
                spec.child(NodeSpec::text(&text))
            };
        }
        doc.append_fragment(body, &spec).unwrap();
        texts.push(paragraph);
    }
    (doc, texts, chunks)
}

#[test]
fn matcher_agrees_with_regex_scan() {
    let reference = Regex::new("[A-Za-z]{3,}").unwrap();
    let mut rng = SmallRng::seed_from_u64(0x0505);
    for _ in 0..CASES {
        let text = random_text(&mut rng);
        let expected: Vec<(usize, usize)> =
            reference.find_iter(&text).map(|m| (m.start(), m.end())).collect();
        let actual: Vec<(usize, usize)> = match_words(&text).iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(actual, expected, "text {text:?}");
        for span in match_words(&text) {
            assert!(text.is_char_boundary(span.start) && text.is_char_boundary(span.end));
        }
    }
}

#[test]
fn annotating_twice_equals_annotating_once() {
    let mut rng = SmallRng::seed_from_u64(7);
    let words = interesting();
    for _ in 0..CASES {
        let (mut doc, _, _) = random_doc(&mut rng);
        let body = doc.body();
        annotate(&mut doc, body, &words);
        let once = doc.materialize(body).unwrap();
        let stats = annotate(&mut doc, body, &words);
        let twice = doc.materialize(body).unwrap();
        assert_eq!(stats.anchored, 0);
        assert_dom_eq(&once, &twice, DomSnapshotOptions { ignore_ids: false });
    }
}

#[test]
fn anchors_never_nest_and_text_round_trips() {
    let mut rng = SmallRng::seed_from_u64(42);
    let words = interesting();
    for _ in 0..CASES {
        let (mut doc, texts, _) = random_doc(&mut rng);
        let body = doc.body();
        annotate(&mut doc, body, &words);

        for anchor in find_elements_by_tag(&doc, body, STAR_ANCHOR_TAG) {
            let parent = doc.parent(anchor).unwrap();
            assert!(!is_anchor(&doc, parent));
            assert!(closest_ancestor(&doc, anchor, |k, _| is_anchor(&doc, k)).is_none());
            assert_eq!(doc.children(anchor).len(), 1);
        }

        // Dropping anchor tags and concatenating text gives back the input.
        let paragraphs = doc.children(body).to_vec();
        for (p, expected) in paragraphs.into_iter().zip(&texts) {
            assert_eq!(&doc.text_content(p), expected);
        }

        // No split ever leaves an empty text node behind.
        for key in descendants(&doc, body) {
            if let Some(text) = doc.text(key) {
                assert!(!text.is_empty(), "{}", DomSnapshot::of(&doc, body, Default::default()).unwrap());
            }
        }
    }
}

#[test]
fn every_interesting_occurrence_is_anchored() {
    let mut rng = SmallRng::seed_from_u64(99);
    let words = interesting();
    for _ in 0..CASES {
        let (mut doc, _, chunks) = random_doc(&mut rng);
        let body = doc.body();
        let stats = annotate(&mut doc, body, &words);
        let expected: usize = chunks
            .iter()
            .flat_map(|t| match_words(t))
            .filter(|s| words.contains(s.word.to_ascii_lowercase().as_str()))
            .count();
        assert_eq!(stats.anchored, expected);
        assert_eq!(stats.anchored, find_elements_by_tag(&doc, body, STAR_ANCHOR_TAG).len());
    }
}
