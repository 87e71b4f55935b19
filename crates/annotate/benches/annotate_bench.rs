use annotate::{annotate, match_words};
use core_types::{Word, WordSet};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html::{Document, NodeSpec};

const SMALL_PARAGRAPHS: usize = 64;
const LARGE_PARAGRAPHS: usize = 5_000;

const SENTENCE: &str = "The quick brown fox jumps over the lazy dog while an apple falls \
                        from the tree and osmosis carries water through the roots. ";

fn make_document(paragraphs: usize) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    for i in 0..paragraphs {
        let spec = NodeSpec::element("div")
            .attr("class", "post")
            .child(NodeSpec::paragraph(&SENTENCE.repeat(1 + i % 3)))
            .child(NodeSpec::element("code").child(NodeSpec::text("let apple = tree.fall();")));
        doc.append_fragment(body, &spec).unwrap();
    }
    doc
}

fn interesting() -> WordSet {
    ["apple", "osmosis", "water", "lazy"]
        .into_iter()
        .filter_map(Word::normalize_token)
        .collect()
}

fn bench_match_words(c: &mut Criterion) {
    let text = SENTENCE.repeat(64);
    c.bench_function("bench_match_words", |b| {
        b.iter(|| black_box(match_words(black_box(&text)).len()));
    });
}

fn bench_annotate_small(c: &mut Criterion) {
    let words = interesting();
    c.bench_function("bench_annotate_small", |b| {
        b.iter_batched(
            || make_document(SMALL_PARAGRAPHS),
            |mut doc| {
                let body = doc.body();
                black_box(annotate(&mut doc, body, &words));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_annotate_large(c: &mut Criterion) {
    let words = interesting();
    c.bench_function("bench_annotate_large", |b| {
        b.iter_batched(
            || make_document(LARGE_PARAGRAPHS),
            |mut doc| {
                let body = doc.body();
                black_box(annotate(&mut doc, body, &words));
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_reannotate_noop(c: &mut Criterion) {
    let words = interesting();
    let mut doc = make_document(LARGE_PARAGRAPHS);
    let body = doc.body();
    annotate(&mut doc, body, &words);
    c.bench_function("bench_reannotate_noop", |b| {
        b.iter(|| black_box(annotate(&mut doc, body, &words)));
    });
}

criterion_group!(
    benches,
    bench_match_words,
    bench_annotate_small,
    bench_annotate_large,
    bench_reannotate_noop
);
criterion_main!(benches);
