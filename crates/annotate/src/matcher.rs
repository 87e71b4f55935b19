//! Word discovery inside a single text node.

/// One candidate word occurrence. `start..end` are byte offsets into the
/// scanned text and always fall on char boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    pub word: &'a str,
    pub start: usize,
    pub end: usize,
}

pub const MIN_MATCH_LEN: usize = 3;

/// Every maximal run of ASCII letters at least [`MIN_MATCH_LEN`] long, left
/// to right.
///
/// Runs are delimited by any other char, so `"café"` yields `"caf"` and
/// `"abc123def"` yields `"abc"` and `"def"`.
pub fn match_words(text: &str) -> Vec<Span<'_>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        if !bytes[pos].is_ascii_alphabetic() {
            pos += 1;
            continue;
        }
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos - start >= MIN_MATCH_LEN {
            // ASCII bytes never sit inside a multi-byte sequence.
            spans.push(Span {
                word: &text[start..pos],
                start,
                end: pos,
            });
        }
    }
    spans
}
