//! Normalized word keys.
//!
//! A [`Word`] is the canonical key used for lookups, stars and anchor
//! `data-key` attributes: trimmed, ASCII-lowercased, 3..=99 characters of
//! English letters (inner apostrophes and hyphens are accepted so that
//! selections like `don't` or `well-known` can still be queried).

use crate::CoreError;
use std::collections::HashSet;
use std::fmt;

pub const MIN_WORD_LEN: usize = 3;
pub const MAX_WORD_LEN: usize = 99;

/// Set of normalized words eligible for annotation.
pub type WordSet = HashSet<Word>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    /// Normalize raw input (selection text, store key, matched token).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if !is_english_word(trimmed) {
            return Err(CoreError::Input(raw.to_string()));
        }
        let len = trimmed.len();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) {
            return Err(CoreError::Input(raw.to_string()));
        }
        Ok(Word(trimmed.to_ascii_lowercase()))
    }

    /// Normalized form of a matcher token, or `None` if it is not a valid key.
    pub fn normalize_token(token: &str) -> Option<Self> {
        Word::parse(token).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// `^[a-zA-Z'-]+$`
pub fn is_english_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphabetic() || b == b'\'' || b == b'-')
}
