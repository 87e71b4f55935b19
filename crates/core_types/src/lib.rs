mod error;
mod word;

pub use error::CoreError;
pub use word::{MAX_WORD_LEN, MIN_WORD_LEN, Word, WordSet, is_english_word};

/// Which annotation feature produced an anchor element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Persistent annotation for a starred word.
    Star,
    /// Transient annotation for the current text selection.
    Query,
}
