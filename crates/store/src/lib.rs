//! Collaborators of the annotation engine and their in-process backends.
//!
//! The engine only talks to [`StarredWords`] and [`DefinitionLookup`]; the
//! rest of this crate is a key/value storage with two areas (`sync` for
//! stars and settings, `local` for the definition cache) persisted as one
//! JSON file.

mod cache;
mod settings;
mod stars;
mod storage;

pub use cache::{CachedLookup, DefinitionCache};
pub use settings::{HighlightStyle, SETTINGS_KEY, Settings, Theme};
pub use stars::SyncStarStore;
pub use storage::{KeyValueStorage, StorageArea};

use core_types::{CoreError, Word};
use std::sync::Arc;

/// Source of the interesting word set and target of star toggles.
pub trait StarredWords {
    fn list_starred(&self) -> Result<Vec<Word>, CoreError>;

    /// Star `word`; returns its normalized form. Starring twice is a no-op.
    fn star(&self, word: &str) -> Result<Word, CoreError>;

    /// Unstar `word`; returns its normalized form. Unknown words are a no-op.
    fn unstar(&self, word: &str) -> Result<Word, CoreError>;

    fn is_starred(&self, word: &Word) -> Result<bool, CoreError> {
        Ok(self.list_starred()?.contains(word))
    }
}

/// Dictionary lookup: one or more definitions per word.
pub trait DefinitionLookup {
    fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError>;
}

impl<T: StarredWords + ?Sized> StarredWords for &T {
    fn list_starred(&self) -> Result<Vec<Word>, CoreError> {
        (**self).list_starred()
    }

    fn star(&self, word: &str) -> Result<Word, CoreError> {
        (**self).star(word)
    }

    fn unstar(&self, word: &str) -> Result<Word, CoreError> {
        (**self).unstar(word)
    }

    fn is_starred(&self, word: &Word) -> Result<bool, CoreError> {
        (**self).is_starred(word)
    }
}

impl<T: StarredWords + ?Sized> StarredWords for Arc<T> {
    fn list_starred(&self) -> Result<Vec<Word>, CoreError> {
        (**self).list_starred()
    }

    fn star(&self, word: &str) -> Result<Word, CoreError> {
        (**self).star(word)
    }

    fn unstar(&self, word: &str) -> Result<Word, CoreError> {
        (**self).unstar(word)
    }

    fn is_starred(&self, word: &Word) -> Result<bool, CoreError> {
        (**self).is_starred(word)
    }
}

impl<T: DefinitionLookup + ?Sized> DefinitionLookup for &T {
    fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError> {
        (**self).lookup(word)
    }
}

impl<T: DefinitionLookup + ?Sized> DefinitionLookup for Arc<T> {
    fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError> {
        (**self).lookup(word)
    }
}
