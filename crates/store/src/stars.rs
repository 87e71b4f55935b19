use crate::StarredWords;
use crate::storage::{KeyValueStorage, StorageArea};
use core_types::{CoreError, Word};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const WORD_PREFIX: &str = "word.";

/// Value stored under `word.<word>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StarEntry {
    /// Unix milliseconds of the first star.
    timespan: u64,
}

/// Starred words kept in the `sync` storage area.
#[derive(Clone, Debug)]
pub struct SyncStarStore {
    storage: KeyValueStorage,
}

impl SyncStarStore {
    pub fn new(storage: KeyValueStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &KeyValueStorage {
        &self.storage
    }

    /// When `word` was starred, in unix milliseconds.
    pub fn starred_at(&self, word: &Word) -> Option<u64> {
        self.storage
            .get_as::<StarEntry>(StorageArea::Sync, &key_for(word))
            .map(|entry| entry.timespan)
    }
}

impl StarredWords for SyncStarStore {
    fn list_starred(&self) -> Result<Vec<Word>, CoreError> {
        let words = self
            .storage
            .keys_with_prefix(StorageArea::Sync, WORD_PREFIX)
            .into_iter()
            .filter_map(|key| {
                let suffix = &key[WORD_PREFIX.len()..];
                let word = Word::normalize_token(suffix);
                if word.is_none() {
                    log::debug!(target: "store.stars", "skipping invalid stored key {key:?}");
                }
                word
            })
            .collect();
        Ok(words)
    }

    fn star(&self, word: &str) -> Result<Word, CoreError> {
        let word = Word::parse(word)?;
        let entry = StarEntry {
            timespan: now_millis(),
        };
        if self
            .storage
            .set_if_absent(StorageArea::Sync, &key_for(&word), &entry)?
        {
            log::debug!(target: "store.stars", "starred {word}");
        }
        Ok(word)
    }

    fn unstar(&self, word: &str) -> Result<Word, CoreError> {
        let word = Word::parse(word)?;
        if self.storage.remove(StorageArea::Sync, &key_for(&word)) {
            log::debug!(target: "store.stars", "unstarred {word}");
        }
        Ok(word)
    }

    fn is_starred(&self, word: &Word) -> Result<bool, CoreError> {
        Ok(self.storage.contains(StorageArea::Sync, &key_for(word)))
    }
}

fn key_for(word: &Word) -> String {
    format!("{WORD_PREFIX}{word}")
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
