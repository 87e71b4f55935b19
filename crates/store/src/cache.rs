use crate::DefinitionLookup;
use crate::storage::{KeyValueStorage, StorageArea};
use core_types::{CoreError, Word};

const CACHE_PREFIX: &str = "cache.definition.";

/// Definitions cached in the `local` storage area.
#[derive(Clone, Debug)]
pub struct DefinitionCache {
    storage: KeyValueStorage,
}

impl DefinitionCache {
    pub fn new(storage: KeyValueStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self, word: &Word) -> Option<Vec<String>> {
        self.storage
            .get_as::<Vec<String>>(StorageArea::Local, &key_for(word))
            .filter(|defs| !defs.is_empty())
    }

    pub fn put(&self, word: &Word, definitions: &[String]) -> Result<(), CoreError> {
        self.storage
            .set(StorageArea::Local, &key_for(word), &definitions)
    }

    pub fn evict(&self, word: &Word) -> bool {
        self.storage.remove(StorageArea::Local, &key_for(word))
    }
}

/// A lookup that answers from [`DefinitionCache`] first and writes back
/// successful answers of the inner lookup.
pub struct CachedLookup<L> {
    inner: L,
    cache: DefinitionCache,
}

impl<L: DefinitionLookup> CachedLookup<L> {
    pub fn new(inner: L, cache: DefinitionCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: DefinitionLookup> DefinitionLookup for CachedLookup<L> {
    fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError> {
        if let Some(hit) = self.cache.get(word) {
            log::trace!(target: "store.cache", "cache hit for {word}");
            return Ok(hit);
        }
        let definitions = self.inner.lookup(word)?;
        if let Err(err) = self.cache.put(word, &definitions) {
            log::warn!(target: "store.cache", "failed to cache {word}: {err}");
        }
        Ok(definitions)
    }
}

fn key_for(word: &Word) -> String {
    format!("{CACHE_PREFIX}{word}")
}
