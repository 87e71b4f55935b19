use core_types::CoreError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Small, user-owned data: starred words, settings.
    Sync,
    /// Machine-local data: the definition cache.
    Local,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct StorageData {
    #[serde(default)]
    sync: BTreeMap<String, Value>,
    #[serde(default)]
    local: BTreeMap<String, Value>,
}

impl StorageData {
    fn area(&self, area: StorageArea) -> &BTreeMap<String, Value> {
        match area {
            StorageArea::Sync => &self.sync,
            StorageArea::Local => &self.local,
        }
    }

    fn area_mut(&mut self, area: StorageArea) -> &mut BTreeMap<String, Value> {
        match area {
            StorageArea::Sync => &mut self.sync,
            StorageArea::Local => &mut self.local,
        }
    }
}

/// Shared key/value storage. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct KeyValueStorage {
    inner: Arc<RwLock<StorageData>>,
}

impl KeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file of the form `{"sync": {..}, "local": {..}}`.
    ///
    /// A missing file yields empty storage.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(target: "store.storage", "{} not found; starting empty", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(CoreError::transport(err)),
        };
        let data: StorageData = serde_json::from_slice(&bytes).map_err(CoreError::transport)?;
        log::debug!(
            target: "store.storage",
            "loaded {} sync and {} local entries from {}",
            data.sync.len(),
            data.local.len(),
            path.display()
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let json = {
            let guard = self.inner.read();
            serde_json::to_vec_pretty(&*guard).map_err(CoreError::transport)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(CoreError::transport)?;
        }
        fs::write(path, json).map_err(CoreError::transport)
    }

    pub fn get(&self, area: StorageArea, key: &str) -> Option<Value> {
        self.inner.read().area(area).get(key).cloned()
    }

    /// Typed read. A stored value of the wrong shape reads as `None`.
    pub fn get_as<T: DeserializeOwned>(&self, area: StorageArea, key: &str) -> Option<T> {
        let value = self.get(area, key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(err) => {
                log::debug!(target: "store.storage", "ignoring malformed value at {key}: {err}");
                None
            }
        }
    }

    pub fn contains(&self, area: StorageArea, key: &str) -> bool {
        self.inner.read().area(area).contains_key(key)
    }

    pub fn set<T: Serialize>(&self, area: StorageArea, key: &str, value: &T) -> Result<(), CoreError> {
        let value = serde_json::to_value(value).map_err(CoreError::transport)?;
        self.inner.write().area_mut(area).insert(key.to_string(), value);
        Ok(())
    }

    /// Insert only when `key` is absent. Returns whether the value was written.
    pub fn set_if_absent<T: Serialize>(
        &self,
        area: StorageArea,
        key: &str,
        value: &T,
    ) -> Result<bool, CoreError> {
        let value = serde_json::to_value(value).map_err(CoreError::transport)?;
        let mut guard = self.inner.write();
        let map = guard.area_mut(area);
        if map.contains_key(key) {
            return Ok(false);
        }
        map.insert(key.to_string(), value);
        Ok(true)
    }

    pub fn remove(&self, area: StorageArea, key: &str) -> bool {
        self.inner.write().area_mut(area).remove(key).is_some()
    }

    /// Keys starting with `prefix`, in sorted order.
    pub fn keys_with_prefix(&self, area: StorageArea, prefix: &str) -> Vec<String> {
        self.inner
            .read()
            .area(area)
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self, area: StorageArea) -> usize {
        self.inner.read().area(area).len()
    }

    pub fn is_empty(&self, area: StorageArea) -> bool {
        self.len(area) == 0
    }
}
