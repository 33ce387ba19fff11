use std::{
    collections::HashMap,
    future::Future,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::fs::operations::{read_locked, remove_if_exists, write_locked};

/// Interface for a small string key-value store, the way a browser's local storage works.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>>;

    /// Overwrites whatever was stored under `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>>;

    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> {
        self.deref().set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> {
        self.deref().remove(key)
    }
}

/// Keeps every key in its own json file inside a directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(anyhow!("Illegal storage key {key:?}"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    /// Bytes that aren't utf-8 are replaced instead of failing the read.
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        let Some(bytes) = read_locked(&path).await? else {
            return Ok(None);
        };
        let value = String::from_utf8(bytes).unwrap_or_else(|e| {
            warn!("{path:?} is not valid utf-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        });
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        write_locked(&path, value.as_bytes()).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        debug!("Removing {path:?}");
        remove_if_exists(&path).await?;
        Ok(())
    }
}

/// Store that lives only as long as the process. Handy for tests and embedding.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| anyhow!("Memory store was poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values()?.remove(key);
        Ok(())
    }
}
