//! Persisted key/value stores.
//!
//! The calendar keeps its whole event list as one string value under
//! [`STORAGE_KEY`]. [`FileStore`] keeps every key in a single JSON object on
//! disk; [`MemoryStore`] is the in-process equivalent.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CalGridError, CalGridResult};

/// Key under which the serialized event list is stored.
pub const STORAGE_KEY: &str = "calgrid.events";

const STORE_FILE: &str = "store.json";

/// Durable string storage keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CalGridResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()>;
    fn remove(&mut self, key: &str) -> CalGridResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CalGridResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by `store.json` in a data directory.
///
/// The file is read on every `get` and rewritten on every `set`, through a
/// temporary file and a rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path) -> CalGridResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(FileStore {
            path: data_dir.join(STORE_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> CalGridResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            CalGridError::Store(format!("Could not read {}: {e}", self.path.display()))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> CalGridResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let temp = self.path.with_extension("json.tmp");

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "Wrote store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> CalGridResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> CalGridResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
