//! File-backed and in-memory stores.

use super::{PersistenceStore, StoreError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// JSON document in a file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<serde_json::Value>, StoreError> {
        if !self.path.exists() {
            debug!("Store file not found, starting empty");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&content)?;
        debug!(bytes = content.len(), "Store loaded");
        Ok(Some(value))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn save(&mut self, value: &serde_json::Value) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, content)?;
        info!("Store saved");
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<serde_json::Value>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &serde_json::Value) -> Result<(), StoreError> {
        self.value = Some(value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&serde_json::json!({ "a": 1 })).unwrap();
        assert_eq!(store.load().unwrap(), Some(serde_json::json!({ "a": 1 })));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::new("/definitely/not/here/spy_party.json");
        assert!(store.load().unwrap().is_none());
    }
}
