//! Persisted topic catalog.

use super::{PersistenceStore, StoreError};
use crate::games::spy::Catalog;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize, Deserialize)]
struct TopicDocument {
    #[serde(default)]
    topics: Catalog,
}

/// Loads and saves the category catalog.
///
/// Stored categories are laid over the built-in defaults, so a stored
/// category with a default's name replaces it and new names are added.
#[derive(Debug, Clone)]
pub struct TopicLibrary<S: PersistenceStore> {
    store: S,
}

impl<S: PersistenceStore> TopicLibrary<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Built-in categories overlaid with whatever was saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored document is unreadable.
    #[instrument(skip(self))]
    pub fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let mut catalog = Catalog::with_defaults();
        match self.store.load()? {
            Some(value) => {
                let document: TopicDocument = serde_json::from_value(value)?;
                catalog.merge(document.topics);
                info!(categories = catalog.len(), "Topic catalog loaded");
            }
            None => warn!("No stored topics, using defaults"),
        }
        Ok(catalog)
    }

    /// Saves the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be written.
    #[instrument(skip(self, catalog), fields(categories = catalog.len()))]
    pub fn save_catalog(&mut self, catalog: &Catalog) -> Result<(), StoreError> {
        let value = serde_json::json!({ "topics": catalog });
        self.store.save(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_empty_store_yields_defaults() {
        let library = TopicLibrary::new(MemoryStore::new());
        assert_eq!(library.load_catalog().unwrap(), Catalog::with_defaults());
    }

    #[test]
    fn test_stored_topics_overlay_defaults() {
        let mut library = TopicLibrary::new(MemoryStore::new());
        let mut catalog = Catalog::new();
        catalog
            .add_or_replace("Rivers", vec!["Nile".to_string(), "Danube".to_string()])
            .unwrap();
        library.save_catalog(&catalog).unwrap();

        let loaded = library.load_catalog().unwrap();
        assert_eq!(loaded.len(), Catalog::with_defaults().len() + 1);
        assert_eq!(loaded.get("Rivers").unwrap(), ["Nile", "Danube"]);
    }
}
