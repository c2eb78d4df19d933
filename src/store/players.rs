//! Persisted player library.

use super::{PersistenceStore, StoreError};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// A saved player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerEntry {
    /// Optional avatar reference.
    #[serde(default)]
    image: Option<String>,
    /// True for players added by hand.
    #[serde(default = "default_custom")]
    custom: bool,
    /// When the player was added.
    #[serde(default = "Utc::now")]
    added_at: DateTime<Utc>,
}

fn default_custom() -> bool {
    true
}

impl PlayerEntry {
    /// Creates a hand-added entry stamped with the current time.
    pub fn new(image: Option<String>) -> Self {
        Self {
            image,
            custom: true,
            added_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LibraryDocument {
    #[serde(default)]
    players: BTreeMap<String, PlayerEntry>,
}

/// Named players kept between sessions. Every change is saved at once.
#[derive(Debug, Clone)]
pub struct PlayerLibrary<S: PersistenceStore> {
    store: S,
    players: BTreeMap<String, PlayerEntry>,
}

impl<S: PersistenceStore> PlayerLibrary<S> {
    /// Loads the library from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored document is unreadable.
    #[instrument(skip(store))]
    pub fn open(store: S) -> Result<Self, StoreError> {
        let players = match store.load()? {
            Some(value) => {
                let document: LibraryDocument = serde_json::from_value(value)?;
                document.players
            }
            None => BTreeMap::new(),
        };
        info!(count = players.len(), "Player library opened");
        Ok(Self { store, players })
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    /// Library players not already in `taken`, sorted.
    pub fn available(&self, taken: &[String]) -> Vec<String> {
        self.players
            .keys()
            .filter(|name| !taken.contains(name))
            .cloned()
            .collect()
    }

    /// Looks up a player.
    pub fn get(&self, name: &str) -> Option<&PlayerEntry> {
        self.players.get(name)
    }

    /// Number of saved players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when no players are saved.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Adds a player. Returns false for a blank or existing name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if saving fails.
    #[instrument(skip(self))]
    pub fn add(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        if name.is_empty() || self.players.contains_key(name) {
            debug!("Player not added");
            return Ok(false);
        }
        self.players.insert(name.to_string(), PlayerEntry::new(None));
        self.persist()?;
        Ok(true)
    }

    /// Removes a player. Returns false if they were not saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if saving fails.
    #[instrument(skip(self))]
    pub fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        if self.players.remove(name).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let value = serde_json::json!({ "players": &self.players });
        self.store.save(&value)
    }
}
