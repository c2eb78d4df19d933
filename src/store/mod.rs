//! Persistence adapters.
//!
//! Stores hold one JSON document each. The engine never touches them
//! directly: callers load a catalog or a player library at startup and save
//! it back after a change.

mod error;
mod json_file;
mod players;
mod topics;

pub use error::StoreError;
pub use json_file::{JsonFileStore, MemoryStore};
pub use players::{PlayerEntry, PlayerLibrary};
pub use topics::TopicLibrary;

/// A place to keep one JSON document.
pub trait PersistenceStore {
    /// Reads the document; `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document exists but cannot be read.
    fn load(&self) -> Result<Option<serde_json::Value>, StoreError>;

    /// Replaces the document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be written.
    fn save(&mut self, value: &serde_json::Value) -> Result<(), StoreError>;
}
