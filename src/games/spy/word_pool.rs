//! Category catalog and per-session word consumption.
//!
//! A secret is never reused within a session until every word of its
//! category has been drawn; at that point the category's ledger entry is
//! cleared and drawing starts over from the full list.

use super::error::GameError;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Categories with fewer unused words than this are reported as running low.
pub const LOW_POOL_THRESHOLD: usize = 5;

/// Mapping from category name to its candidate secrets.
///
/// Word lists keep their insertion order and never contain duplicates or
/// blank entries. Categories are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog shipped with the game.
    #[instrument]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (name, words) in DEFAULT_TOPICS {
            // Built-in lists are non-empty.
            let _ = catalog.add_or_replace(*name, words.iter().map(|w| w.to_string()));
        }
        catalog
    }

    /// Inserts a category, replacing any existing list with the same name.
    ///
    /// Names and words are trimmed; blank words and duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidCategory`] if the name is blank or no
    /// usable words remain.
    #[instrument(skip(self, name, words), fields(name = %name.as_ref()))]
    pub fn add_or_replace(
        &mut self,
        name: impl AsRef<str>,
        words: impl IntoIterator<Item = String>,
    ) -> Result<usize, GameError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(GameError::InvalidCategory("category name is blank".to_string()));
        }

        let mut seen = HashSet::new();
        let cleaned: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect();

        if cleaned.is_empty() {
            warn!("Rejecting category with no usable words");
            return Err(GameError::InvalidCategory(format!("{} has no usable words", name)));
        }

        let count = cleaned.len();
        let replaced = self.categories.insert(name.to_string(), cleaned).is_some();
        info!(count, replaced, "Category stored");
        Ok(count)
    }

    /// Returns the words of a category.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Returns true if the category exists.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Category names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Iterates over categories and their words.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.categories.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if there are no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Overlays `other` on top of this catalog; its categories win on conflict.
    #[instrument(skip_all, fields(base = self.len(), overlay = other.len()))]
    pub fn merge(&mut self, other: Catalog) {
        for (name, words) in other.categories {
            if let Err(e) = self.add_or_replace(&name, words) {
                warn!(category = %name, error = %e, "Skipping unusable stored category");
            }
        }
    }
}

/// Remaining words of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PoolStatus {
    /// Category name.
    category: String,
    /// Words not yet drawn this session.
    remaining: usize,
    /// Words in the category.
    total: usize,
}

impl PoolStatus {
    /// Returns true when fewer than [`LOW_POOL_THRESHOLD`] words remain.
    pub fn is_low(&self) -> bool {
        self.remaining < LOW_POOL_THRESHOLD
    }
}

/// Words already drawn this session, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumptionLedger {
    used: HashMap<String, HashSet<String>>,
}

impl ConsumptionLedger {
    /// Words drawn from a category so far.
    pub fn used(&self, category: &str) -> Option<&HashSet<String>> {
        self.used.get(category)
    }

    fn record(&mut self, category: &str, word: String) {
        self.used.entry(category.to_string()).or_default().insert(word);
    }

    fn reset(&mut self, category: &str) {
        self.used.remove(category);
    }

    fn clear(&mut self) {
        self.used.clear();
    }
}

/// Owns the catalog snapshot and the session's consumption ledger.
///
/// The catalog is shared behind an [`Arc`]; accepting a new category clones
/// it on write, so snapshots handed out earlier never change.
#[derive(Debug, Clone)]
pub struct WordPool {
    catalog: Arc<Catalog>,
    ledger: ConsumptionLedger,
}

impl WordPool {
    /// Creates a pool over the given catalog.
    #[instrument(skip(catalog), fields(categories = catalog.len()))]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            ledger: ConsumptionLedger::default(),
        }
    }

    /// Returns the current catalog snapshot.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Returns the consumption ledger.
    pub fn ledger(&self) -> &ConsumptionLedger {
        &self.ledger
    }

    /// Draws an unused secret from a category.
    ///
    /// When every word has been drawn the category's ledger is reset first,
    /// so a non-empty category always yields a word.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownCategory`] or [`GameError::EmptyCategory`].
    #[instrument(skip(self, rng))]
    pub fn select_secret<R: Rng + ?Sized>(
        &mut self,
        category: &str,
        rng: &mut R,
    ) -> Result<String, GameError> {
        let candidates = self
            .catalog
            .get(category)
            .ok_or_else(|| GameError::UnknownCategory(category.to_string()))?;
        if candidates.is_empty() {
            return Err(GameError::EmptyCategory(category.to_string()));
        }

        let mut available: Vec<&String> = match self.ledger.used(category) {
            Some(used) => candidates.iter().filter(|w| !used.contains(*w)).collect(),
            None => candidates.iter().collect(),
        };

        if available.is_empty() {
            info!(category, total = candidates.len(), "Word pool exhausted, resetting");
            self.ledger.reset(category);
            available = candidates.iter().collect();
        }

        let secret = available
            .choose(rng)
            .map(|w| (*w).clone())
            .ok_or_else(|| GameError::EmptyCategory(category.to_string()))?;

        self.ledger.record(category, secret.clone());
        debug!(category, remaining = available.len() - 1, "Secret selected");
        Ok(secret)
    }

    /// Remaining and total word counts for each known category.
    #[instrument(skip(self, categories))]
    pub fn pool_status(&self, categories: &[String]) -> Vec<PoolStatus> {
        categories
            .iter()
            .filter_map(|name| {
                let words = self.catalog.get(name)?;
                let remaining = match self.ledger.used(name) {
                    Some(used) => words.iter().filter(|w| !used.contains(*w)).count(),
                    None => words.len(),
                };
                Some(PoolStatus {
                    category: name.clone(),
                    remaining,
                    total: words.len(),
                })
            })
            .collect()
    }

    /// Categories that are running low. Advisory only.
    #[instrument(skip(self, categories))]
    pub fn low_pools(&self, categories: &[String]) -> Vec<PoolStatus> {
        let low: Vec<PoolStatus> = self
            .pool_status(categories)
            .into_iter()
            .filter(PoolStatus::is_low)
            .collect();
        if !low.is_empty() {
            warn!(count = low.len(), "Categories running low on unused words");
        }
        low
    }

    /// Adds or replaces a category (copy-on-write) and resets its ledger.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidCategory`] without touching the catalog
    /// when the category is unusable.
    #[instrument(skip(self, words))]
    pub fn accept_category(&mut self, name: &str, words: Vec<String>) -> Result<usize, GameError> {
        // Validate on a scratch copy so a rejection cannot clone the shared catalog.
        let mut scratch = Catalog::new();
        scratch.add_or_replace(name, words.clone())?;

        let count = Arc::make_mut(&mut self.catalog).add_or_replace(name, words)?;
        self.ledger.reset(name.trim());
        Ok(count)
    }

    /// Forgets every drawn word.
    #[instrument(skip(self))]
    pub fn reset_ledger(&mut self) {
        self.ledger.clear();
    }
}

const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    (
        "Pop Culture",
        &[
            "Times Square Billboard",
            "Star Trek Enterprise",
            "Hogwarts Great Hall",
            "The Millennium Falcon",
            "Nintendo Switch",
            "Oscar Awards Stage",
            "Taylor Swift Concert",
            "The Daily Show Set",
        ],
    ),
    (
        "Geography",
        &[
            "Mount Everest Base Camp",
            "Suez Canal",
            "Galapagos Islands",
            "Sahara Desert",
            "The Amazon River",
            "Tokyo Imperial Palace",
            "Machu Picchu Ruins",
            "The Great Barrier Reef",
        ],
    ),
    (
        "USA",
        &[
            "Statue of Liberty",
            "Yellowstone Geyser",
            "New York Stock Exchange",
            "White House Oval Office",
            "Golden Gate Bridge",
            "Wrigley Field Stadium",
            "Route 66 Diner",
            "Las Vegas Strip",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tiny_pool() -> WordPool {
        let mut catalog = Catalog::new();
        catalog
            .add_or_replace("Tiny", vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        WordPool::new(Arc::new(catalog))
    }

    #[test]
    fn test_add_or_replace_cleans_words() {
        let mut catalog = Catalog::new();
        let count = catalog
            .add_or_replace(
                " Food ",
                vec![" Pizza".to_string(), "Pizza".to_string(), "  ".to_string(), "Taco".to_string()],
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(catalog.get("Food").unwrap(), ["Pizza", "Taco"]);
    }

    #[test]
    fn test_add_rejects_empty() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_or_replace("Empty", Vec::new()).is_err());
        assert!(catalog.add_or_replace("  ", vec!["x".to_string()]).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_draws_every_word_before_repeating() {
        let mut pool = tiny_pool();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut drawn: Vec<String> = (0..3)
            .map(|_| pool.select_secret("Tiny", &mut rng).unwrap())
            .collect();
        drawn.sort();
        assert_eq!(drawn, ["a", "b", "c"]);

        // Exhausted: the next draw resets the ledger and succeeds.
        let next = pool.select_secret("Tiny", &mut rng).unwrap();
        assert!(["a", "b", "c"].contains(&next.as_str()));
        assert_eq!(pool.ledger().used("Tiny").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_category() {
        let mut pool = tiny_pool();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            pool.select_secret("Nope", &mut rng),
            Err(GameError::UnknownCategory("Nope".to_string()))
        );
    }

    #[test]
    fn test_pool_status_counts_remaining() {
        let mut pool = tiny_pool();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        pool.select_secret("Tiny", &mut rng).unwrap();
        let status = pool.pool_status(&["Tiny".to_string(), "Missing".to_string()]);
        assert_eq!(status.len(), 1);
        assert_eq!(*status[0].remaining(), 2);
        assert_eq!(*status[0].total(), 3);
        assert!(status[0].is_low());
    }

    #[test]
    fn test_accept_category_is_copy_on_write() {
        let mut pool = tiny_pool();
        let snapshot = Arc::clone(pool.catalog());
        pool.accept_category("New", vec!["x".to_string()]).unwrap();
        assert!(pool.catalog().contains("New"));
        assert!(!snapshot.contains("New"));
    }

    #[test]
    fn test_rejected_category_leaves_catalog_alone() {
        let mut pool = tiny_pool();
        let before = Arc::clone(pool.catalog());
        assert!(pool.accept_category("Bad", Vec::new()).is_err());
        assert!(Arc::ptr_eq(&before, pool.catalog()));
    }

    #[test]
    fn test_defaults_have_three_categories() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.names(), ["Geography", "Pop Culture", "USA"]);
        assert!(catalog.iter().all(|(_, words)| words.len() == 8));
    }
}
