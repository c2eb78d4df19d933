//! Spy Party library - a pass-and-play social deduction engine
//!
//! Players receive hidden roles: Spies who do not know the secret word and
//! Locals who do. The engine deals roles, runs discussion rounds and
//! accusations, and decides who wins.
//!
//! # Architecture
//!
//! - **Games**: the spy game state machine, driven through
//!   [`SessionController`]
//! - **Topics**: async category generation with bounded retry
//! - **Store**: JSON persistence for topics and the player library
//! - **Config**: TOML engine configuration
//!
//! # Example
//!
//! ```
//! use spy_party::{Catalog, GameMode, Difficulty, SessionConfig, SessionController};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), spy_party::GameError> {
//! let mut controller = SessionController::with_seed(Arc::new(Catalog::with_defaults()), 7);
//! controller.configure_session(SessionConfig::new(
//!     5,
//!     1,
//!     GameMode::MultiRound(Difficulty::Easy),
//!     Vec::new(),
//! ))?;
//! let first = controller.start_game()?;
//! let card = controller.view_next_role()?;
//! assert_eq!(*card.index(), first);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod simulation;
mod store;
mod topics;

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig};

// Crate-level exports - Game engine
pub use games::spy::{
    Catalog, ConsumptionLedger, Difficulty, Direction, DiscussionTimer, FinalGuess, GameError,
    GameMode, GameResult, GenerationUpdate, LOW_POOL_THRESHOLD, MIN_PLAYERS,
    OUTSIDER_START_REROLL_PROBABILITY, Outcome, PendingCategory, Phase, Player, PoolStatus,
    ResultDetail, RevealStep, RoleAssignment, RoleCard, RoundStart, Session, SessionConfig,
    SessionController, Side, SingleRoundProgress, Tally, TimerEvent, TurnEngine, WordPool, assign,
    biased_starter, max_spies, random_active_starter, validate_counts, weighted_reroll,
};

// Crate-level exports - Rules and invariants
pub use games::spy::invariants;
pub use games::spy::rules;

// Crate-level exports - Simulation
pub use simulation::{SimulationReport, simulate};

// Crate-level exports - Persistence
pub use store::{
    JsonFileStore, MemoryStore, PersistenceStore, PlayerEntry, PlayerLibrary, StoreError,
    TopicLibrary,
};

// Crate-level exports - Topic generation
pub use topics::{
    DEFAULT_GEMINI_MODEL, DEFAULT_WORD_COUNT, GeminiGenerator, GenerationError,
    GenerationErrorKind, RetryPolicy, TopicGenerator, generate_with_retry,
};
