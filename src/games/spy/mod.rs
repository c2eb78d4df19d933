//! The spy party game.
//!
//! Leaf components are pure and individually testable: the word pool,
//! role assignment, the turn engine, and the rules. The
//! [`SessionController`] composes them into the state machine callers
//! drive.

mod controller;
mod error;
mod outcome;
mod roles;
mod session;
mod timer;
mod turns;
mod types;
mod word_pool;

pub mod invariants;
pub mod rules;

pub use controller::SessionController;
pub use error::GameError;
pub use outcome::{
    GenerationUpdate, Outcome, PendingCategory, RevealStep, RoleCard, RoundStart,
    SingleRoundProgress,
};
pub use roles::{
    MIN_PLAYERS, OUTSIDER_START_REROLL_PROBABILITY, RoleAssignment, assign, biased_starter,
    max_spies, validate_counts, weighted_reroll,
};
pub use session::{FinalGuess, Session, SessionConfig};
pub use timer::{DiscussionTimer, TimerEvent};
pub use turns::{Direction, TurnEngine, random_active_starter};
pub use types::{Difficulty, GameMode, GameResult, Phase, Player, ResultDetail, Side, Tally};
pub use word_pool::{Catalog, ConsumptionLedger, LOW_POOL_THRESHOLD, PoolStatus, WordPool};
