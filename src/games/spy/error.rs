//! Errors raised by the spy game engine.
//!
//! Configuration errors and invalid state transitions are caller mistakes
//! and are rejected loudly; none of them leave the session half-mutated.

use super::types::Phase;

/// Error returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// Fewer players than the game supports.
    #[display("At least {} players are required, got {}", minimum, actual)]
    TooFewPlayers {
        /// Minimum supported player count.
        minimum: usize,
        /// Requested player count.
        actual: usize,
    },

    /// Spy count outside `1..=floor(players / 3)`.
    #[display("Spy count {} is outside 1..={} for {} players", spy_count, maximum, player_count)]
    InvalidSpyCount {
        /// Requested spy count.
        spy_count: usize,
        /// Largest spy count allowed for this table.
        maximum: usize,
        /// Requested player count.
        player_count: usize,
    },

    /// Category is not in the catalog.
    #[display("Unknown category: {}", _0)]
    UnknownCategory(String),

    /// Category exists but has no candidate words.
    #[display("Category {} has no words", _0)]
    EmptyCategory(String),

    /// Category name or word list rejected by the catalog.
    #[display("Invalid category: {}", _0)]
    InvalidCategory(String),

    /// No session configuration has been supplied yet.
    #[display("Session has not been configured")]
    NotConfigured,

    /// Operation is not valid in the current phase.
    #[display("Operation requires phase {}, but session is in {}", expected, actual)]
    WrongPhase {
        /// Phase the operation needs.
        expected: Phase,
        /// Phase the session is actually in.
        actual: Phase,
    },

    /// A game is already running.
    #[display("A game is already in progress ({})", _0)]
    GameInProgress(Phase),

    /// Player index does not exist.
    #[display("Player {} does not exist (table has {} players)", index, player_count)]
    PlayerOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of players at the table.
        player_count: usize,
    },

    /// Player has already been eliminated.
    #[display("Player {} is no longer in play", _0)]
    PlayerInactive(usize),

    /// Player was already accused this round.
    #[display("Player {} has already been accused", _0)]
    AlreadyAccused(usize),

    /// Nothing is waiting for review.
    #[display("No generated category is awaiting review")]
    NoPendingCategory,

    /// A generation request is already running.
    #[display("A category generation request is already in flight")]
    GenerationInFlight,

    /// Generation was requested outside a tokio runtime.
    #[display("Category generation requires a running tokio runtime")]
    NoRuntime,

    /// Every player is eliminated yet no side has won.
    #[display("No active players remain and no win condition fired")]
    NoActivePlayers,

    /// An engine invariant was broken.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for GameError {}
