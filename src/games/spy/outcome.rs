//! Values the controller hands back to callers.

use super::turns::Direction;
use super::types::{GameMode, GameResult};
use crate::topics::GenerationError;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// What one player sees when it is their turn to look at the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct RoleCard {
    /// Roster index.
    index: usize,
    /// Player name.
    name: String,
    /// Whether this player is a Spy.
    is_outsider: bool,
    /// Category everyone knows.
    category: String,
    /// The secret; `None` for Spies.
    secret: Option<String>,
    /// Names of the other Spies; empty for Locals.
    fellow_outsiders: Vec<String>,
    /// Game mode.
    mode: GameMode,
}

impl RoleCard {
    /// Text shown on the card.
    pub fn message(&self) -> String {
        match &self.secret {
            None => {
                let mut text = "YOU ARE THE SPY\n".to_string();
                if !self.fellow_outsiders.is_empty() {
                    text.push_str(&format!(
                        "Your fellow Spies are: {}\n",
                        self.fellow_outsiders.join(", ")
                    ));
                }
                text.push_str(&format!(
                    "Category: {}\nSecret Word: ???\nGoal: Bluff and guess the word.",
                    self.category
                ));
                text
            }
            Some(secret) => format!(
                "YOU ARE A LOCAL\nCategory: {}\nSecret Word: {}\nGoal: Find the Spy without revealing the word.",
                self.category, secret
            ),
        }
    }
}

/// A discussion round that has just begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStart {
    /// Round number, starting at 1.
    pub round: u32,
    /// Player who speaks first.
    pub starter: usize,
    /// Direction the device travels.
    pub direction: Direction,
}

/// Result of moving past a role card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealStep {
    /// Another player views their role next.
    NextPlayer(usize),
    /// Everyone has seen their role; discussion begins.
    Discussion(RoundStart),
    /// Everyone has seen their role; collect single-round accusations.
    SingleRoundAccusation,
}

/// What happened after an accusation or a final guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nobody won; a new round has started.
    NextRound {
        /// Player who just left play.
        accused: usize,
        /// Whether they were a Spy.
        caught_outsider: bool,
        /// The new round.
        round: RoundStart,
    },
    /// A caught Spy must pick the secret from these options.
    FinalGuess {
        /// The caught Spy.
        guesser: usize,
        /// Shuffled choices.
        options: Vec<String>,
    },
    /// The game is over.
    GameOver(GameResult),
}

/// Progress of the single-round accusation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SingleRoundProgress {
    /// Accusation stored; more are needed.
    Recorded {
        /// The accused player.
        accused: usize,
        /// Accusations still to collect.
        remaining: usize,
    },
    /// All accusations are in.
    Resolved(GameResult),
}

/// Generated words waiting for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PendingCategory {
    /// Requested category name.
    category: String,
    /// Generated words.
    words: Vec<String>,
}

impl PendingCategory {
    pub(super) fn into_parts(self) -> (String, Vec<String>) {
        (self.category, self.words)
    }
}

/// A finished generation request.
#[derive(Debug, Clone)]
pub enum GenerationUpdate {
    /// Words arrived and await review.
    Ready(PendingCategory),
    /// The request failed for good.
    Failed {
        /// Requested category name.
        category: String,
        /// Why.
        error: GenerationError,
    },
}
