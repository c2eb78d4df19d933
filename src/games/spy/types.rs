//! Core domain types for the spy game.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A seat at the table.
///
/// The index of a player in the roster is its identity for the whole game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    name: String,
    /// Whether this player is a Spy. Fixed once roles are assigned.
    is_outsider: bool,
    /// Whether this player is still in play.
    is_active: bool,
}

impl Player {
    /// Creates an active player.
    pub fn new(name: impl Into<String>, is_outsider: bool) -> Self {
        Self {
            name: name.into(),
            is_outsider,
            is_active: true,
        }
    }

    /// Returns the player's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this player is a Spy.
    pub fn is_outsider(&self) -> bool {
        self.is_outsider
    }

    /// Returns true while the player has not been eliminated.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the side this player belongs to.
    pub fn side(&self) -> Side {
        if self.is_outsider {
            Side::Outsiders
        } else {
            Side::Insiders
        }
    }

    /// Removes the player from play. Eliminating twice is a no-op.
    pub(crate) fn eliminate(&mut self) {
        self.is_active = false;
    }
}

/// The two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Side {
    /// The Spies: they do not know the secret.
    #[strum(to_string = "Spies")]
    Outsiders,
    /// The Locals: they share the secret.
    #[strum(to_string = "Locals")]
    Insiders,
}

/// Difficulty for multi-round play.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Difficulty {
    /// Every caught Spy gets one final guess at the secret.
    #[default]
    Easy,
    /// Caught Spies are simply removed.
    Hard,
}

/// How a game is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Rounds of discussion with eliminations until a side wins.
    MultiRound(Difficulty),
    /// One pass of accusations, resolved all at once.
    SingleRound,
}

impl GameMode {
    /// Returns true for the multi-round modes.
    pub fn is_multi_round(self) -> bool {
        matches!(self, GameMode::MultiRound(_))
    }

    /// Returns true when caught Spies get a final guess.
    pub fn offers_final_guess(self) -> bool {
        matches!(self, GameMode::MultiRound(Difficulty::Easy))
    }

    /// Short description shown on role cards.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::MultiRound(Difficulty::Easy) => "Easy (Final Guess Available)",
            GameMode::MultiRound(Difficulty::Hard) => "Hard (Survive Only)",
            GameMode::SingleRound => "Single Round (No Turns, Instant Accusation)",
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::MultiRound(Difficulty::Easy)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::MultiRound(difficulty) => write!(f, "{}", difficulty),
            GameMode::SingleRound => write!(f, "Single Round"),
        }
    }
}

/// Phase of a session. Every caller-facing operation checks it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Phase {
    /// Configured, no game running.
    Setup,
    /// Players privately view their roles one by one.
    RoleReveal,
    /// Multi-round discussion; accusations allowed.
    Discussion,
    /// A caught Spy is choosing a final guess.
    AccusationPendingGuess,
    /// Single-round accusations are being collected.
    SingleRoundAccusation,
    /// A side has won.
    Resolved,
}

/// Active player counts per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Spies still in play.
    pub active_outsiders: usize,
    /// Locals still in play.
    pub active_insiders: usize,
}

impl Tally {
    /// Counts the active players on each side.
    pub fn of(players: &[Player]) -> Self {
        players
            .iter()
            .filter(|p| p.is_active)
            .fold(Self::default(), |mut tally, p| {
                if p.is_outsider {
                    tally.active_outsiders += 1;
                } else {
                    tally.active_insiders += 1;
                }
                tally
            })
    }
}

/// Why a game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultDetail {
    /// Every Spy has been eliminated.
    AllOutsidersCaught,
    /// Spies are at least as many as the remaining Locals.
    Parity {
        /// Spies still in play.
        active_outsiders: usize,
        /// Locals still in play.
        active_insiders: usize,
    },
    /// A caught Spy named the secret in the final guess.
    SecretGuessed {
        /// Index of the Spy who guessed.
        guesser: usize,
        /// The secret they named.
        secret: String,
    },
    /// Single round: the accusations matched the Spies exactly.
    PerfectAccusation {
        /// Indices of the Spies, ascending.
        outsiders: Vec<usize>,
    },
    /// Single round: the accusations missed at least one Spy.
    AccusationFailed {
        /// Spies nobody accused, ascending.
        missed: Vec<usize>,
        /// Locals who were accused, ascending.
        wrongly_accused: Vec<usize>,
        /// The secret word, revealed to all.
        secret: String,
    },
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameResult {
    /// Which side won.
    winning_side: Side,
    /// How it was decided.
    detail: ResultDetail,
}

impl GameResult {
    /// Creates a result.
    pub fn new(winning_side: Side, detail: ResultDetail) -> Self {
        Self {
            winning_side,
            detail,
        }
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        match &self.detail {
            ResultDetail::AllOutsidersCaught => {
                "All spies caught! The Locals neutralized the threat.".to_string()
            }
            ResultDetail::Parity {
                active_outsiders,
                active_insiders,
            } => format!(
                "Parity reached ({} Spies vs {} Locals). The Spies outlasted the accusers.",
                active_outsiders, active_insiders
            ),
            ResultDetail::SecretGuessed { secret, .. } => {
                format!("A caught Spy correctly guessed the word: {}.", secret)
            }
            ResultDetail::PerfectAccusation { outsiders } => {
                format!("Perfect accusation! All {} Spies identified.", outsiders.len())
            }
            ResultDetail::AccusationFailed {
                missed,
                wrongly_accused,
                ..
            } => {
                let mut parts = Vec::new();
                if !missed.is_empty() {
                    parts.push(format!("{} Spy(s) missed", missed.len()));
                }
                if !wrongly_accused.is_empty() {
                    parts.push(format!("{} Local(s) wrongly accused", wrongly_accused.len()));
                }
                format!("{}.", parts.join(", "))
            }
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} win: {}", self.winning_side, self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_ignores_inactive() {
        let mut players = vec![
            Player::new("a", true),
            Player::new("b", false),
            Player::new("c", false),
        ];
        players[1].eliminate();
        let tally = Tally::of(&players);
        assert_eq!(tally.active_outsiders, 1);
        assert_eq!(tally.active_insiders, 1);
    }

    #[test]
    fn test_failed_accusation_summary() {
        let result = GameResult::new(
            Side::Outsiders,
            ResultDetail::AccusationFailed {
                missed: vec![1],
                wrongly_accused: vec![2],
                secret: "Suez Canal".to_string(),
            },
        );
        assert_eq!(result.summary(), "1 Spy(s) missed, 1 Local(s) wrongly accused.");
    }

    #[test]
    fn test_mode_flags() {
        assert!(GameMode::MultiRound(Difficulty::Easy).offers_final_guess());
        assert!(!GameMode::MultiRound(Difficulty::Hard).offers_final_guess());
        assert!(!GameMode::SingleRound.is_multi_round());
    }
}
