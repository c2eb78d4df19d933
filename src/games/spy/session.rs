//! The session aggregate: configuration plus the state of one game.

use super::error::GameError;
use super::roles::{RoleAssignment, validate_counts};
use super::turns::TurnEngine;
use super::types::{GameMode, GameResult, Phase, Player, Tally};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Table settings chosen before a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionConfig {
    /// Player names; their count is the player count.
    player_names: Vec<String>,
    /// Number of Spies.
    spy_count: usize,
    /// Game mode.
    mode: GameMode,
    /// Categories a secret may be drawn from. Empty means all.
    categories: Vec<String>,
}

impl SessionConfig {
    /// Creates a configuration with default names `Player 1..=N`.
    #[instrument]
    pub fn new(player_count: usize, spy_count: usize, mode: GameMode, categories: Vec<String>) -> Self {
        Self {
            player_names: (1..=player_count).map(default_name).collect(),
            spy_count,
            mode,
            categories,
        }
    }

    /// Replaces the names. Missing or blank entries fall back to `Player N`;
    /// extra names are ignored.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = names.into_iter();
        for (i, slot) in self.player_names.iter_mut().enumerate() {
            *slot = names
                .next()
                .map(|n| n.into().trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| default_name(i + 1));
        }
        self
    }

    /// Number of players.
    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// Checks player and spy counts.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid counts.
    pub fn validate(&self) -> Result<(), GameError> {
        validate_counts(self.player_count(), self.spy_count)
    }

    pub(super) fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub(super) fn add_category(&mut self, category: &str) {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
    }
}

fn default_name(n: usize) -> String {
    format!("Player {}", n)
}

/// Final guess waiting for a caught Spy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct FinalGuess {
    /// The caught Spy.
    guesser: usize,
    /// Shuffled options, including the secret.
    options: Vec<String>,
}

/// One game, from role reveal to result.
///
/// Owned by the controller, which is the only thing that mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub(super) mode: GameMode,
    pub(super) spy_count: usize,
    pub(super) category: String,
    pub(super) secret: String,
    pub(super) players: Vec<Player>,
    pub(super) reveal_order: Vec<usize>,
    pub(super) reveal_cursor: usize,
    pub(super) first_starter: Option<usize>,
    pub(super) turns: TurnEngine,
    pub(super) accusations: BTreeSet<usize>,
    pub(super) pending_guess: Option<FinalGuess>,
    pub(super) phase: Phase,
    pub(super) result: Option<GameResult>,
}

impl Session {
    /// Builds a session in the role-reveal phase.
    #[instrument(skip(config, secret, assignment), fields(category = %category))]
    pub(super) fn start(
        config: &SessionConfig,
        category: String,
        secret: String,
        assignment: RoleAssignment,
        first_starter: Option<usize>,
    ) -> Self {
        let players = config
            .player_names
            .iter()
            .zip(&assignment.roles)
            .map(|(name, &spy)| Player::new(name.clone(), spy))
            .collect();

        debug!(players = config.player_count(), spies = config.spy_count, "Session started");
        Self {
            mode: config.mode,
            spy_count: config.spy_count,
            category,
            secret,
            players,
            reveal_order: assignment.reveal_order,
            reveal_cursor: 0,
            first_starter,
            turns: TurnEngine::new(),
            accusations: BTreeSet::new(),
            pending_guess: None,
            phase: Phase::RoleReveal,
            result: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Number of Spies.
    pub fn spy_count(&self) -> usize {
        self.spy_count
    }

    /// Category of the secret.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The secret word. Callers decide who may see it.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The roster, by index.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Order in which roles are viewed.
    pub fn reveal_order(&self) -> &[usize] {
        &self.reveal_order
    }

    /// Position in the reveal order.
    pub fn reveal_cursor(&self) -> usize {
        self.reveal_cursor
    }

    /// Biased first speaker (multi-round only).
    pub fn first_starter(&self) -> Option<usize> {
        self.first_starter
    }

    /// Turn state (multi-round only).
    pub fn turns(&self) -> &TurnEngine {
        &self.turns
    }

    /// Single-round accusations so far.
    pub fn accusations(&self) -> &BTreeSet<usize> {
        &self.accusations
    }

    /// Final guess in progress, if any.
    pub fn pending_guess(&self) -> Option<&FinalGuess> {
        self.pending_guess.as_ref()
    }

    /// Result, once decided.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Active players per side.
    pub fn tally(&self) -> Tally {
        Tally::of(&self.players)
    }

    /// Indices of the Spies, ascending.
    pub fn outsiders(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_outsider().then_some(i))
            .collect()
    }

    /// Indices of players still in play.
    pub fn active_players(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_active().then_some(i))
            .collect()
    }

    /// Players who may still be named in the single-round accusation.
    pub fn accusable_players(&self) -> Vec<usize> {
        (0..self.players.len())
            .filter(|i| !self.accusations.contains(i))
            .collect()
    }

    /// Player whose role is shown next, while roles are being revealed.
    pub fn current_reveal(&self) -> Option<usize> {
        self.reveal_order.get(self.reveal_cursor).copied()
    }

    pub(super) fn resolve(&mut self, result: GameResult) {
        self.pending_guess = None;
        self.phase = Phase::Resolved;
        self.result = Some(result);
    }

    pub(super) fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    pub(super) fn check_index(&self, index: usize) -> Result<(), GameError> {
        if index < self.players.len() {
            Ok(())
        } else {
            Err(GameError::PlayerOutOfRange {
                index,
                player_count: self.players.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::spy::types::Difficulty;

    #[test]
    fn test_names_fall_back_per_slot() {
        let config = SessionConfig::new(4, 1, GameMode::SingleRound, Vec::new())
            .with_names(["Ana", "  ", "Bo"]);
        assert_eq!(
            config.player_names(),
            &["Ana", "Player 2", "Bo", "Player 4"]
        );
    }

    #[test]
    fn test_validate_delegates_to_counts() {
        let mode = GameMode::MultiRound(Difficulty::Hard);
        assert!(SessionConfig::new(3, 1, mode, Vec::new()).validate().is_ok());
        assert!(SessionConfig::new(3, 2, mode, Vec::new()).validate().is_err());
        assert!(SessionConfig::new(2, 1, mode, Vec::new()).validate().is_err());
    }

    #[test]
    fn test_add_category_once() {
        let mut config = SessionConfig::new(3, 1, GameMode::SingleRound, vec!["USA".to_string()]);
        config.add_category("USA");
        config.add_category("Food");
        assert_eq!(config.categories(), &["USA", "Food"]);
    }
}
