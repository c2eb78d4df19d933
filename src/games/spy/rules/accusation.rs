//! Accusation handling for multi-round play.

use super::super::error::GameError;
use super::super::types::{GameMode, GameResult, Phase, Player};
use super::win::evaluate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// What an accusation led to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// A Spy was caught in Easy mode and must now make a final guess.
    /// No win check has run yet.
    FinalGuessPending {
        /// The caught Spy.
        accused: usize,
    },
    /// A Spy was caught and play continues.
    OutsiderEliminated {
        /// The caught Spy.
        accused: usize,
    },
    /// The accused was not an active Spy; they are out and play continues.
    WrongAccusation {
        /// The wrongly accused player.
        accused: usize,
    },
    /// The accusation ended the game.
    Decided {
        /// The accused player.
        accused: usize,
        /// Whether the accused was an active Spy.
        caught_outsider: bool,
        /// Final result.
        result: GameResult,
    },
}

/// Applies an accusation to the roster.
///
/// An active Spy is caught: in Easy mode the final guess is offered before
/// any win check, in Hard mode the win check runs at once. Anyone else
/// (including a player already out) is removed as a wrong accusation and the
/// win check runs. Re-eliminating an inactive player changes nothing.
///
/// # Errors
///
/// Returns [`GameError::PlayerOutOfRange`] for a bad index and
/// [`GameError::WrongPhase`] when called for a single-round game.
#[instrument(skip(players))]
pub fn resolve_accusation(
    players: &mut [Player],
    accused: usize,
    mode: GameMode,
) -> Result<Resolution, GameError> {
    if !mode.is_multi_round() {
        return Err(GameError::WrongPhase {
            expected: Phase::Discussion,
            actual: Phase::SingleRoundAccusation,
        });
    }

    let player_count = players.len();
    let target = players
        .get_mut(accused)
        .ok_or(GameError::PlayerOutOfRange {
            index: accused,
            player_count,
        })?;

    let caught_outsider = target.is_active() && target.is_outsider();
    if !target.is_active() {
        warn!(accused, "Accused player was already out of play");
    }
    target.eliminate();

    if caught_outsider {
        info!(accused, "Spy caught");
        if mode.offers_final_guess() {
            return Ok(Resolution::FinalGuessPending { accused });
        }
    } else {
        info!(accused, "Wrong accusation");
    }

    Ok(match evaluate(players) {
        Some(result) => Resolution::Decided {
            accused,
            caught_outsider,
            result,
        },
        None if caught_outsider => Resolution::OutsiderEliminated { accused },
        None => Resolution::WrongAccusation { accused },
    })
}
