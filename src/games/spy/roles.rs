//! Role assignment and first-turn selection.

use super::error::GameError;
use rand::Rng;
use rand::seq::{SliceRandom, index};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Smallest table the game supports.
pub const MIN_PLAYERS: usize = 3;

/// Chance that a Spy drawn as first speaker is swapped for a Local.
pub const OUTSIDER_START_REROLL_PROBABILITY: f64 = 0.85;

/// Largest spy count allowed for a table of `player_count`.
pub fn max_spies(player_count: usize) -> usize {
    player_count / 3
}

/// Checks player and spy counts.
///
/// # Errors
///
/// Returns [`GameError::TooFewPlayers`] or [`GameError::InvalidSpyCount`].
#[instrument]
pub fn validate_counts(player_count: usize, spy_count: usize) -> Result<(), GameError> {
    if player_count < MIN_PLAYERS {
        return Err(GameError::TooFewPlayers {
            minimum: MIN_PLAYERS,
            actual: player_count,
        });
    }
    let maximum = max_spies(player_count);
    if spy_count == 0 || spy_count > maximum {
        return Err(GameError::InvalidSpyCount {
            spy_count,
            maximum,
            player_count,
        });
    }
    Ok(())
}

/// Hidden roles for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// `roles[i]` is true when player `i` is a Spy.
    pub roles: Vec<bool>,
    /// Order in which players privately view their roles.
    pub reveal_order: Vec<usize>,
}

impl RoleAssignment {
    /// Indices of the Spies, ascending.
    pub fn outsiders(&self) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter_map(|(i, &spy)| spy.then_some(i))
            .collect()
    }
}

/// Picks `spy_count` distinct Spies and an independent reveal order.
///
/// # Errors
///
/// Returns a configuration error for invalid counts.
#[instrument(skip(rng))]
pub fn assign<R: Rng + ?Sized>(
    player_count: usize,
    spy_count: usize,
    rng: &mut R,
) -> Result<RoleAssignment, GameError> {
    validate_counts(player_count, spy_count)?;

    let mut roles = vec![false; player_count];
    for i in index::sample(rng, player_count, spy_count) {
        roles[i] = true;
    }

    let mut reveal_order: Vec<usize> = (0..player_count).collect();
    reveal_order.shuffle(rng);

    debug!(?reveal_order, "Roles assigned");
    Ok(RoleAssignment {
        roles,
        reveal_order,
    })
}

/// Picks a uniformly random player; if it is a Spy, with `probability`
/// re-rolls to a uniformly random Local.
///
/// With no Locals at the table the original pick stands.
#[instrument(skip(roles, rng))]
pub fn weighted_reroll<R: Rng + ?Sized>(roles: &[bool], probability: f64, rng: &mut R) -> usize {
    let pick = rng.gen_range(0..roles.len());
    if !roles[pick] {
        return pick;
    }

    if !rng.gen_bool(probability.clamp(0.0, 1.0)) {
        debug!(pick, "Spy keeps the first turn");
        return pick;
    }

    let locals: Vec<usize> = (0..roles.len()).filter(|&i| !roles[i]).collect();
    match locals.choose(rng) {
        Some(&local) => {
            debug!(from = pick, to = local, "First turn re-rolled away from a Spy");
            local
        }
        None => pick,
    }
}

/// First speaker of a multi-round game, biased away from Spies.
pub fn biased_starter<R: Rng + ?Sized>(roles: &[bool], rng: &mut R) -> usize {
    weighted_reroll(roles, OUTSIDER_START_REROLL_PROBABILITY, rng)
}
