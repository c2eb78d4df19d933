//! Turn sequencing for multi-round play.

use super::types::Player;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, instrument, warn};

/// Direction the device is passed in a round. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Direction {
    /// Pass to the left.
    #[strum(to_string = "CLOCKWISE")]
    Clockwise,
    /// Pass to the right.
    #[strum(to_string = "COUNTER-CLOCKWISE")]
    CounterClockwise,
}

impl Direction {
    /// Picks a direction uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }
}

/// Tracks whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEngine {
    current: usize,
    direction: Direction,
    round: u32,
}

impl TurnEngine {
    /// Creates an engine that has not started a round.
    pub fn new() -> Self {
        Self {
            current: 0,
            direction: Direction::Clockwise,
            round: 0,
        }
    }

    /// Index of the player whose turn it is.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Direction of the current round.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rounds started so far (1 during the first round).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Starts a new round at `starter` with a fresh random direction, then
    /// settles on the first active player from there.
    ///
    /// Returns `None` when nobody is active.
    #[instrument(skip(self, players, rng), fields(round = self.round + 1))]
    pub fn begin_round<R: Rng + ?Sized>(
        &mut self,
        starter: usize,
        players: &[Player],
        rng: &mut R,
    ) -> Option<usize> {
        self.round += 1;
        self.current = starter;
        self.direction = Direction::random(rng);
        debug!(starter, direction = %self.direction, "Round started");
        self.advance_round(players)
    }

    /// Moves `current` forward (wrapping) to the first active player,
    /// starting with `current` itself.
    ///
    /// Returns `None` after `players.len()` probes find nobody active.
    #[instrument(skip(self, players), fields(from = self.current))]
    pub fn advance_round(&mut self, players: &[Player]) -> Option<usize> {
        let count = players.len();
        if count == 0 {
            return None;
        }
        for probe in 0..count {
            let index = (self.current + probe) % count;
            if players[index].is_active() {
                self.current = index;
                return Some(index);
            }
        }
        warn!("No active player found");
        None
    }

    /// Hands the turn to the next active player.
    #[instrument(skip(self, players))]
    pub fn next_turn(&mut self, players: &[Player]) -> Option<usize> {
        if players.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % players.len();
        self.advance_round(players)
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniformly random active player, used to start every round after the first.
pub fn random_active_starter<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Option<usize> {
    let active: Vec<usize> = players
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.is_active().then_some(i))
        .collect();
    active.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn table(active: &[bool]) -> Vec<Player> {
        active
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let mut p = Player::new(format!("P{}", i), false);
                if !a {
                    p.eliminate();
                }
                p
            })
            .collect()
    }

    #[test]
    fn test_advance_skips_inactive_and_wraps() {
        let players = table(&[true, false, false, true]);
        let mut engine = TurnEngine::new();
        engine.current = 1;
        assert_eq!(engine.advance_round(&players), Some(3));
        assert_eq!(engine.next_turn(&players), Some(0));
    }

    #[test]
    fn test_no_active_players() {
        let players = table(&[false, false, false]);
        let mut engine = TurnEngine::new();
        assert_eq!(engine.advance_round(&players), None);
    }

    #[test]
    fn test_never_lands_on_inactive() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let players = table(&[false, true, false, true, false, true]);
        let mut engine = TurnEngine::new();
        engine.begin_round(0, &players, &mut rng).unwrap();
        for _ in 0..20 {
            let current = engine.next_turn(&players).unwrap();
            assert!(players[current].is_active());
        }
        assert_eq!(engine.round(), 1);
    }

    #[test]
    fn test_random_starter_is_active() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let players = table(&[false, true, false, true]);
        for _ in 0..50 {
            let starter = random_active_starter(&players, &mut rng).unwrap();
            assert!(players[starter].is_active());
        }
        assert_eq!(random_active_starter(&table(&[false]), &mut rng), None);
    }
}
