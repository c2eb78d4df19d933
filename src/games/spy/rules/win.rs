//! Win detection for the spy game.

use super::super::types::{GameResult, Player, ResultDetail, Side, Tally};
use tracing::{debug, instrument};

/// Decides whether either side has won.
///
/// Locals win once no Spy is active; Spies win as soon as they are at least
/// as many as the active Locals. Otherwise play continues.
#[instrument(skip(players))]
pub fn evaluate(players: &[Player]) -> Option<GameResult> {
    let tally = Tally::of(players);
    debug!(?tally, "Evaluating win conditions");

    if tally.active_outsiders == 0 {
        return Some(GameResult::new(Side::Insiders, ResultDetail::AllOutsidersCaught));
    }

    if tally.active_outsiders >= tally.active_insiders {
        return Some(GameResult::new(
            Side::Outsiders,
            ResultDetail::Parity {
                active_outsiders: tally.active_outsiders,
                active_insiders: tally.active_insiders,
            },
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(spies: usize, locals: usize) -> Vec<Player> {
        (0..spies)
            .map(|i| Player::new(format!("S{}", i), true))
            .chain((0..locals).map(|i| Player::new(format!("L{}", i), false)))
            .collect()
    }

    #[test]
    fn test_game_continues() {
        assert_eq!(evaluate(&table(1, 4)), None);
        assert_eq!(evaluate(&table(2, 3)), None);
    }

    #[test]
    fn test_locals_win_when_spies_gone() {
        let mut players = table(1, 3);
        players[0].eliminate();
        let result = evaluate(&players).unwrap();
        assert_eq!(*result.winning_side(), Side::Insiders);
        assert_eq!(*result.detail(), ResultDetail::AllOutsidersCaught);
    }

    #[test]
    fn test_parity_five_players_three_locals_out() {
        let mut players = table(1, 4);
        for local in players.iter_mut().skip(1).take(3) {
            local.eliminate();
        }
        let result = evaluate(&players).unwrap();
        assert_eq!(*result.winning_side(), Side::Outsiders);
        assert_eq!(
            *result.detail(),
            ResultDetail::Parity {
                active_outsiders: 1,
                active_insiders: 1
            }
        );
    }

    #[test]
    fn test_no_spies_at_all_is_insider_win() {
        let players = table(0, 3);
        assert_eq!(*evaluate(&players).unwrap().winning_side(), Side::Insiders);
    }
}
