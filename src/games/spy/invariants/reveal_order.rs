//! Reveal order invariant.

use super::super::session::Session;
use super::Invariant;

/// Invariant: the reveal order is a permutation of the roster and the
/// cursor never runs past its end.
pub struct RevealOrderInvariant;

impl Invariant<Session> for RevealOrderInvariant {
    fn holds(session: &Session) -> bool {
        let count = session.players.len();
        if session.reveal_order.len() != count || session.reveal_cursor > count {
            return false;
        }
        let mut seen = vec![false; count];
        session
            .reveal_order
            .iter()
            .all(|&i| i < count && !std::mem::replace(&mut seen[i], true))
    }

    fn description() -> &'static str {
        "Reveal order is a permutation of the players"
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_fresh_order_holds() {
        assert!(RevealOrderInvariant::holds(&fixtures::easy()));
    }

    #[test]
    fn test_duplicate_detected() {
        let mut session = fixtures::easy();
        session.reveal_order[0] = 3;
        assert!(!RevealOrderInvariant::holds(&session));
    }

    #[test]
    fn test_out_of_range_detected() {
        let mut session = fixtures::easy();
        session.reveal_order[0] = 7;
        assert!(!RevealOrderInvariant::holds(&session));
    }
}
