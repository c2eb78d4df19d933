//! Single-round accusation bounds.

use super::super::session::Session;
use super::Invariant;

/// Invariant: accusations are distinct valid indices, never more than the
/// spy count, and only ever recorded in single-round games.
pub struct AccusationsBoundedInvariant;

impl Invariant<Session> for AccusationsBoundedInvariant {
    fn holds(session: &Session) -> bool {
        if session.mode.is_multi_round() && !session.accusations.is_empty() {
            return false;
        }
        session.accusations.len() <= session.spy_count
            && session
                .accusations
                .iter()
                .all(|&i| i < session.players.len())
    }

    fn description() -> &'static str {
        "Single-round accusations are in range and at most spy_count"
    }
}
