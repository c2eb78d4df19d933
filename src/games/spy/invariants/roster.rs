//! Roster invariant: the roles dealt match the configuration.

use super::super::session::Session;
use super::Invariant;

/// Invariant: the number of Spies equals the configured spy count.
///
/// Roles never change once dealt, so this holds for the whole game.
pub struct RosterInvariant;

impl Invariant<Session> for RosterInvariant {
    fn holds(session: &Session) -> bool {
        session.players.iter().filter(|p| p.is_outsider()).count() == session.spy_count
    }

    fn description() -> &'static str {
        "Exactly spy_count players are Spies"
    }
}
