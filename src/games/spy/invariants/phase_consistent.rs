//! Phase consistency: the phase agrees with the rest of the session.

use super::super::session::Session;
use super::super::types::Phase;
use super::Invariant;

/// Invariant: a result exists exactly when resolved, a final guess exists
/// exactly while one is pending (and belongs to a caught Spy), and during
/// discussion the turn sits on an active player.
pub struct PhaseConsistentInvariant;

impl Invariant<Session> for PhaseConsistentInvariant {
    fn holds(session: &Session) -> bool {
        let resolved = session.phase == Phase::Resolved;
        if resolved != session.result.is_some() {
            return false;
        }

        let pending = session.phase == Phase::AccusationPendingGuess;
        match &session.pending_guess {
            Some(guess) => {
                let guesser_ok = session
                    .players
                    .get(*guess.guesser())
                    .is_some_and(|p| p.is_outsider() && !p.is_active());
                if !pending || !guesser_ok {
                    return false;
                }
            }
            None if pending => return false,
            None => {}
        }

        if session.phase == Phase::Discussion {
            return session
                .players
                .get(session.turns.current())
                .is_some_and(|p| p.is_active());
        }
        true
    }

    fn description() -> &'static str {
        "Phase agrees with result, pending guess and current turn"
    }
}
