//! Invariants that every session must satisfy between operations.
//!
//! Each invariant is a small type that can be tested on its own. The
//! controller checks the whole set after every transition in debug builds.

use super::error::GameError;
use super::session::Session;
use tracing::error;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together. Implemented for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn push_if_broken<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        push_if_broken::<S, I1>(state, &mut violations);
        push_if_broken::<S, I2>(state, &mut violations);
        collect(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        push_if_broken::<S, I1>(state, &mut violations);
        push_if_broken::<S, I2>(state, &mut violations);
        push_if_broken::<S, I3>(state, &mut violations);
        push_if_broken::<S, I4>(state, &mut violations);
        collect(violations)
    }
}

pub mod accusations;
pub mod phase_consistent;
pub mod reveal_order;
pub mod roster;

pub use accusations::AccusationsBoundedInvariant;
pub use phase_consistent::PhaseConsistentInvariant;
pub use reveal_order::RevealOrderInvariant;
pub use roster::RosterInvariant;

/// All session invariants as a composable set.
pub type SessionInvariants = (
    RosterInvariant,
    RevealOrderInvariant,
    AccusationsBoundedInvariant,
    PhaseConsistentInvariant,
);

/// Checks every session invariant.
///
/// # Errors
///
/// Returns [`GameError::InvariantViolation`] naming the broken invariants.
pub fn check_session(session: &Session) -> Result<(), GameError> {
    SessionInvariants::check_all(session).map_err(|violations| {
        let described = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        error!(violations = %described, "Session invariant violated");
        GameError::InvariantViolation(described)
    })
}

/// Asserts the session invariants in debug builds; free in release.
pub fn assert_invariants(session: &Session) {
    debug_assert!(
        check_session(session).is_ok(),
        "session invariants violated"
    );
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::spy::types::GameMode;

    #[test]
    fn test_fresh_session_holds() {
        assert!(SessionInvariants::check_all(&fixtures::easy()).is_ok());
        assert!(SessionInvariants::check_all(&fixtures::session(GameMode::SingleRound)).is_ok());
    }

    #[test]
    fn test_violations_are_collected() {
        let mut session = fixtures::easy();
        session.spy_count = 3;
        session.reveal_order.pop();
        let violations = SessionInvariants::check_all(&session).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_check_session_maps_to_game_error() {
        let mut session = fixtures::easy();
        session.reveal_cursor = 99;
        assert!(matches!(
            check_session(&session),
            Err(GameError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_pair_as_set() {
        type Pair = (RosterInvariant, RevealOrderInvariant);
        assert!(Pair::check_all(&fixtures::easy()).is_ok());
    }
}
