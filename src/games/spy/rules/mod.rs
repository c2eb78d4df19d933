//! Game rules for the spy game.
//!
//! Pure functions over the player roster. Rules are kept apart from the
//! session so each one can be exercised on its own.

pub mod accusation;
pub mod guess;
pub mod single_round;
pub mod win;

pub use accusation::{Resolution, resolve_accusation};
pub use guess::{CATEGORY_DECOYS, OUTSIDE_DECOYS, build_guess_options, resolve_guess};
pub use single_round::resolve_single_round;
pub use win::evaluate;
