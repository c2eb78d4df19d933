//! Atomic resolution of single-round accusations.

use super::super::types::{GameResult, Player, ResultDetail, Side};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Compares the accused set with the Spies.
///
/// Locals win only when they accused exactly the Spies. Otherwise the Spies
/// win and the result lists who was missed, who was wrongly accused, and the
/// secret.
#[instrument(skip(players, secret))]
pub fn resolve_single_round(
    players: &[Player],
    accusations: &BTreeSet<usize>,
    secret: &str,
) -> GameResult {
    let outsiders: BTreeSet<usize> = players
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.is_outsider().then_some(i))
        .collect();

    if *accusations == outsiders {
        info!("Accusations matched every Spy");
        return GameResult::new(
            Side::Insiders,
            ResultDetail::PerfectAccusation {
                outsiders: outsiders.into_iter().collect(),
            },
        );
    }

    let missed: Vec<usize> = outsiders.difference(accusations).copied().collect();
    let wrongly_accused: Vec<usize> = accusations.difference(&outsiders).copied().collect();
    info!(missed = missed.len(), wrongly_accused = wrongly_accused.len(), "Accusations failed");

    GameResult::new(
        Side::Outsiders,
        ResultDetail::AccusationFailed {
            missed,
            wrongly_accused,
            secret: secret.to_string(),
        },
    )
}
