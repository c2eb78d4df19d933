//! Tests for scripted whole-game simulation.

use std::sync::Arc;

use spy_party::{
    Catalog, Difficulty, GameMode, Phase, SessionConfig, SessionController, simulate,
};

fn run(mode: GameMode, players: usize, spies: usize, seed: u64) -> spy_party::SimulationReport {
    let mut controller = SessionController::with_seed(Arc::new(Catalog::with_defaults()), seed);
    let report = simulate(
        &mut controller,
        SessionConfig::new(players, spies, mode, Vec::new()),
        seed + 1,
    )
    .expect("Simulation failed");
    assert_eq!(controller.phase(), Some(Phase::Resolved));
    report
}

#[test]
fn test_every_mode_finishes() {
    for seed in 0..20 {
        run(GameMode::MultiRound(Difficulty::Easy), 7, 2, seed);
        run(GameMode::MultiRound(Difficulty::Hard), 7, 2, seed);
        run(GameMode::SingleRound, 7, 2, seed);
    }
}

#[test]
fn test_same_seeds_same_game() {
    let a = run(GameMode::MultiRound(Difficulty::Easy), 9, 3, 42);
    let b = run(GameMode::MultiRound(Difficulty::Easy), 9, 3, 42);
    assert_eq!(a.log, b.log);
    assert_eq!(a.result, b.result);
    assert_eq!(a.secret, b.secret);
}

#[test]
fn test_log_ends_with_result() {
    let report = run(GameMode::SingleRound, 6, 1, 7);
    assert_eq!(report.log.last(), Some(&report.result.to_string()));
}
