//! Tests for single-round mode.

use std::sync::Arc;

use spy_party::{
    Catalog, GameError, GameMode, Phase, ResultDetail, RevealStep, SessionConfig,
    SessionController, Side, SingleRoundProgress,
};

fn ready(players: usize, spies: usize, seed: u64) -> SessionController {
    let mut controller = SessionController::with_seed(Arc::new(Catalog::with_defaults()), seed);
    controller
        .configure_session(SessionConfig::new(players, spies, GameMode::SingleRound, Vec::new()))
        .expect("Configure failed");
    controller.start_game().expect("Start failed");
    loop {
        match controller.advance_after_reveal().expect("Advance failed") {
            RevealStep::NextPlayer(_) => continue,
            RevealStep::SingleRoundAccusation => break,
            other => panic!("Unexpected step {:?}", other),
        }
    }
    controller
}

#[test]
fn test_no_turns_and_no_biased_starter() {
    let controller = ready(6, 2, 1);
    let session = controller.session().unwrap();
    assert_eq!(session.phase(), Phase::SingleRoundAccusation);
    assert_eq!(session.first_starter(), None);
    assert_eq!(session.turns().round(), 0);
}

#[test]
fn test_exact_accusation_wins_for_locals() {
    let mut controller = ready(6, 2, 2);
    let spies = controller.session().unwrap().outsiders();

    assert_eq!(
        controller.record_single_round_accusation(spies[1]).unwrap(),
        SingleRoundProgress::Recorded {
            accused: spies[1],
            remaining: 1
        }
    );
    match controller.record_single_round_accusation(spies[0]).unwrap() {
        SingleRoundProgress::Resolved(result) => {
            assert_eq!(*result.winning_side(), Side::Insiders);
            assert_eq!(
                *result.detail(),
                ResultDetail::PerfectAccusation { outsiders: spies }
            );
        }
        other => panic!("Unexpected progress {:?}", other),
    }
    assert_eq!(controller.phase(), Some(Phase::Resolved));
}

#[test]
fn test_one_miss_loses() {
    let mut controller = ready(6, 2, 3);
    let session = controller.session().unwrap();
    let spies = session.outsiders();
    let local = (0..6).find(|i| !spies.contains(i)).unwrap();
    let secret = session.secret().to_string();

    controller.record_single_round_accusation(spies[0]).unwrap();
    match controller.record_single_round_accusation(local).unwrap() {
        SingleRoundProgress::Resolved(result) => {
            assert_eq!(*result.winning_side(), Side::Outsiders);
            assert_eq!(
                *result.detail(),
                ResultDetail::AccusationFailed {
                    missed: vec![spies[1]],
                    wrongly_accused: vec![local],
                    secret,
                }
            );
            assert_eq!(result.summary(), "1 Spy(s) missed, 1 Local(s) wrongly accused.");
        }
        other => panic!("Unexpected progress {:?}", other),
    }
}

#[test]
fn test_duplicate_accusation_rejected() {
    let mut controller = ready(9, 3, 4);
    controller.record_single_round_accusation(2).unwrap();
    assert!(matches!(
        controller.record_single_round_accusation(2),
        Err(GameError::AlreadyAccused(2))
    ));
    assert_eq!(controller.session().unwrap().accusations().len(), 1);
    assert!(!controller.session().unwrap().accusable_players().contains(&2));
}

#[test]
fn test_multi_round_operations_rejected() {
    let mut controller = ready(6, 1, 5);
    assert!(matches!(controller.accuse(0), Err(GameError::WrongPhase { .. })));
    assert!(matches!(controller.next_turn(), Err(GameError::WrongPhase { .. })));
    assert!(matches!(
        controller.record_single_round_accusation(6),
        Err(GameError::PlayerOutOfRange { index: 6, .. })
    ));
}

#[test]
fn test_accusation_outside_phase_rejected() {
    let mut controller = SessionController::with_seed(Arc::new(Catalog::with_defaults()), 6);
    controller
        .configure_session(SessionConfig::new(6, 1, GameMode::SingleRound, Vec::new()))
        .unwrap();
    assert!(matches!(
        controller.record_single_round_accusation(0),
        Err(GameError::WrongPhase {
            expected: Phase::SingleRoundAccusation,
            actual: Phase::Setup
        })
    ));
}
