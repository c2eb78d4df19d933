//! Tests for secret selection across games.

use std::collections::HashSet;
use std::sync::Arc;

use spy_party::{
    Catalog, Difficulty, GameError, GameMode, LOW_POOL_THRESHOLD, SessionConfig,
    SessionController,
};

fn tiny_catalog() -> Arc<Catalog> {
    let mut catalog = Catalog::new();
    catalog
        .add_or_replace("Tiny", ["a", "b", "c"].map(String::from))
        .expect("Add failed");
    catalog
        .add_or_replace("Big", (0..10).map(|i| format!("w{}", i)))
        .expect("Add failed");
    Arc::new(catalog)
}

fn configured(categories: &[&str]) -> SessionController {
    let mut controller = SessionController::with_seed(tiny_catalog(), 21);
    controller
        .configure_session(SessionConfig::new(
            3,
            1,
            GameMode::MultiRound(Difficulty::Easy),
            categories.iter().map(|c| c.to_string()).collect(),
        ))
        .expect("Configure failed");
    controller
}

fn play_and_keep_config(controller: &mut SessionController) -> String {
    controller.start_game().expect("Start failed");
    let secret = controller.session().unwrap().secret().to_string();
    controller.end_game(true);
    secret
}

#[test]
fn test_every_word_drawn_before_repeat() {
    let mut controller = configured(&["Tiny"]);
    let first_cycle: HashSet<String> = (0..3).map(|_| play_and_keep_config(&mut controller)).collect();
    assert_eq!(first_cycle.len(), 3);

    // Exhausted pool resets and keeps producing words from the category.
    let next = play_and_keep_config(&mut controller);
    assert!(first_cycle.contains(&next));
}

#[test]
fn test_secret_stays_in_selected_category() {
    let mut controller = configured(&["Big"]);
    for _ in 0..15 {
        controller.start_game().unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.category(), "Big");
        assert!(controller.catalog().get("Big").unwrap().iter().any(|w| w == session.secret()));
        controller.end_game(true);
    }
}

#[test]
fn test_empty_selection_falls_back_to_all() {
    let controller = configured(&[]);
    assert_eq!(controller.config().unwrap().categories(), &["Big", "Tiny"]);
}

#[test]
fn test_unknown_category_rejected() {
    let mut controller = SessionController::with_seed(tiny_catalog(), 1);
    let result = controller.configure_session(SessionConfig::new(
        3,
        1,
        GameMode::SingleRound,
        vec!["Nope".to_string()],
    ));
    assert!(matches!(result, Err(GameError::UnknownCategory(name)) if name == "Nope"));
}

#[test]
fn test_pool_status_and_low_pools() {
    let mut controller = configured(&["Tiny", "Big"]);
    play_and_keep_config(&mut controller);

    let status = controller.pool_status();
    let total_remaining: usize = status.iter().map(|s| *s.remaining()).sum();
    assert_eq!(total_remaining, 12);

    let low = controller.low_pools();
    assert!(low.iter().all(|s| *s.remaining() < LOW_POOL_THRESHOLD));
    assert!(low.iter().any(|s| s.category() == "Tiny"));
}

#[test]
fn test_discarding_config_resets_ledger() {
    let mut controller = configured(&["Tiny"]);
    play_and_keep_config(&mut controller);
    play_and_keep_config(&mut controller);
    assert_eq!(*controller.pool_status()[0].remaining(), 1);

    controller.end_game(false);
    let remaining: Vec<usize> = controller.pool_status().iter().map(|s| *s.remaining()).collect();
    assert_eq!(remaining, [10, 3]);
}

#[test]
fn test_add_or_replace_category_selects_it() {
    let mut controller = configured(&["Tiny"]);
    let count = controller
        .add_or_replace_category(" Rivers ", vec!["Nile".into(), "Nile".into(), "Volga".into()])
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(controller.config().unwrap().categories(), &["Tiny", "Rivers"]);
    assert!(matches!(
        controller.add_or_replace_category("Empty", vec!["  ".into()]),
        Err(GameError::InvalidCategory(_))
    ));
    assert!(!controller.catalog().contains("Empty"));
}
