//! Final guess offered to a caught Spy in Easy mode.

use super::super::types::{GameResult, Player, ResultDetail, Side};
use super::super::word_pool::Catalog;
use super::win::evaluate;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Most distractors drawn from the secret's own category.
pub const CATEGORY_DECOYS: usize = 4;

/// Most distractors drawn from all other categories combined.
pub const OUTSIDE_DECOYS: usize = 2;

/// Builds the shuffled list of words a caught Spy chooses from.
///
/// Always contains the secret. Categories with few words simply produce
/// fewer distractors.
#[instrument(skip(catalog, secret, rng))]
pub fn build_guess_options<R: Rng + ?Sized>(
    catalog: &Catalog,
    category: &str,
    secret: &str,
    rng: &mut R,
) -> Vec<String> {
    let same_category: Vec<&String> = catalog
        .get(category)
        .map(|words| words.iter().filter(|w| w.as_str() != secret).collect())
        .unwrap_or_default();

    let other_categories: Vec<&String> = catalog
        .iter()
        .filter(|(name, _)| name.as_str() != category)
        .flat_map(|(_, words)| words.iter())
        .collect();

    let mut options = vec![secret.to_string()];
    options.extend(
        same_category
            .choose_multiple(rng, CATEGORY_DECOYS)
            .map(|w| (*w).clone()),
    );
    options.extend(
        other_categories
            .choose_multiple(rng, OUTSIDE_DECOYS)
            .map(|w| (*w).clone()),
    );

    let mut seen = HashSet::new();
    options.retain(|w| seen.insert(w.clone()));
    options.shuffle(rng);

    debug!(count = options.len(), "Guess options built");
    options
}

/// Resolves a caught Spy's final guess.
///
/// Naming the secret wins for the Spies outright, whatever the head count.
/// A miss falls through to the normal win check; `None` means play goes on.
#[instrument(skip(players, secret))]
pub fn resolve_guess(
    players: &[Player],
    guesser: usize,
    secret: &str,
    guess: &str,
) -> Option<GameResult> {
    if guess == secret {
        info!(guesser, "Caught Spy guessed the secret");
        return Some(GameResult::new(
            Side::Outsiders,
            ResultDetail::SecretGuessed {
                guesser,
                secret: secret.to_string(),
            },
        ));
    }

    info!(guesser, "Final guess missed");
    evaluate(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_options_from_default_catalog() {
        let catalog = Catalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let options = build_guess_options(&catalog, "USA", "Route 66 Diner", &mut rng);

        assert_eq!(options.len(), 1 + CATEGORY_DECOYS + OUTSIDE_DECOYS);
        assert!(options.contains(&"Route 66 Diner".to_string()));
        let usa = catalog.get("USA").unwrap();
        let same = options.iter().filter(|w| usa.contains(w)).count();
        assert_eq!(same, 1 + CATEGORY_DECOYS);
    }

    #[test]
    fn test_options_degrade_with_small_catalog() {
        let mut catalog = Catalog::new();
        catalog.add_or_replace("Solo", words(&["only", "two"])).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut options = build_guess_options(&catalog, "Solo", "only", &mut rng);
        options.sort();
        assert_eq!(options, ["only", "two"]);
    }

    #[test]
    fn test_options_deduplicate_across_categories() {
        let mut catalog = Catalog::new();
        catalog.add_or_replace("A", words(&["shared"])).unwrap();
        catalog.add_or_replace("B", words(&["shared"])).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let options = build_guess_options(&catalog, "A", "shared", &mut rng);
        assert_eq!(options, ["shared"]);
    }

    #[test]
    fn test_correct_guess_overrides_parity() {
        // Four players: Spy at 0, two Locals out, Spy just caught.
        let mut players: Vec<Player> = (0..4).map(|i| Player::new(format!("P{}", i), i == 0)).collect();
        players[1].eliminate();
        players[2].eliminate();
        players[0].eliminate();

        let result = resolve_guess(&players, 0, "Suez Canal", "Suez Canal").unwrap();
        assert_eq!(*result.winning_side(), Side::Outsiders);
    }

    #[test]
    fn test_wrong_guess_falls_through() {
        let mut players: Vec<Player> = (0..6).map(|i| Player::new(format!("P{}", i), i < 2)).collect();
        players[0].eliminate();
        assert_eq!(resolve_guess(&players, 0, "Suez Canal", "Sahara Desert"), None);

        players[1].eliminate();
        let result = resolve_guess(&players, 1, "Suez Canal", "Sahara Desert").unwrap();
        assert_eq!(*result.winning_side(), Side::Insiders);
    }
}
