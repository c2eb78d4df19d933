//! Scripted play-through of a whole game.
//!
//! The table's choices (who to accuse, what a caught Spy guesses) come from
//! a separate seeded RNG, so a seed pair reproduces a game exactly.

use crate::games::spy::{
    GameError, GameResult, Outcome, RevealStep, SessionConfig, SessionController,
    SingleRoundProgress,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

/// What happened in a simulated game.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Final result.
    pub result: GameResult,
    /// Category of the secret.
    pub category: String,
    /// The secret word.
    pub secret: String,
    /// Human-readable log, one line per event.
    pub log: Vec<String>,
}

/// Configures the controller, plays one game to the end, and reports it.
///
/// # Errors
///
/// Propagates any engine error; a well-formed configuration never
/// produces one.
#[instrument(skip(controller, config))]
pub fn simulate<R: Rng>(
    controller: &mut SessionController<R>,
    config: SessionConfig,
    table_seed: u64,
) -> Result<SimulationReport, GameError> {
    let mut table = ChaCha8Rng::seed_from_u64(table_seed);
    let mut log = Vec::new();

    controller.configure_session(config)?;
    controller.start_game()?;

    let step = loop {
        let card = controller.view_next_role()?;
        log.push(format!(
            "{} views their role ({})",
            card.name(),
            if *card.is_outsider() { "Spy" } else { "Local" }
        ));
        match controller.advance_after_reveal()? {
            RevealStep::NextPlayer(_) => continue,
            step => break step,
        }
    };

    let result = match step {
        RevealStep::Discussion(round) => {
            log.push(format!(
                "Round {}: player {} starts, passing {}",
                round.round, round.starter, round.direction
            ));
            play_rounds(controller, &mut table, &mut log)?
        }
        _ => accuse_once(controller, &mut table, &mut log)?,
    };

    let session = controller
        .session()
        .ok_or_else(|| GameError::InvariantViolation("finished game has no session".to_string()))?;
    log.push(result.to_string());
    info!(winner = %result.winning_side(), "Simulation finished");
    Ok(SimulationReport {
        category: session.category().to_string(),
        secret: session.secret().to_string(),
        result,
        log,
    })
}

fn play_rounds<R: Rng>(
    controller: &mut SessionController<R>,
    table: &mut ChaCha8Rng,
    log: &mut Vec<String>,
) -> Result<GameResult, GameError> {
    let mut outcome = accuse_random(controller, table, log)?;
    loop {
        outcome = match outcome {
            Outcome::GameOver(result) => return Ok(result),
            Outcome::NextRound { round, .. } => {
                log.push(format!(
                    "Round {}: player {} starts, passing {}",
                    round.round, round.starter, round.direction
                ));
                accuse_random(controller, table, log)?
            }
            Outcome::FinalGuess { guesser, options } => {
                let guess = options
                    .choose(table)
                    .cloned()
                    .ok_or_else(|| GameError::InvariantViolation("no guess options".to_string()))?;
                log.push(format!("Player {} guesses '{}'", guesser, guess));
                controller.resolve_guess(&guess)?
            }
        };
    }
}

fn accuse_random<R: Rng>(
    controller: &mut SessionController<R>,
    table: &mut ChaCha8Rng,
    log: &mut Vec<String>,
) -> Result<Outcome, GameError> {
    let active = controller
        .session()
        .map(|s| s.active_players())
        .unwrap_or_default();
    let accused = *active.choose(table).ok_or(GameError::NoActivePlayers)?;
    log.push(format!("The table accuses player {}", accused));
    controller.accuse(accused)
}

fn accuse_once<R: Rng>(
    controller: &mut SessionController<R>,
    table: &mut ChaCha8Rng,
    log: &mut Vec<String>,
) -> Result<GameResult, GameError> {
    loop {
        let candidates = controller
            .session()
            .map(|s| s.accusable_players())
            .unwrap_or_default();
        let accused = *candidates.choose(table).ok_or(GameError::NoActivePlayers)?;
        log.push(format!("The table accuses player {}", accused));
        if let SingleRoundProgress::Resolved(result) =
            controller.record_single_round_accusation(accused)?
        {
            return Ok(result);
        }
    }
}
