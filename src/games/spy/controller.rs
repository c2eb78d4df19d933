//! Session controller: the only entry point callers use.
//!
//! The controller owns the word pool, the session configuration, the
//! current session, the discussion timer, and the generation mailbox. It is
//! a synchronous state machine; every operation checks the phase first and
//! rejects invalid calls without mutating anything.

use super::error::GameError;
use super::invariants::assert_invariants;
use super::outcome::{
    GenerationUpdate, Outcome, PendingCategory, RevealStep, RoleCard, RoundStart,
    SingleRoundProgress,
};
use super::roles::{assign, biased_starter};
use super::rules::{
    self, Resolution, build_guess_options, evaluate, resolve_accusation, resolve_single_round,
};
use super::session::{FinalGuess, Session, SessionConfig};
use super::timer::{DiscussionTimer, TimerEvent};
use super::turns::random_active_starter;
use super::types::Phase;
use super::word_pool::{Catalog, PoolStatus, WordPool};
use crate::topics::{GenerationError, RetryPolicy, TopicGenerator, generate_with_retry};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, instrument, warn};

/// Single result delivered by a generation task.
#[derive(Debug)]
struct GenerationMessage {
    category: String,
    result: Result<Vec<String>, GenerationError>,
}

/// Drives one table through configuration, games, and category generation.
#[derive(Debug)]
pub struct SessionController<R: Rng = ChaCha8Rng> {
    pool: WordPool,
    config: Option<SessionConfig>,
    session: Option<Session>,
    timer: DiscussionTimer,
    accusation_due: bool,
    generation: Option<mpsc::Receiver<GenerationMessage>>,
    pending_category: Option<PendingCategory>,
    status: String,
    rng: R,
}

impl SessionController<ChaCha8Rng> {
    /// Creates a controller seeded from the operating system.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, ChaCha8Rng::from_entropy())
    }

    /// Creates a reproducible controller.
    pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
        Self::with_rng(catalog, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SessionController<R> {
    /// Creates a controller with a caller-supplied random source.
    #[instrument(skip(catalog, rng), fields(categories = catalog.len()))]
    pub fn with_rng(catalog: Arc<Catalog>, rng: R) -> Self {
        info!("Creating session controller");
        Self {
            pool: WordPool::new(catalog),
            config: None,
            session: None,
            timer: DiscussionTimer::new(),
            accusation_due: false,
            generation: None,
            pending_category: None,
            status: String::new(),
            rng,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    /// Current catalog snapshot.
    pub fn catalog(&self) -> &Arc<Catalog> {
        self.pool.catalog()
    }

    /// The word pool, including its consumption ledger.
    pub fn word_pool(&self) -> &WordPool {
        &self.pool
    }

    /// Active configuration, if any.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Current or last finished game, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current phase; `None` while idle.
    pub fn phase(&self) -> Option<Phase> {
        match (&self.session, &self.config) {
            (Some(session), _) => Some(session.phase()),
            (None, Some(_)) => Some(Phase::Setup),
            (None, None) => None,
        }
    }

    /// User-facing generation status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Generated words awaiting review.
    pub fn pending_category(&self) -> Option<&PendingCategory> {
        self.pending_category.as_ref()
    }

    /// True while a generation request is running.
    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }

    /// True once the countdown has expired and nobody has accused yet.
    pub fn accusation_due(&self) -> bool {
        self.accusation_due
    }

    /// The discussion timer.
    pub fn timer(&self) -> &DiscussionTimer {
        &self.timer
    }

    // ── Setup ───────────────────────────────────────────────

    /// Stores a configuration for the next game.
    ///
    /// An empty category selection means every category in the catalog.
    ///
    /// # Errors
    ///
    /// Rejects invalid counts, unknown categories, and reconfiguring while
    /// a game is running.
    #[instrument(skip(self, config), fields(players = config.player_count(), spies = config.spy_count()))]
    pub fn configure_session(&mut self, mut config: SessionConfig) -> Result<(), GameError> {
        self.ensure_no_game()?;
        config.validate()?;

        let catalog = self.pool.catalog();
        if let Some(unknown) = config.categories().iter().find(|c| !catalog.contains(c)) {
            return Err(GameError::UnknownCategory(unknown.clone()));
        }
        if config.categories().is_empty() {
            if catalog.is_empty() {
                return Err(GameError::InvalidCategory("catalog is empty".to_string()));
            }
            debug!("No categories selected, using all");
            config.set_categories(catalog.names());
        }

        info!(mode = %config.mode(), categories = config.categories().len(), "Session configured");
        self.session = None;
        self.config = Some(config);
        Ok(())
    }

    /// Deals roles and draws a secret. Returns the first player to view
    /// their role.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotConfigured`] before configuration, or a
    /// word pool error if no secret can be drawn.
    #[instrument(skip(self))]
    pub fn start_game(&mut self) -> Result<usize, GameError> {
        self.ensure_no_game()?;
        let config = self.config.as_ref().ok_or(GameError::NotConfigured)?;

        let category = config
            .categories()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| GameError::InvalidCategory("no category selected".to_string()))?;
        let secret = self.pool.select_secret(&category, &mut self.rng)?;
        let assignment = assign(config.player_count(), *config.spy_count(), &mut self.rng)?;
        let first_starter = config
            .mode()
            .is_multi_round()
            .then(|| biased_starter(&assignment.roles, &mut self.rng));

        let session = Session::start(config, category, secret, assignment, first_starter);
        let first = session.current_reveal().ok_or(GameError::NoActivePlayers)?;
        assert_invariants(&session);

        info!(mode = %session.mode(), category = session.category(), "Game started");
        self.session = Some(session);
        self.timer.cancel();
        self.accusation_due = false;
        Ok(first)
    }

    // ── Role reveal ─────────────────────────────────────────

    /// Role card for the player at the reveal cursor.
    ///
    /// # Errors
    ///
    /// Only valid during role reveal.
    #[instrument(skip(self))]
    pub fn view_next_role(&self) -> Result<RoleCard, GameError> {
        let session = self.session_in(Phase::RoleReveal)?;
        let index = session.current_reveal().ok_or(GameError::WrongPhase {
            expected: Phase::RoleReveal,
            actual: session.phase(),
        })?;
        let player = &session.players()[index];

        let card = if player.is_outsider() {
            let fellows = session
                .players()
                .iter()
                .enumerate()
                .filter(|(i, p)| *i != index && p.is_outsider())
                .map(|(_, p)| p.name().to_string())
                .collect();
            RoleCard::new(
                index,
                player.name().to_string(),
                true,
                session.category().to_string(),
                None,
                fellows,
                session.mode(),
            )
        } else {
            RoleCard::new(
                index,
                player.name().to_string(),
                false,
                session.category().to_string(),
                Some(session.secret().to_string()),
                Vec::new(),
                session.mode(),
            )
        };
        debug!(index, "Role card viewed");
        Ok(card)
    }

    /// Moves past the current role card.
    ///
    /// After the last card, multi-round games start discussion with the
    /// biased first speaker and single-round games move to accusation.
    ///
    /// # Errors
    ///
    /// Only valid during role reveal.
    #[instrument(skip(self))]
    pub fn advance_after_reveal(&mut self) -> Result<RevealStep, GameError> {
        let session = active_session(&mut self.session, self.config.is_some(), Phase::RoleReveal)?;
        session.reveal_cursor += 1;

        let step = if let Some(next) = session.current_reveal() {
            RevealStep::NextPlayer(next)
        } else if session.mode.is_multi_round() {
            let starter = session.first_starter.unwrap_or_default();
            let current = session
                .turns
                .begin_round(starter, &session.players, &mut self.rng)
                .ok_or(GameError::NoActivePlayers)?;
            session.phase = Phase::Discussion;
            info!(starter = current, "Discussion started");
            RevealStep::Discussion(RoundStart {
                round: session.turns.round(),
                starter: current,
                direction: session.turns.direction(),
            })
        } else {
            session.phase = Phase::SingleRoundAccusation;
            info!("Single-round accusation started");
            RevealStep::SingleRoundAccusation
        };

        assert_invariants(session);
        Ok(step)
    }

    // ── Multi-round play ────────────────────────────────────

    /// Passes the turn to the next active player.
    ///
    /// # Errors
    ///
    /// Only valid during discussion.
    #[instrument(skip(self))]
    pub fn next_turn(&mut self) -> Result<usize, GameError> {
        let session = active_session(&mut self.session, self.config.is_some(), Phase::Discussion)?;
        let current = session
            .turns
            .next_turn(&session.players)
            .ok_or(GameError::NoActivePlayers)?;
        debug!(current, "Turn passed");
        Ok(current)
    }

    /// Accuses a player during discussion.
    ///
    /// # Errors
    ///
    /// Rejects bad indices, players already out, and calls outside
    /// discussion.
    #[instrument(skip(self))]
    pub fn accuse(&mut self, accused: usize) -> Result<Outcome, GameError> {
        let session = active_session(&mut self.session, self.config.is_some(), Phase::Discussion)?;
        session.check_index(accused)?;
        if !session.players[accused].is_active() {
            return Err(GameError::PlayerInactive(accused));
        }

        self.timer.cancel();
        self.accusation_due = false;

        let outcome = match resolve_accusation(&mut session.players, accused, session.mode)? {
            Resolution::FinalGuessPending { accused } => {
                let options = build_guess_options(
                    self.pool.catalog(),
                    &session.category,
                    &session.secret,
                    &mut self.rng,
                );
                session.pending_guess = Some(FinalGuess::new(accused, options.clone()));
                session.phase = Phase::AccusationPendingGuess;
                Outcome::FinalGuess {
                    guesser: accused,
                    options,
                }
            }
            Resolution::OutsiderEliminated { accused } => {
                continue_play(session, accused, true, &mut self.rng)?
            }
            Resolution::WrongAccusation { accused } => {
                continue_play(session, accused, false, &mut self.rng)?
            }
            Resolution::Decided { result, .. } => {
                session.resolve(result.clone());
                Outcome::GameOver(result)
            }
        };

        assert_invariants(session);
        Ok(outcome)
    }

    /// Applies a caught Spy's final guess.
    ///
    /// # Errors
    ///
    /// Only valid while a final guess is pending.
    #[instrument(skip(self, guess))]
    pub fn resolve_guess(&mut self, guess: &str) -> Result<Outcome, GameError> {
        let session = active_session(&mut self.session, self.config.is_some(), Phase::AccusationPendingGuess)?;
        let pending = session.pending_guess.take().ok_or_else(|| {
            GameError::InvariantViolation("final guess phase without a guess".to_string())
        })?;
        let guesser = *pending.guesser();

        let outcome = match rules::resolve_guess(&session.players, guesser, &session.secret, guess) {
            Some(result) => {
                session.resolve(result.clone());
                Outcome::GameOver(result)
            }
            None => continue_play(session, guesser, true, &mut self.rng)?,
        };

        assert_invariants(session);
        Ok(outcome)
    }

    // ── Single-round play ───────────────────────────────────

    /// Records one single-round accusation; resolves once `spy_count`
    /// distinct players are named.
    ///
    /// # Errors
    ///
    /// Rejects bad indices, duplicates, and calls outside the single-round
    /// accusation phase.
    #[instrument(skip(self))]
    pub fn record_single_round_accusation(
        &mut self,
        accused: usize,
    ) -> Result<SingleRoundProgress, GameError> {
        let session = active_session(&mut self.session, self.config.is_some(), Phase::SingleRoundAccusation)?;
        session.check_index(accused)?;
        if session.accusations.contains(&accused) {
            return Err(GameError::AlreadyAccused(accused));
        }
        session.accusations.insert(accused);

        let remaining = session.spy_count.saturating_sub(session.accusations.len());
        let progress = if remaining == 0 {
            let result = resolve_single_round(&session.players, &session.accusations, &session.secret);
            session.resolve(result.clone());
            SingleRoundProgress::Resolved(result)
        } else {
            debug!(accused, remaining, "Accusation recorded");
            SingleRoundProgress::Recorded { accused, remaining }
        };

        assert_invariants(session);
        Ok(progress)
    }

    // ── Teardown ────────────────────────────────────────────

    /// Drops the current game.
    ///
    /// Keeping the configuration lets the table play again at once;
    /// discarding it also forgets which words were drawn.
    #[instrument(skip(self))]
    pub fn end_game(&mut self, preserve_config: bool) {
        self.session = None;
        self.timer.cancel();
        self.accusation_due = false;
        if !preserve_config {
            self.config = None;
            self.pool.reset_ledger();
        }
        info!("Game ended");
    }

    // ── Word pool ───────────────────────────────────────────

    /// Remaining words in each selected category (all when unconfigured).
    pub fn pool_status(&self) -> Vec<PoolStatus> {
        self.pool.pool_status(&self.selected_categories())
    }

    /// Selected categories running low on unused words.
    pub fn low_pools(&self) -> Vec<PoolStatus> {
        self.pool.low_pools(&self.selected_categories())
    }

    /// Adds or replaces a category, resetting its draw history.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidCategory`] for a blank name or no
    /// usable words; the catalog is left untouched.
    #[instrument(skip(self, name, words))]
    pub fn add_or_replace_category(
        &mut self,
        name: &str,
        words: Vec<String>,
    ) -> Result<usize, GameError> {
        let count = self.pool.accept_category(name, words)?;
        if let Some(config) = self.config.as_mut() {
            config.add_category(name.trim());
        }
        info!(category = name.trim(), count, "Category stored");
        Ok(count)
    }

    // ── Timer ───────────────────────────────────────────────

    /// Starts the discussion countdown.
    ///
    /// # Errors
    ///
    /// Only valid during discussion.
    #[instrument(skip(self))]
    pub fn start_countdown(&mut self, duration: Duration) -> Result<(), GameError> {
        self.session_in(Phase::Discussion)?;
        self.accusation_due = false;
        self.timer.start(duration);
        Ok(())
    }

    /// Feeds elapsed time to the countdown.
    ///
    /// Outside discussion the timer is stopped and nothing fires.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TimerEvent> {
        if self.phase() != Some(Phase::Discussion) {
            self.timer.cancel();
            return None;
        }
        let event = self.timer.tick(elapsed);
        if event == Some(TimerEvent::AccusationDue) {
            self.accusation_due = true;
        }
        event
    }

    // ── Generation ──────────────────────────────────────────

    /// Starts generating words for `category` on the current tokio runtime.
    ///
    /// Returns at once; collect the result with [`Self::poll_generation`].
    ///
    /// # Errors
    ///
    /// Rejects a blank name, a second request while one is running, and
    /// calls made outside a tokio runtime.
    #[instrument(skip(self, generator, policy), fields(generator = generator.name()))]
    pub fn request_category(
        &mut self,
        generator: Arc<dyn TopicGenerator>,
        category: &str,
        policy: RetryPolicy,
    ) -> Result<(), GameError> {
        let category = category.trim().to_string();
        if category.is_empty() {
            self.status = "Error: Please enter a category name.".to_string();
            return Err(GameError::InvalidCategory("blank category name".to_string()));
        }
        if self.generation.is_some() {
            return Err(GameError::GenerationInFlight);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| GameError::NoRuntime)?;

        let (tx, rx) = mpsc::channel(1);
        let task_category = category.clone();
        handle.spawn(async move {
            let result = generate_with_retry(generator.as_ref(), &task_category, policy).await;
            let message = GenerationMessage {
                category: task_category,
                result,
            };
            if tx.send(message).await.is_err() {
                debug!("Generation result dropped; controller is gone");
            }
        });

        self.generation = Some(rx);
        self.status = format!("Querying generator for '{}'...", category);
        info!(category = %category, "Generation requested");
        Ok(())
    }

    /// Collects a finished generation request, if one has arrived.
    ///
    /// Successful words are held for review, not applied.
    pub fn poll_generation(&mut self) -> Option<GenerationUpdate> {
        let rx = self.generation.as_mut()?;
        let message = match rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                self.generation = None;
                self.status = "ERROR: Generation stopped without a result.".to_string();
                warn!("Generation task ended without sending");
                return Some(GenerationUpdate::Failed {
                    category: String::new(),
                    error: GenerationError::terminal("generation task ended without a result"),
                });
            }
        };
        self.generation = None;

        match message.result {
            Ok(words) => {
                info!(category = %message.category, count = words.len(), "Generated words ready for review");
                self.status = format!("WORDS GENERATED for '{}'! Review before playing.", message.category);
                let pending = PendingCategory::new(message.category, words);
                self.pending_category = Some(pending.clone());
                Some(GenerationUpdate::Ready(pending))
            }
            Err(error) => {
                warn!(category = %message.category, error = %error, "Generation failed");
                self.status = format!("ERROR: Failed to generate '{}': {}", message.category, error.message);
                Some(GenerationUpdate::Failed {
                    category: message.category,
                    error,
                })
            }
        }
    }

    /// Applies the reviewed words to the catalog and selects the category.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoPendingCategory`] when nothing awaits review,
    /// or [`GameError::InvalidCategory`] if the words are unusable (they
    /// are discarded).
    #[instrument(skip(self))]
    pub fn accept_pending_category(&mut self) -> Result<usize, GameError> {
        let (category, words) = self
            .pending_category
            .take()
            .ok_or(GameError::NoPendingCategory)?
            .into_parts();
        match self.add_or_replace_category(&category, words) {
            Ok(count) => {
                self.status = format!("SUCCESS! New category '{}' added ({} words).", category, count);
                Ok(count)
            }
            Err(e) => {
                self.status = format!("ERROR: Category '{}' could not be added.", category);
                Err(e)
            }
        }
    }

    /// Discards the reviewed words; the catalog is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoPendingCategory`] when nothing awaits review.
    #[instrument(skip(self))]
    pub fn reject_pending_category(&mut self) -> Result<(), GameError> {
        let pending = self
            .pending_category
            .take()
            .ok_or(GameError::NoPendingCategory)?;
        info!(category = %pending.category(), "Generated words discarded");
        self.status = format!("DISCARDED! Category '{}' discarded.", pending.category());
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────

    fn selected_categories(&self) -> Vec<String> {
        match &self.config {
            Some(config) => config.categories().clone(),
            None => self.pool.catalog().names(),
        }
    }

    fn ensure_no_game(&self) -> Result<(), GameError> {
        match &self.session {
            Some(session) if session.phase() != Phase::Resolved => {
                Err(GameError::GameInProgress(session.phase()))
            }
            _ => Ok(()),
        }
    }

    fn session_in(&self, expected: Phase) -> Result<&Session, GameError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| missing_session(self.config.is_some(), expected))?;
        session.expect_phase(expected)?;
        Ok(session)
    }
}

fn missing_session(configured: bool, expected: Phase) -> GameError {
    if configured {
        GameError::WrongPhase {
            expected,
            actual: Phase::Setup,
        }
    } else {
        GameError::NotConfigured
    }
}

/// Borrows the session if it is in `expected`. Takes the field rather than
/// the controller so the caller can still reach the pool and the RNG.
fn active_session(
    session: &mut Option<Session>,
    configured: bool,
    expected: Phase,
) -> Result<&mut Session, GameError> {
    let session = session
        .as_mut()
        .ok_or_else(|| missing_session(configured, expected))?;
    session.expect_phase(expected)?;
    Ok(session)
}

/// Starts the next round after someone left play, or ends the game if
/// nobody can take a turn.
fn continue_play<R: Rng + ?Sized>(
    session: &mut Session,
    accused: usize,
    caught_outsider: bool,
    rng: &mut R,
) -> Result<Outcome, GameError> {
    let Some(starter) = random_active_starter(&session.players, rng) else {
        return match evaluate(&session.players) {
            Some(result) => {
                session.resolve(result.clone());
                Ok(Outcome::GameOver(result))
            }
            None => Err(GameError::NoActivePlayers),
        };
    };

    let current = session
        .turns
        .begin_round(starter, &session.players, rng)
        .ok_or(GameError::NoActivePlayers)?;
    session.phase = Phase::Discussion;
    debug!(round = session.turns.round(), starter = current, "Next round");
    Ok(Outcome::NextRound {
        accused,
        caught_outsider,
        round: RoundStart {
            round: session.turns.round(),
            starter: current,
            direction: session.turns.direction(),
        },
    })
}
