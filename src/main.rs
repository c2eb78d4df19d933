//! Spy Party - terminal driver
//!
//! Manages topics and the player library, generates categories, and plays
//! seeded simulations.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command, LibraryAction};
use spy_party::{
    EngineConfig, GenerationUpdate, JsonFileStore, PlayerLibrary, SessionConfig,
    SessionController, TopicGenerator, TopicLibrary, simulate,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Topics => run_topics(&config),
        Command::Library { action } => run_library(&config, action),
        Command::Generate { category, accept } => run_generate(&config, category, accept).await,
        Command::Simulate {
            players,
            spies,
            mode,
            seed,
            names,
            categories,
        } => run_simulate(
            &config,
            SessionConfig::new(players, spies, mode.into(), categories).with_names(names),
            seed,
        ),
    }
}

/// Print every category with its word count
#[instrument(skip(config))]
fn run_topics(config: &EngineConfig) -> Result<()> {
    let catalog = TopicLibrary::new(JsonFileStore::new(config.topic_store())).load_catalog()?;
    for (name, words) in catalog.iter() {
        println!("{:<24} {:>3} words", name, words.len());
    }
    Ok(())
}

/// Apply a player library action
#[instrument(skip(config))]
fn run_library(config: &EngineConfig, action: LibraryAction) -> Result<()> {
    let mut library = PlayerLibrary::open(JsonFileStore::new(config.player_store()))?;
    match action {
        LibraryAction::List => {
            println!("Player Library (Total: {})", library.len());
            for name in library.names() {
                println!("  {}", name);
            }
        }
        LibraryAction::Add { name } => {
            if library.add(&name)? {
                println!("Added {}", name.trim());
            } else {
                println!("Not added: blank or already saved");
            }
        }
        LibraryAction::Remove { name } => {
            if library.remove(&name)? {
                println!("Removed {}", name);
            } else {
                println!("{} is not in the library", name);
            }
        }
    }
    Ok(())
}

/// Generate a category, show it for review, then keep or discard it
#[instrument(skip(config))]
async fn run_generate(config: &EngineConfig, category: String, accept: bool) -> Result<()> {
    let mut topics = TopicLibrary::new(JsonFileStore::new(config.topic_store()));
    let generator: Arc<dyn TopicGenerator> = Arc::new(config.create_generator()?);
    let mut controller = SessionController::new(Arc::new(topics.load_catalog()?));

    controller.request_category(generator, &category, config.retry_policy())?;
    println!("{}", controller.status());

    let update = loop {
        if let Some(update) = controller.poll_generation() {
            break update;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    match update {
        GenerationUpdate::Ready(pending) => {
            println!("Category: {}", pending.category());
            for word in pending.words() {
                println!("  {}", word);
            }
        }
        GenerationUpdate::Failed { .. } => bail!("{}", controller.status()),
    }

    if accept {
        controller.accept_pending_category()?;
        topics.save_catalog(controller.catalog())?;
        info!(category = %category, "Generated category saved");
    } else {
        controller.reject_pending_category()?;
    }
    println!("{}", controller.status());
    Ok(())
}

/// Play one seeded game and print its log
#[instrument(skip(config, session_config))]
fn run_simulate(config: &EngineConfig, session_config: SessionConfig, seed: u64) -> Result<()> {
    let catalog = TopicLibrary::new(JsonFileStore::new(config.topic_store())).load_catalog()?;
    let mut controller = SessionController::with_seed(Arc::new(catalog), seed);
    let report = simulate(&mut controller, session_config, seed.wrapping_add(1))?;

    println!("Category: {}", report.category);
    for line in &report.log {
        println!("{}", line);
    }
    println!("The Secret Word was: {}", report.secret);
    Ok(())
}
