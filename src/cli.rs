//! Command-line interface for spy_party.

use clap::{Parser, Subcommand, ValueEnum};
use spy_party::{Difficulty, GameMode};
use std::path::PathBuf;

/// Spy Party - pass-and-play social deduction engine
#[derive(Parser, Debug)]
#[command(name = "spy_party")]
#[command(about = "Word-based spy party game engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the engine configuration file
    #[arg(short, long, default_value = "spy_party.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List categories and their word counts
    Topics,

    /// Manage the player library
    Library {
        /// Library action
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Generate words for a category via Gemini
    Generate {
        /// Category name
        category: String,

        /// Add the generated words to the stored topics
        #[arg(long)]
        accept: bool,
    },

    /// Play a whole game with scripted choices
    Simulate {
        /// Number of players
        #[arg(short, long, default_value = "6")]
        players: usize,

        /// Number of spies
        #[arg(short, long, default_value = "1")]
        spies: usize,

        /// Game mode
        #[arg(short, long, value_enum, default_value = "easy")]
        mode: ModeArg,

        /// Seed for dealing and for the table's choices
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Comma-separated player names
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,

        /// Restrict secrets to these categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
}

/// Player library actions
#[derive(Subcommand, Debug)]
pub enum LibraryAction {
    /// Show saved players
    List,
    /// Save a player
    Add {
        /// Player name
        name: String,
    },
    /// Forget a player
    Remove {
        /// Player name
        name: String,
    },
}

/// Game mode as typed on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Multi-round, caught spies get a final guess
    Easy,
    /// Multi-round, caught spies are simply removed
    Hard,
    /// One pass of accusations
    Single,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Easy => GameMode::MultiRound(Difficulty::Easy),
            ModeArg::Hard => GameMode::MultiRound(Difficulty::Hard),
            ModeArg::Single => GameMode::SingleRound,
        }
    }
}
