//! Command-line interface for strictly_minimax.

use clap::{Parser, Subcommand};
use strictly_minimax::FirstPlayer;

/// Strictly Minimax - tic-tac-toe against an alpha-beta search
#[derive(Parser, Debug)]
#[command(name = "strictly_minimax")]
#[command(about = "Tic-tac-toe against an unbeatable search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer in the terminal
    Play {
        /// Path to the TOML config file (defaults apply if it does not exist)
        #[arg(short, long, default_value = "strictly_minimax.toml")]
        config: std::path::PathBuf,

        /// Who moves first, overriding the config file
        #[arg(long, value_enum)]
        first: Option<FirstPlayer>,

        /// Minimum computer move time in milliseconds, overriding the config file
        #[arg(long)]
        think_ms: Option<u64>,
    },

    /// Let the search play against itself and report the results
    SelfPlay {
        /// Number of games to play
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Base seed for reproducible tie-breaking
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
