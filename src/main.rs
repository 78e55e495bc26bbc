//! Strictly Minimax - command-line front end
//!
//! Interactive terminal play and headless self-play.

#![warn(missing_docs)]

mod cli;
mod self_play;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_minimax::GameConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            first,
            think_ms,
        } => {
            let mut config = GameConfig::load_or_default(&config)
                .with_context(|| format!("Failed to load config from {}", config.display()))?;
            if let Some(first) = first {
                config.set_first_player(first);
            }
            if let Some(think_ms) = think_ms {
                config.set_think_time_ms(think_ms);
            }
            tui::run_tui(config).await
        }
        Command::SelfPlay { games, seed, json } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();

            self_play::run(games, seed, json).await
        }
    }
}
