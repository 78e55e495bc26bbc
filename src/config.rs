//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Which side the human takes in interactive games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    /// The human plays X and moves first.
    #[default]
    Human,
    /// The computer plays X and moves first.
    Computer,
}

impl FirstPlayer {
    /// Returns the display label for this option.
    pub fn label(self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Computer => "Computer",
        }
    }

    /// Swaps the seating.
    pub fn toggle(self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }
}

/// User-configurable settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum duration of a computer move, in milliseconds.
    #[serde(default = "default_think_time_ms")]
    think_time_ms: u64,

    /// Seed for the computer's tie-breaking. Random when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Who moves first in interactive games.
    #[serde(default)]
    first_player: FirstPlayer,

    /// File receiving logs while the terminal UI owns the screen.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_think_time_ms() -> u64 {
    500
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_minimax.log")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            think_time_ms: default_think_time_ms(),
            seed: None,
            first_player: FirstPlayer::default(),
            log_file: default_log_file(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Loads configuration, falling back to defaults when the file does not
    /// exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Minimum duration of a computer move.
    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    /// Overrides the think time.
    pub fn set_think_time_ms(&mut self, think_time_ms: u64) {
        self.think_time_ms = think_time_ms;
    }

    /// Overrides the seating.
    pub fn set_first_player(&mut self, first_player: FirstPlayer) {
        self.first_player = first_player;
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
