//! Terminal UI: human against the search strategy.

mod app;
mod input;
mod ui;

use anyhow::{Context, Result};
use app::{App, Flow};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;
use strictly_minimax::GameConfig;
use tracing::{error, info, instrument};

/// Runs the terminal UI until the user quits.
pub async fn run_tui(config: GameConfig) -> Result<()> {
    // Log to a file so output does not corrupt the screen
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(?config, "Starting Strictly Minimax TUI");

    let mut terminal = ratatui::init();
    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app).await;
    let shutdown = app.shutdown().await;
    ratatui::restore();

    if let Err(err) = &res {
        error!(error = ?err, "UI loop error");
    }
    res.and(shutdown)
}

#[instrument(skip_all)]
async fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    app.new_game().await?;

    loop {
        let snapshot = app.snapshot();
        let status = app.status_line(&snapshot);
        terminal.draw(|frame| ui::draw(frame, &snapshot, app.cursor(), &status))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code).await? == Flow::Quit
        {
            info!("User quit");
            return Ok(());
        }
    }
}
