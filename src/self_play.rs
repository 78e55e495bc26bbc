//! Headless search-vs-search games.

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use strictly_minimax::{Board, GameSession, GameStatus, Mark, SearchStrategy};
use tracing::{debug, info, instrument};

/// Tally of finished self-play games.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SelfPlayReport {
    /// Games played.
    games: usize,
    /// Games won by X.
    x_wins: usize,
    /// Games won by O.
    o_wins: usize,
    /// Drawn games.
    draws: usize,
    /// Games stopped before the board finished.
    aborted: usize,
}

impl SelfPlayReport {
    /// Records the final board of one game.
    fn record(&mut self, board: &Board) {
        self.games += 1;
        match board.status() {
            GameStatus::Won(Mark::X) => self.x_wins += 1,
            GameStatus::Won(Mark::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => self.aborted += 1,
        }
    }
}

impl std::fmt::Display for SelfPlayReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} games: {} drawn, {} won by X, {} won by O",
            self.games, self.draws, self.x_wins, self.o_wins
        )?;
        if self.aborted > 0 {
            write!(f, ", {} aborted", self.aborted)?;
        }
        Ok(())
    }
}

/// Plays `games` search-vs-search games and prints the report.
#[instrument]
pub async fn run(games: usize, seed: Option<u64>, json: bool) -> Result<()> {
    let report = play(games, seed).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

async fn play(games: usize, seed: Option<u64>) -> Result<SelfPlayReport> {
    info!(games, ?seed, "Starting self-play");
    let mut session = GameSession::new();
    let mut report = SelfPlayReport::default();

    for game in 0..games {
        let (x, o) = match seed {
            Some(seed) => {
                let base = seed.wrapping_add(2 * game as u64);
                (
                    SearchStrategy::with_seed("Search X", base),
                    SearchStrategy::with_seed("Search O", base.wrapping_add(1)),
                )
            }
            None => (SearchStrategy::new("Search X"), SearchStrategy::new("Search O")),
        };

        session
            .start_new_game(
                Box::new(x.with_think_time(Duration::ZERO)),
                Box::new(o.with_think_time(Duration::ZERO)),
            )
            .await?;
        let snapshot = session.wait().await?;

        debug!(game, board = %snapshot.board(), "Game finished");
        report.record(snapshot.board());
    }

    Ok(report)
}
