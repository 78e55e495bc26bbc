//! Minimax search with alpha-beta pruning.

use super::Strategy;
use crate::abort::AbortSignal;
use crate::games::tictactoe::{Board, Mark, Move};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Minimum time a search move takes unless configured otherwise.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_millis(500);

/// Computer player searching the full game tree.
///
/// Assuming the opponent plays optimally, picks the move with the highest
/// guaranteed score. Moves with equal scores are chosen uniformly at random
/// from the strategy's own random source.
#[derive(Debug, Clone)]
pub struct SearchStrategy {
    name: String,
    mark: Mark,
    rng: ChaCha8Rng,
    think_time: Duration,
}

impl SearchStrategy {
    /// Creates a search strategy seeded from OS entropy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rng(name.into(), ChaCha8Rng::from_entropy())
    }

    /// Creates a search strategy with a fixed seed for reproducible play.
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(name.into(), ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(name: String, rng: ChaCha8Rng) -> Self {
        info!(strategy = %name, "Creating search strategy");
        Self {
            name,
            mark: Mark::X,
            rng,
            think_time: DEFAULT_THINK_TIME,
        }
    }

    /// Sets the minimum duration of a move. Zero disables padding.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// The mark this strategy plays.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Picks the best move for this strategy's mark.
    ///
    /// Returns `None` only when the board has no empty cell.
    #[instrument(skip(self, board), fields(strategy = %self.name, mark = %self.mark))]
    pub fn choose_move(&mut self, board: &Board) -> Option<Move> {
        let mut best_move = None;
        let mut best_score = i32::MIN;
        let mut ties: u32 = 0;

        for mv in board.available_moves() {
            let mut next = *board;
            next.play(mv, self.mark);
            let score = self.minimax(&next, i32::MIN, i32::MAX, false);

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                ties = 1;
            } else if score == best_score {
                // Reservoir sampling: the k-th tie wins with probability 1/k.
                ties += 1;
                if self.rng.gen_range(0..ties) == 0 {
                    best_move = Some(mv);
                }
            }
        }

        debug!(?best_move, best_score, ties, "Search chose move");
        best_move
    }

    /// Minimax value of every available move, in row-major order.
    #[instrument(skip(self, board), fields(mark = %self.mark))]
    pub fn scored_moves(&self, board: &Board) -> Vec<(Move, i32)> {
        board
            .available_moves()
            .into_iter()
            .map(|mv| {
                let mut next = *board;
                next.play(mv, self.mark);
                (mv, self.minimax(&next, i32::MIN, i32::MAX, false))
            })
            .collect()
    }

    /// Heuristic value of a board from this strategy's point of view.
    ///
    /// Wins score `20 - round` and losses `round - 10`, so faster wins and
    /// slower losses are preferred. Any other board scores its round number;
    /// the search only asks about finished boards.
    pub fn board_score(&self, board: &Board) -> i32 {
        let round = board.round() as i32;
        match board.winner() {
            None => round,
            Some(winner) if winner == self.mark => 20 - round,
            Some(_) => round - 10,
        }
    }

    /// Best score reachable from `board` when both sides play optimally.
    ///
    /// `maximizing` is true when this strategy's mark moves next.
    pub fn minimax(&self, board: &Board, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        if board.is_finished() {
            return self.board_score(board);
        }

        let mover = if maximizing { self.mark } else { self.mark.opponent() };

        if maximizing {
            let mut result = i32::MIN;
            for mv in board.available_moves() {
                let mut next = *board;
                next.play(mv, mover);
                result = result.max(self.minimax(&next, alpha, beta, false));
                alpha = alpha.max(result);
                if beta <= alpha {
                    break;
                }
            }
            result
        } else {
            let mut result = i32::MAX;
            for mv in board.available_moves() {
                let mut next = *board;
                next.play(mv, mover);
                result = result.min(self.minimax(&next, alpha, beta, true));
                beta = beta.min(result);
                if beta <= alpha {
                    break;
                }
            }
            result
        }
    }
}

#[async_trait::async_trait]
impl Strategy for SearchStrategy {
    fn assign(&mut self, mark: Mark) {
        debug!(strategy = %self.name, %mark, "Assigned mark");
        self.mark = mark;
    }

    async fn next_move(&mut self, board: &Board, abort: &AbortSignal) -> Option<Move> {
        let started = Instant::now();
        let choice = self.choose_move(board);
        let elapsed = started.elapsed();
        debug!(
            strategy = %self.name,
            elapsed_ms = elapsed.as_millis() as u64,
            "Search finished"
        );

        let remaining = self.think_time.saturating_sub(elapsed);
        if !remaining.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(remaining) => {}
                _ = abort.aborted() => {}
            }
        }

        choice
    }

    fn name(&self) -> &str {
        &self.name
    }
}
