//! Strategy trait and implementations.

mod external;
mod search;

pub use external::{ExternalInputStrategy, MoveSender};
pub use search::{DEFAULT_THINK_TIME, SearchStrategy};

use crate::abort::AbortSignal;
use crate::games::tictactoe::{Board, Mark, Move};

/// A move-producing policy bound to one mark for one game.
#[async_trait::async_trait]
pub trait Strategy: Send {
    /// Binds this strategy to the mark it plays for the coming game.
    fn assign(&mut self, mark: Mark);

    /// Produces the next move for the current board.
    ///
    /// Returns `None` when the turn was abandoned, either because the game
    /// was aborted or because no move can be produced. The returned move is
    /// not validated; the session checks it against the board.
    async fn next_move(&mut self, board: &Board, abort: &AbortSignal) -> Option<Move>;

    /// Returns the strategy's display name.
    fn name(&self) -> &str;
}
