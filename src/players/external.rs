//! Player whose moves come from outside the engine.

use super::Strategy;
use crate::abort::AbortSignal;
use crate::games::tictactoe::{Board, Mark, Move};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Strategy that waits for a move delivered through a [`MoveSender`].
///
/// Typically backed by a human at a keyboard or pointer. The move is
/// returned as received; the session decides whether it can be played.
pub struct ExternalInputStrategy {
    name: String,
    mark: Option<Mark>,
    moves: mpsc::Receiver<Move>,
}

impl ExternalInputStrategy {
    /// Creates the strategy together with the sender that feeds it.
    ///
    /// The channel holds a single pending move.
    pub fn channel(name: impl Into<String>) -> (Self, MoveSender) {
        let name = name.into();
        info!(strategy = %name, "Creating external input strategy");
        let (tx, rx) = mpsc::channel(1);
        (
            Self {
                name,
                mark: None,
                moves: rx,
            },
            MoveSender { tx },
        )
    }

    /// The mark assigned for the current game.
    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }
}

#[async_trait::async_trait]
impl Strategy for ExternalInputStrategy {
    fn assign(&mut self, mark: Mark) {
        debug!(strategy = %self.name, %mark, "Assigned mark");
        self.mark = Some(mark);
    }

    #[instrument(skip_all, fields(strategy = %self.name))]
    async fn next_move(&mut self, _board: &Board, abort: &AbortSignal) -> Option<Move> {
        debug!("Waiting for external move");

        tokio::select! {
            biased;
            _ = abort.aborted() => {
                debug!("Abort requested while waiting for input");
                None
            }
            received = self.moves.recv() => {
                if received.is_none() {
                    warn!("Move source disconnected");
                }
                received
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Delivers moves to an [`ExternalInputStrategy`].
#[derive(Debug, Clone)]
pub struct MoveSender {
    tx: mpsc::Sender<Move>,
}

impl MoveSender {
    /// Offers a move without waiting.
    ///
    /// Returns `false` if a move is already pending or the strategy is gone.
    #[instrument(skip(self))]
    pub fn try_submit(&self, mv: Move) -> bool {
        match self.tx.try_send(mv) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("A move is already pending, dropping input");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Strategy dropped, dropping input");
                false
            }
        }
    }

    /// Submits a move, waiting for the pending slot to free up.
    ///
    /// Returns `false` if the strategy is gone.
    #[instrument(skip(self))]
    pub async fn submit(&self, mv: Move) -> bool {
        self.tx.send(mv).await.is_ok()
    }
}
