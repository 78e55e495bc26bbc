//! Game session: turn orchestration between two strategies.

use crate::abort::{AbortFlag, AbortSignal};
use crate::games::tictactoe::{Board, Mark, Move};
use crate::players::Strategy;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a session's current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum SessionState {
    /// No game has been started.
    Idle,
    /// The game loop is running.
    Running,
    /// The game reached a win or a draw.
    Finished,
    /// The game was stopped before it finished.
    Aborted,
}

/// Read-only view of a session, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SessionSnapshot {
    /// Lifecycle state.
    state: SessionState,
    /// Board of the current or last game.
    board: Board,
    /// Strategy names, indexed by mark.
    players: [String; 2],
    /// Most recently applied move.
    last_move: Option<(Mark, Move)>,
}

impl SessionSnapshot {
    fn idle() -> Self {
        Self {
            state: SessionState::Idle,
            board: Board::new(),
            players: [String::new(), String::new()],
            last_move: None,
        }
    }

    /// Name of the strategy playing `mark`.
    pub fn player(&self, mark: Mark) -> &str {
        &self.players[mark.index()]
    }

    /// Mark expected to move, or `None` when no game is in progress.
    pub fn to_move(&self) -> Option<Mark> {
        (self.state == SessionState::Running && !self.board.is_finished())
            .then(|| self.board.next_mark())
    }
}

/// Game session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<tokio::task::JoinError> for SessionError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Game loop failed: {}", err))
    }
}

/// Handle to the game loop task.
struct RunningGame {
    abort: AbortFlag,
    handle: JoinHandle<()>,
}

/// Owns one game at a time and runs it on its own task.
///
/// Observers follow the game through [`GameSession::subscribe`]. Starting a
/// new game aborts the previous one and waits for its loop to exit first.
pub struct GameSession {
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    running: Option<RunningGame>,
}

impl GameSession {
    /// Creates an idle session.
    #[instrument]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::idle());
        Self {
            snapshots: Arc::new(tx),
            running: None,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every applied move and state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    /// Whether a game loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|game| !game.handle.is_finished())
    }

    /// Starts a new game. `first` plays X, `second` plays O.
    ///
    /// A game still running is aborted and fully torn down before the new
    /// one begins.
    #[instrument(skip_all, fields(first = %first.name(), second = %second.name()))]
    pub async fn start_new_game(
        &mut self,
        mut first: Box<dyn Strategy>,
        mut second: Box<dyn Strategy>,
    ) -> Result<(), SessionError> {
        self.abort().await?;

        first.assign(Mark::X);
        second.assign(Mark::O);

        let players = [first.name().to_string(), second.name().to_string()];
        self.snapshots.send_replace(SessionSnapshot {
            state: SessionState::Running,
            board: Board::new(),
            players,
            last_move: None,
        });

        let abort = AbortFlag::new();
        let handle = tokio::spawn(run_game(
            [first, second],
            abort.signal(),
            Arc::clone(&self.snapshots),
        ));
        self.running = Some(RunningGame { abort, handle });

        info!("New game started");
        Ok(())
    }

    /// Aborts the running game, if any, and waits for its loop to exit.
    #[instrument(skip(self))]
    pub async fn abort(&mut self) -> Result<(), SessionError> {
        let Some(game) = self.running.take() else {
            return Ok(());
        };

        game.abort.raise();
        let joined = game.handle.await;
        self.settle_if_running();
        joined?;

        debug!("Previous game torn down");
        Ok(())
    }

    /// Waits until the running game ends on its own and returns the final
    /// snapshot.
    #[instrument(skip(self))]
    pub async fn wait(&mut self) -> Result<SessionSnapshot, SessionError> {
        if let Some(game) = self.running.take() {
            let joined = game.handle.await;
            self.settle_if_running();
            joined?;
        }
        Ok(self.snapshot())
    }

    /// Marks the game aborted if its loop died without publishing an end
    /// state.
    fn settle_if_running(&self) {
        self.snapshots.send_if_modified(|snapshot| {
            if snapshot.state == SessionState::Running {
                snapshot.state = SessionState::Aborted;
                true
            } else {
                false
            }
        });
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(game) = &self.running {
            game.abort.raise();
        }
    }
}

/// Runs one game to completion or abort.
#[instrument(skip_all)]
async fn run_game(
    mut strategies: [Box<dyn Strategy>; 2],
    abort: AbortSignal,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
) {
    let mut board = Board::new();

    while !abort.is_aborted() && !board.is_finished() {
        let mover = Mark::from_index(board.round());
        let strategy = &mut strategies[mover.index()];
        debug!(%mover, player = %strategy.name(), round = board.round(), "Requesting move");

        let Some(mv) = strategy.next_move(&board, &abort).await else {
            info!(%mover, "Turn abandoned");
            break;
        };

        if abort.is_aborted() {
            debug!(%mover, %mv, "Discarding move from aborted game");
            break;
        }

        if !board.is_available(mv.x, mv.y) {
            warn!(%mover, %mv, "Rejected unavailable move");
            continue;
        }

        board.play(mv, mover);
        debug!(%mover, %mv, round = board.round(), "Move applied");
        snapshots.send_modify(|snapshot| {
            snapshot.board = board;
            snapshot.last_move = Some((mover, mv));
        });
    }

    let state = if board.is_finished() {
        SessionState::Finished
    } else {
        SessionState::Aborted
    };
    snapshots.send_modify(|snapshot| snapshot.state = state);

    info!(%state, status = ?board.status(), "Game loop ended");
}
