//! Strictly Minimax - tic-tac-toe engine with pluggable player strategies
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid state with win and draw detection
//! - **Strategies**: alpha-beta search, or moves supplied from outside
//! - **Session**: runs a game on its own task, alternating between two
//!   strategies until the board is finished or the game is aborted
//!
//! # Example
//!
//! ```no_run
//! use strictly_minimax::{GameSession, SearchStrategy};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut session = GameSession::new();
//! session
//!     .start_new_game(
//!         Box::new(SearchStrategy::new("X").with_think_time(Duration::ZERO)),
//!         Box::new(SearchStrategy::new("O").with_think_time(Duration::ZERO)),
//!     )
//!     .await?;
//! let result = session.wait().await?;
//! assert!(result.board().is_draw());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod abort;
mod config;
mod games;
mod players;
mod session;

// Crate-level exports - Abort signalling
pub use abort::{AbortFlag, AbortSignal};

// Crate-level exports - Configuration
pub use config::{ConfigError, FirstPlayer, GameConfig};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{Board, CELLS, GameStatus, Mark, Move, SIZE};

// Crate-level exports - Strategies
pub use players::{DEFAULT_THINK_TIME, ExternalInputStrategy, MoveSender, SearchStrategy, Strategy};

// Crate-level exports - Session management
pub use session::{GameSession, SessionError, SessionSnapshot, SessionState};
