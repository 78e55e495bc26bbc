//! Core domain types for tic-tac-toe.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player identity in the game.
///
/// `X` is identity 0 and always moves on even rounds, `O` is identity 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Mark {
    /// Returns the opponent.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Numeric identity, 0 for X and 1 for O.
    pub fn index(self) -> usize {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }

    /// Mark for a numeric identity. Only the lowest bit is considered,
    /// so a round counter maps straight to the mover.
    pub fn from_index(index: usize) -> Self {
        if index & 1 == 0 { Mark::X } else { Mark::O }
    }
}

/// A move on the board as an (x, y) coordinate pair.
///
/// Moves coming from outside the engine are not validated on construction;
/// [`super::Board::is_available`] decides whether one can be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// Column, 0 is the left edge.
    pub x: usize,
    /// Row, 0 is the top edge.
    pub y: usize,
}

impl Move {
    /// Creates a move from a keypad number 1-9, counted left-to-right and
    /// top-to-bottom.
    #[instrument]
    pub fn from_keypad(key: u32) -> Option<Self> {
        match key {
            1..=9 => {
                let idx = (key - 1) as usize;
                Some(Self::new(idx % 3, idx / 3))
            }
            _ => None,
        }
    }

    /// Keypad number 1-9 for this move, if it is on the board.
    pub fn keypad(self) -> Option<u32> {
        (self.x < 3 && self.y < 3).then(|| (self.y * 3 + self.x + 1) as u32)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Mark),
    /// Game ended in a draw.
    Draw,
}
