//! Board state and win detection.

use super::types::{GameStatus, Mark, Move};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Side length of the grid.
pub const SIZE: usize = 3;

/// Number of cells, and the round at which a full board ends the game.
pub const CELLS: usize = SIZE * SIZE;

/// 3x3 tic-tac-toe board with round counter and winner.
///
/// `Board` is `Copy`; the search explores private copies and never touches
/// the board owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells indexed `[y][x]`.
    cells: [[Option<Mark>; SIZE]; SIZE],
    /// Number of moves applied.
    round: usize,
    /// Set once when a line is completed.
    winner: Option<Mark>,
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[None; SIZE]; SIZE],
            round: 0,
            winner: None,
        }
    }

    /// Resets every cell, the round counter and the winner.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Places `mark` at (x, y).
    ///
    /// Out-of-range or occupied targets are ignored; callers check
    /// [`Board::is_available`] first.
    pub fn insert(&mut self, x: usize, y: usize, mark: Mark) {
        if !self.is_available(x, y) {
            trace!("Ignoring insert on unavailable cell");
            return;
        }

        self.cells[y][x] = Some(mark);
        self.round += 1;

        if self.winner.is_none() && self.completes_line(x, y, mark) {
            self.winner = Some(mark);
        }
    }

    /// Applies a move for `mark`. Same semantics as [`Board::insert`].
    pub fn play(&mut self, mv: Move, mark: Mark) {
        self.insert(mv.x, mv.y, mark);
    }

    /// Whether the row, column or a diagonal through (x, y) is all `mark`.
    fn completes_line(&self, x: usize, y: usize, mark: Mark) -> bool {
        let owned = |cx: usize, cy: usize| self.cells[cy][cx] == Some(mark);

        let row = (0..SIZE).all(|i| owned(i, y));
        let column = (0..SIZE).all(|i| owned(x, i));
        let diagonal = x == y && (0..SIZE).all(|i| owned(i, i));
        let anti_diagonal = x == SIZE - 1 - y && (0..SIZE).all(|i| owned(SIZE - 1 - i, i));

        row || column || diagonal || anti_diagonal
    }

    /// Occupant of (x, y), `None` when empty or off the board.
    pub fn get(&self, x: usize, y: usize) -> Option<Mark> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// True iff (x, y) is on the board and empty.
    pub fn is_available(&self, x: usize, y: usize) -> bool {
        x < SIZE && y < SIZE && self.cells[y][x].is_none()
    }

    /// True iff a player has won or every cell is taken.
    pub fn is_finished(&self) -> bool {
        self.winner.is_some() || self.round >= CELLS
    }

    /// True iff the game ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.is_finished() && self.winner.is_none()
    }

    /// Number of moves applied so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// The winner, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Mark whose turn it is.
    pub fn next_mark(&self) -> Mark {
        Mark::from_index(self.round)
    }

    /// Status summary for display.
    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(mark) => GameStatus::Won(mark),
            None if self.is_finished() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// All empty cells in row-major order (y outer, x inner).
    pub fn available_moves(&self) -> Vec<Move> {
        (0..SIZE)
            .flat_map(|y| (0..SIZE).map(move |x| Move::new(x, y)))
            .filter(|mv| self.is_available(mv.x, mv.y))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..SIZE {
            for x in 0..SIZE {
                match self.get(x, y) {
                    Some(mark) => write!(f, "{}", mark)?,
                    None => write!(f, "{}", y * SIZE + x + 1)?,
                }
                if x < SIZE - 1 {
                    write!(f, "|")?;
                }
            }
            if y < SIZE - 1 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.round(), 0);
        assert_eq!(board.winner(), None);
        assert!(!board.is_finished());
        assert_eq!(board.available_moves().len(), 9);
    }

    #[test]
    fn test_anti_diagonal_win() {
        let mut board = Board::new();
        board.insert(2, 0, Mark::O);
        board.insert(1, 1, Mark::O);
        assert_eq!(board.winner(), None);
        board.insert(0, 2, Mark::O);
        assert_eq!(board.winner(), Some(Mark::O));
        assert_eq!(board.status(), GameStatus::Won(Mark::O));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut board = Board::new();
        board.insert(0, 0, Mark::X);
        board.insert(1, 0, Mark::X);
        board.insert(2, 0, Mark::X);
        assert!(board.is_finished());

        board.clear();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.insert(0, 0, Mark::X);
        board.insert(1, 1, Mark::O);
        assert_eq!(board.to_string(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }
}
