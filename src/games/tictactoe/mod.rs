mod board;
mod types;

pub use board::{Board, CELLS, SIZE};
pub use types::{GameStatus, Mark, Move};
