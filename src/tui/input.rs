//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use strictly_minimax::{Move, SIZE};

/// Moves cursor based on arrow keys, stopping at the board edges.
pub fn move_cursor(cursor: Move, key: KeyCode) -> Move {
    let last = SIZE - 1;
    match key {
        KeyCode::Left => Move::new(cursor.x.saturating_sub(1), cursor.y),
        KeyCode::Right => Move::new((cursor.x + 1).min(last), cursor.y),
        KeyCode::Up => Move::new(cursor.x, cursor.y.saturating_sub(1)),
        KeyCode::Down => Move::new(cursor.x, (cursor.y + 1).min(last)),
        _ => cursor,
    }
}
