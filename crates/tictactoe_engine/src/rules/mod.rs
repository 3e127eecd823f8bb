//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board storage
//! so the turn controller can run them after each half-move.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use crate::board::Board;
use crate::outcome::GameOutcome;
use tracing::instrument;

/// Evaluates a board.
///
/// The first completed line in [`WinningLine::ALL`](crate::WinningLine::ALL)
/// order decides a win; a full board without one is a draw.
#[instrument(level = "debug", skip(board), ret)]
pub fn evaluate(board: &Board) -> GameOutcome {
    if let Some((symbol, line)) = check_winner(board) {
        GameOutcome::Won { symbol, line }
    } else if is_full(board) {
        GameOutcome::Drawn
    } else {
        GameOutcome::InProgress
    }
}
