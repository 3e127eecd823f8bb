//! Win detection logic for tic-tac-toe.

use crate::board::Board;
use crate::outcome::WinningLine;
use crate::types::{Cell, Symbol};

/// Finds the first completed line.
///
/// Returns the symbol holding all three cells and the line itself,
/// or `None` if no line is complete.
pub fn check_winner(board: &Board) -> Option<(Symbol, WinningLine)> {
    WinningLine::ALL.into_iter().find_map(|line| {
        let [a, b, c] = line.cells();
        match board.get(a)? {
            Cell::Occupied(symbol)
                if board.get(b) == Some(Cell::Occupied(symbol))
                    && board.get(c) == Some(Cell::Occupied(symbol)) =>
            {
                Some((symbol, line))
            }
            _ => None,
        }
    })
}
