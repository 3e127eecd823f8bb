//! The 3x3 board value.

use crate::types::{Cell, Symbol};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Errors raised by [`Board::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// Target cell already holds a symbol.
    #[display("cell {_0} is already occupied")]
    CellOccupied(#[error(not(source))] usize),
    /// Index is outside 0..=8.
    #[display("cell index {_0} is out of range (must be 0-8)")]
    IndexOutOfRange(#[error(not(source))] usize),
}

/// Error parsing a board from its compact string form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid board {input:?}: {reason}")]
pub struct ParseBoardError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: [`Board::apply_move`] returns a new board and never
/// touches the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Returns a fresh all-empty board.
    pub fn reset() -> Self {
        Self::new()
    }

    /// Gets the cell at the given index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Places `symbol` at `index`, returning the resulting board.
    ///
    /// # Errors
    ///
    /// [`BoardError::IndexOutOfRange`] if `index > 8`,
    /// [`BoardError::CellOccupied`] if the cell is taken.
    #[instrument(skip(self))]
    pub fn apply_move(&self, index: usize, symbol: Symbol) -> Result<Board, BoardError> {
        match self.get(index) {
            None => Err(BoardError::IndexOutOfRange(index)),
            Some(Cell::Occupied(_)) => Err(BoardError::CellOccupied(index)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Occupied(symbol);
                Ok(next)
            }
        }
    }

    /// Wire form sent to the opponent service: `null` for empty cells.
    pub fn to_wire(&self) -> [Option<Symbol>; CELL_COUNT] {
        self.cells.map(Cell::symbol)
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their 1-based number so players can pick them.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Occupied(s) => s.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses nine characters: `X`, `O`, or one of `.`, `_`, `-` for empty.
    /// Whitespace and `|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: String| ParseBoardError {
            input: s.to_string(),
            reason,
        };

        let mut cells = Vec::with_capacity(CELL_COUNT);
        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let cell = match ch {
                'X' | 'x' => Cell::Occupied(Symbol::X),
                'O' | 'o' => Cell::Occupied(Symbol::O),
                '.' | '_' | '-' => Cell::Empty,
                other => return Err(err(format!("unexpected character {other:?}"))),
            };
            cells.push(cell);
        }

        let cells: [Cell; CELL_COUNT] = cells
            .try_into()
            .map_err(|v: Vec<Cell>| err(format!("expected 9 cells, found {}", v.len())))?;
        Ok(Self { cells })
    }
}
