//! Winning lines and game outcomes.

use crate::types::Symbol;
use serde::{Deserialize, Serialize};

/// One of the eight index triples that wins the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([usize; 3]);

impl WinningLine {
    /// Every winning line, in evaluation order: rows, columns, diagonals.
    pub const ALL: [WinningLine; 8] = [
        // Rows
        WinningLine([0, 1, 2]),
        WinningLine([3, 4, 5]),
        WinningLine([6, 7, 8]),
        // Columns
        WinningLine([0, 3, 6]),
        WinningLine([1, 4, 7]),
        WinningLine([2, 5, 8]),
        // Diagonals
        WinningLine([0, 4, 8]),
        WinningLine([2, 4, 6]),
    ];

    /// Board indices making up this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    /// Checks whether `index` lies on this line.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }
}

impl std::fmt::Display for WinningLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a}, {b}, {c}]")
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// No line is complete and empty cells remain.
    InProgress,
    /// `symbol` completed `line`.
    Won {
        /// The winning symbol.
        symbol: Symbol,
        /// The completed line.
        line: WinningLine,
    },
    /// Board is full and nobody won.
    Drawn,
}

impl GameOutcome {
    /// Returns true once the game has been won or drawn.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Symbol> {
        match self {
            GameOutcome::Won { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// Cells to highlight for a win.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self {
            GameOutcome::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Won { symbol, .. } => write!(f, "{symbol} wins!"),
            GameOutcome::Drawn => write!(f, "Draw"),
        }
    }
}
