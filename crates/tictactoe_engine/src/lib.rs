//! Tic-tac-toe game-state engine.
//!
//! A human plays against a bot whose moves come from an asynchronous
//! [`OpponentMoveProvider`]. The pieces, leaf to root:
//!
//! - **Board**: immutable 3x3 board values ([`Board`], [`Position`])
//! - **Rules**: pure win/draw evaluation ([`evaluate`], [`WinningLine`])
//! - **Controller**: the turn state machine ([`TurnController`])
//! - **Session**: async lifecycle wrapper for presentation code ([`GameSession`])
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_engine::{Board, GameSession, OpponentMoveProvider, ProviderError, Symbol};
//!
//! struct Corner;
//!
//! #[async_trait::async_trait]
//! impl OpponentMoveProvider for Corner {
//!     async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
//!         Ok(if board.is_empty(0) { 0 } else { 8 })
//!     }
//! }
//!
//! # async fn example() -> Result<(), tictactoe_engine::TurnError> {
//! let session = GameSession::new(Corner);
//! session.select_symbol(Symbol::X).await?;
//! let outcome = session.submit_human_move(4).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod controller;
mod outcome;
mod position;
mod provider;
pub mod rules;
mod session;
mod types;

pub use board::{Board, BoardError, CELL_COUNT, ParseBoardError};
pub use controller::{
    HumanMoveResult, OpponentRequest, Phase, Rejection, SessionSnapshot, TurnController,
    TurnError,
};
pub use outcome::{GameOutcome, WinningLine};
pub use position::Position;
pub use provider::{OpponentMoveProvider, ProviderError, ProviderErrorKind};
pub use rules::evaluate;
pub use session::GameSession;
pub use types::{Cell, Symbol, Turn};
