//! Tic-tac-toe against a remote move-suggestion bot.
//!
//! The game rules and turn sequencing live in [`tictactoe_engine`]; this
//! crate supplies the pieces around it:
//!
//! - **Config**: endpoint and timeout from TOML, environment and flags
//! - **HTTP opponent**: [`OpponentMoveProvider`](tictactoe_engine::OpponentMoveProvider)
//!   that POSTs the board to the bot service
//! - **Terminal**: a line-oriented front end that renders session snapshots
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_bot::{BotConfig, HttpOpponent};
//! use tictactoe_engine::{GameSession, Symbol};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = BotConfig::load(None)?;
//! let session = GameSession::new(HttpOpponent::new(&config)?).with_timeout(config.timeout());
//! session.select_symbol(Symbol::X).await?;
//! let outcome = session.submit_human_move(4).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod http_opponent;
pub mod terminal;

pub use cli::{Cli, Command};
pub use config::{
    BotConfig, ConfigError, DEFAULT_ENDPOINT, DEFAULT_LOG_FILTER, ENDPOINT_VAR, TIMEOUT_VAR,
};
pub use http_opponent::HttpOpponent;
