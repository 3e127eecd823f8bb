//! Command-line interface for tictactoe_bot.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_engine::Symbol;

/// Tic-tac-toe against a remote bot
#[derive(Parser, Debug)]
#[command(name = "tictactoe_bot")]
#[command(about = "Play tic-tac-toe against a remote move-suggestion bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Opponent service URL (overrides config and environment)
        #[arg(long)]
        endpoint: Option<String>,

        /// Opponent request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Play as X or O without being asked
        #[arg(short, long)]
        symbol: Option<Symbol>,
    },

    /// Evaluate a board given as nine characters (X, O, or . for empty)
    Evaluate {
        /// Board in row-major order, e.g. "XX.OO...."
        board: String,
    },
}
