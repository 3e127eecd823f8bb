//! tictactoe_bot - play tic-tac-toe against a remote bot.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tictactoe_bot::{BotConfig, Cli, Command, DEFAULT_LOG_FILTER, HttpOpponent, terminal};
use tictactoe_engine::{Board, GameSession, Symbol, evaluate};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they don't interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            config,
            endpoint,
            timeout_ms,
            symbol,
        } => run_play(config, endpoint, timeout_ms, symbol).await,
        Command::Evaluate { board } => run_evaluate(&board),
    }
}

/// Run an interactive game against the configured bot
#[instrument(skip_all)]
async fn run_play(
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    symbol: Option<Symbol>,
) -> Result<()> {
    let mut config = BotConfig::load(config_path.as_deref())?;
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(timeout_ms) = timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(symbol) = symbol {
        config = config.with_human_symbol(symbol);
    }
    config.validate()?;
    info!(endpoint = %config.endpoint(), timeout_ms = config.timeout_ms(), "Starting game");

    let opponent = HttpOpponent::new(&config).context("Failed to create HTTP client")?;
    let session = GameSession::new(opponent).with_timeout(config.timeout());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    terminal::run(session, &config, stdin, tokio::io::stdout()).await
}

/// Print the outcome of a board given on the command line
fn run_evaluate(board: &str) -> Result<()> {
    let board: Board = board.parse()?;
    let outcome = evaluate(&board);
    println!("{}\n", board.display());
    match outcome.winning_line() {
        Some(line) => println!("{outcome} Line: {line}"),
        None => println!("{outcome}"),
    }
    Ok(())
}
