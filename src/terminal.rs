//! Line-oriented terminal front end.
//!
//! Reads one command per line, forwards it to the [`GameSession`] and prints
//! the resulting snapshot. All game decisions stay in the engine; this
//! module only parses input and renders state.

use crate::config::BotConfig;
use anyhow::{Context, Result};
use std::str::FromStr;
use tictactoe_engine::{
    Cell, GameOutcome, GameSession, OpponentMoveProvider, Phase, Position, SessionSnapshot,
    Symbol, Turn, TurnError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

const HELP: &str = "\
Commands:
  x | o        choose your symbol
  1-9 | label  place your mark (e.g. 5 or center)
  retry        ask the bot again after a failed request
  reset        start over
  help         show this text
  quit         leave";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Choose a symbol.
    Select(Symbol),
    /// Place a mark at a board index.
    Move(usize),
    /// Re-request the bot's move.
    Retry,
    /// Reset the session.
    Reset,
    /// Show help.
    Help,
    /// Exit.
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "retry" | "r" => return Ok(Input::Retry),
            "reset" | "new" => return Ok(Input::Reset),
            "help" | "h" | "?" => return Ok(Input::Help),
            "quit" | "q" | "exit" => return Ok(Input::Quit),
            _ => {}
        }
        if let Ok(symbol) = Symbol::from_str(s) {
            return Ok(Input::Select(symbol));
        }
        Position::parse_input(s)
            .map(|pos| Input::Move(pos.to_index()))
            .ok_or_else(|| format!("unrecognised input {s:?}; type 'help'"))
    }
}

/// Renders a snapshot, bracketing the cells of a winning line.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let line = snapshot.outcome.and_then(|o| o.winning_line());
    let mut out = String::new();

    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                let mark = match snapshot.board.get(index) {
                    Some(Cell::Occupied(symbol)) => symbol.to_string(),
                    _ => (index + 1).to_string(),
                };
                if line.is_some_and(|l| l.contains(index)) {
                    format!("[{mark}]")
                } else {
                    format!(" {mark} ")
                }
            })
            .collect();
        out.push_str(&cells.join("|"));
        out.push('\n');
        if row < 2 {
            out.push_str("---+---+---\n");
        }
    }

    out.push_str(&status_line(snapshot));
    out
}

fn status_line(snapshot: &SessionSnapshot) -> String {
    match (snapshot.phase, snapshot.outcome) {
        (Phase::AwaitingSymbolSelection, _) => "Play as X or O?".to_string(),
        (Phase::Terminal, Some(outcome @ GameOutcome::Won { .. })) => {
            let whom = if outcome.winner() == snapshot.human_symbol {
                "you"
            } else {
                "the bot"
            };
            format!("Game over: {outcome} ({whom}). Type 'reset' to play again.")
        }
        (Phase::Terminal, _) => "Game over: draw. Type 'reset' to play again.".to_string(),
        (Phase::InProgress, _) => match snapshot.turn {
            Some(Turn::Human) => "Your move.".to_string(),
            _ if snapshot.awaiting_opponent => "Waiting for the bot...".to_string(),
            _ => "The bot has not moved; type 'retry' to ask again.".to_string(),
        },
    }
}

fn describe(err: &TurnError) -> String {
    match err {
        TurnError::OpponentMoveInvalid { .. } | TurnError::OpponentTransportFailure(_) => {
            format!("{err}. Type 'retry' to ask the bot again.")
        }
        _ => err.to_string(),
    }
}

/// Runs the interactive loop until `quit` or end of input.
#[instrument(skip_all)]
pub async fn run<P, R, W>(
    session: GameSession<P>,
    config: &BotConfig,
    input: R,
    mut output: W,
) -> Result<()>
where
    P: OpponentMoveProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Starting terminal session");
    let mut lines = input.lines();

    loop {
        if let Some(symbol) = *config.human_symbol()
            && session.snapshot().await.phase == Phase::AwaitingSymbolSelection
        {
            session.select_symbol(symbol).await?;
        }

        let snapshot = session.snapshot().await;
        write(&mut output, &format!("\n{}\n> ", render(&snapshot))).await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Input>() {
            Ok(command) => command,
            Err(message) => {
                write(&mut output, &format!("! {message}\n")).await?;
                continue;
            }
        };
        debug!(?command, "Handling input");

        let result = match command {
            Input::Quit => break,
            Input::Help => {
                write(&mut output, &format!("{HELP}\n")).await?;
                continue;
            }
            Input::Reset => {
                session.reset().await;
                continue;
            }
            Input::Select(symbol) => session.select_symbol(symbol).await.map(|_| ()),
            Input::Move(index) => session.submit_human_move(index).await.map(|_| ()),
            Input::Retry => session.retry_opponent_move().await.map(|_| ()),
        };

        if let Err(err) = result {
            write(&mut output, &format!("! {}\n", describe(&err))).await?;
        }
    }

    info!("Terminal session ended");
    write(&mut output, "\nBye.\n").await
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to flush output")
}
