//! Turn sequencing state machine.
//!
//! The controller is synchronous. The opponent's half-move is split in two:
//! [`TurnController::begin_human_move`] hands out an [`OpponentRequest`]
//! ticket, and [`TurnController::resolve_opponent_move`] redeems it with
//! whatever the provider answered. Tickets carry the generation they were
//! issued under, so an answer that arrives after a reset (or after the
//! request was superseded) is discarded instead of landing on a new board.

use crate::board::{Board, BoardError};
use crate::outcome::GameOutcome;
use crate::provider::ProviderError;
use crate::rules::evaluate;
use crate::types::{Symbol, Turn};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Coarse lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Phase {
    /// Waiting for the human to pick X or O.
    AwaitingSymbolSelection,
    /// Moves are being played.
    InProgress,
    /// Won or drawn; only a reset continues.
    Terminal,
}

/// Why a move or request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// Target cell is taken.
    #[display("cell {_0} is already occupied")]
    CellOccupied(usize),
    /// The opponent is due to move.
    #[display("it is not the human's turn")]
    NotHumanTurn,
    /// The human is due to move.
    #[display("it is not the opponent's turn")]
    NotOpponentTurn,
    /// The game already ended.
    #[display("the game is over")]
    GameOver,
    /// No symbol has been chosen yet.
    #[display("no symbol selected")]
    NoSymbolSelected,
    /// A symbol was already chosen for this game.
    #[display("symbol already selected")]
    SymbolAlreadySelected,
    /// An opponent request is outstanding.
    #[display("an opponent request is already in flight")]
    OpponentRequestInFlight,
}

/// Errors from the turn controller. None of them are fatal; the board is
/// always left in its last evaluated state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TurnError {
    /// Move refused; nothing changed.
    #[display("illegal move: {_0}")]
    IllegalMove(#[error(not(source))] Rejection),
    /// Cell index outside 0-8; nothing changed.
    #[display("cell index {_0} is out of range (must be 0-8)")]
    IndexOutOfRange(#[error(not(source))] usize),
    /// The provider suggested a cell the board rejects. The opponent keeps
    /// the turn and may be asked again.
    #[display("opponent suggested invalid cell {index}: {reason}")]
    OpponentMoveInvalid {
        /// Suggested index.
        index: usize,
        /// Board rejection.
        reason: BoardError,
    },
    /// The provider failed to answer. The opponent keeps the turn.
    #[display("opponent request failed: {_0}")]
    OpponentTransportFailure(ProviderError),
    /// Answer belongs to a request that is no longer current; discarded.
    #[display("discarded stale opponent response (generation {request}, current {current:?})")]
    StaleResponse {
        /// Generation of the answered request.
        request: u64,
        /// Generation currently awaited, if any.
        current: Option<u64>,
    },
}

/// Ticket for one outstanding opponent move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentRequest {
    generation: u64,
    board: Board,
}

impl OpponentRequest {
    /// Generation the request was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Board snapshot to send to the provider.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

/// What happened after a human half-move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanMoveResult {
    /// The human's move ended the game; the opponent is not consulted.
    Finished(GameOutcome),
    /// The game continues and the opponent must be asked for a move.
    AwaitOpponent(OpponentRequest),
}

/// Read-only view handed to presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current board.
    pub board: Board,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Who moves next; `None` before symbol selection and after the game ends.
    pub turn: Option<Turn>,
    /// The human's symbol, once selected.
    pub human_symbol: Option<Symbol>,
    /// Latest evaluation; `None` before symbol selection.
    pub outcome: Option<GameOutcome>,
    /// True while an opponent request is outstanding.
    pub awaiting_opponent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingSymbolSelection,
    InProgress { human: Symbol, turn: Turn },
    Terminal { human: Symbol, outcome: GameOutcome },
}

/// Owns the board and sequences human and opponent half-moves.
#[derive(Debug, Clone)]
pub struct TurnController {
    board: Board,
    state: State,
    /// Last generation handed out; bumped for every request and every reset.
    generation: u64,
    /// Generation of the outstanding opponent request.
    in_flight: Option<u64>,
}

impl TurnController {
    /// Creates a controller waiting for symbol selection.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            state: State::AwaitingSymbolSelection,
            generation: 0,
            in_flight: None,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::AwaitingSymbolSelection => Phase::AwaitingSymbolSelection,
            State::InProgress { .. } => Phase::InProgress,
            State::Terminal { .. } => Phase::Terminal,
        }
    }

    /// Who moves next, while the game is in progress.
    pub fn turn(&self) -> Option<Turn> {
        match self.state {
            State::InProgress { turn, .. } => Some(turn),
            _ => None,
        }
    }

    /// The human's symbol, once selected.
    pub fn human_symbol(&self) -> Option<Symbol> {
        match self.state {
            State::AwaitingSymbolSelection => None,
            State::InProgress { human, .. } | State::Terminal { human, .. } => Some(human),
        }
    }

    /// Latest outcome; `None` before symbol selection.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.state {
            State::AwaitingSymbolSelection => None,
            State::InProgress { .. } => Some(GameOutcome::InProgress),
            State::Terminal { outcome, .. } => Some(outcome),
        }
    }

    /// True while an opponent request is outstanding.
    pub fn is_awaiting_opponent(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot for presentation.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board,
            phase: self.phase(),
            turn: self.turn(),
            human_symbol: self.human_symbol(),
            outcome: self.outcome(),
            awaiting_opponent: self.is_awaiting_opponent(),
        }
    }

    /// Picks the human's symbol and starts the game, human first.
    #[instrument(skip(self))]
    pub fn select_symbol(&mut self, symbol: Symbol) -> Result<(), TurnError> {
        if self.state != State::AwaitingSymbolSelection {
            return Err(TurnError::IllegalMove(Rejection::SymbolAlreadySelected));
        }
        self.board = Board::reset();
        self.state = State::InProgress {
            human: symbol,
            turn: Turn::Human,
        };
        info!(human = %symbol, opponent = %symbol.opponent(), "Game started");
        Ok(())
    }

    /// Applies the human's move and evaluates the board.
    ///
    /// A terminal result ends the game here and no opponent request is
    /// issued. Otherwise the turn passes to the opponent and the returned
    /// ticket must be resolved with [`Self::resolve_opponent_move`].
    ///
    /// # Errors
    ///
    /// Rejections leave the controller untouched.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn begin_human_move(&mut self, index: usize) -> Result<HumanMoveResult, TurnError> {
        let human = match self.state {
            State::AwaitingSymbolSelection => {
                return Err(TurnError::IllegalMove(Rejection::NoSymbolSelected));
            }
            State::Terminal { .. } => return Err(TurnError::IllegalMove(Rejection::GameOver)),
            State::InProgress {
                turn: Turn::Opponent,
                ..
            } => return Err(TurnError::IllegalMove(Rejection::NotHumanTurn)),
            State::InProgress {
                human,
                turn: Turn::Human,
            } => human,
        };

        self.board = self.board.apply_move(index, human).map_err(|e| match e {
            BoardError::IndexOutOfRange(i) => TurnError::IndexOutOfRange(i),
            BoardError::CellOccupied(i) => TurnError::IllegalMove(Rejection::CellOccupied(i)),
        })?;
        debug!(index, symbol = %human, "Human move applied");

        let outcome = evaluate(&self.board);
        if outcome.is_terminal() {
            self.finish(human, outcome);
            return Ok(HumanMoveResult::Finished(outcome));
        }

        self.state = State::InProgress {
            human,
            turn: Turn::Opponent,
        };
        Ok(HumanMoveResult::AwaitOpponent(self.issue_request()))
    }

    /// Issues a fresh opponent request after a failed or invalid answer.
    ///
    /// # Errors
    ///
    /// Refused unless the opponent is due to move with nothing in flight.
    #[instrument(skip(self))]
    pub fn request_opponent_move(&mut self) -> Result<OpponentRequest, TurnError> {
        match self.state {
            State::AwaitingSymbolSelection => {
                Err(TurnError::IllegalMove(Rejection::NoSymbolSelected))
            }
            State::Terminal { .. } => Err(TurnError::IllegalMove(Rejection::GameOver)),
            State::InProgress {
                turn: Turn::Human, ..
            } => Err(TurnError::IllegalMove(Rejection::NotOpponentTurn)),
            State::InProgress { .. } if self.in_flight.is_some() => Err(TurnError::IllegalMove(
                Rejection::OpponentRequestInFlight,
            )),
            State::InProgress { .. } => Ok(self.issue_request()),
        }
    }

    /// Applies the provider's answer to `request`.
    ///
    /// On success the board is evaluated again: a win or draw ends the game,
    /// otherwise the turn returns to the human.
    ///
    /// # Errors
    ///
    /// - [`TurnError::StaleResponse`] if `request` is no longer the one in
    ///   flight; nothing changes.
    /// - [`TurnError::OpponentTransportFailure`] if the provider failed.
    /// - [`TurnError::OpponentMoveInvalid`] if the suggested cell is occupied
    ///   or out of range.
    ///
    /// In the last two cases the board is unchanged, the opponent keeps the
    /// turn and a new request may be issued.
    #[instrument(skip(self, request), fields(generation = request.generation))]
    pub fn resolve_opponent_move(
        &mut self,
        request: &OpponentRequest,
        answer: Result<usize, ProviderError>,
    ) -> Result<GameOutcome, TurnError> {
        if self.in_flight != Some(request.generation) {
            warn!(current = ?self.in_flight, "Discarding stale opponent response");
            return Err(TurnError::StaleResponse {
                request: request.generation,
                current: self.in_flight,
            });
        }
        self.in_flight = None;

        let State::InProgress {
            human,
            turn: Turn::Opponent,
        } = self.state
        else {
            // in_flight is only set while the opponent holds the turn.
            return Err(TurnError::IllegalMove(Rejection::NotOpponentTurn));
        };
        let opponent = human.opponent();

        let index = answer.map_err(|e| {
            warn!(error = %e, "Opponent provider failed");
            TurnError::OpponentTransportFailure(e)
        })?;

        self.board = self.board.apply_move(index, opponent).map_err(|reason| {
            warn!(index, %reason, "Opponent suggested an invalid cell");
            TurnError::OpponentMoveInvalid { index, reason }
        })?;
        debug!(index, symbol = %opponent, "Opponent move applied");

        let outcome = evaluate(&self.board);
        if outcome.is_terminal() {
            self.finish(human, outcome);
        } else {
            self.state = State::InProgress {
                human,
                turn: Turn::Human,
            };
        }
        Ok(outcome)
    }

    /// Withdraws `request` without an answer, e.g. when the caller waiting
    /// on the provider was cancelled.
    ///
    /// The opponent keeps the turn and a new request may be issued. Returns
    /// `false` (and changes nothing) if `request` is no longer in flight.
    #[instrument(skip(self, request), fields(generation = request.generation))]
    pub fn abandon_request(&mut self, request: &OpponentRequest) -> bool {
        if self.in_flight != Some(request.generation) {
            return false;
        }
        self.in_flight = None;
        debug!("Opponent request abandoned");
        true
    }

    /// Returns to symbol selection with an empty board from any state.
    ///
    /// Any outstanding opponent request becomes stale.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        if let Some(generation) = self.in_flight.take() {
            debug!(generation, "Reset while an opponent request was in flight");
        }
        self.generation += 1;
        self.board = Board::reset();
        self.state = State::AwaitingSymbolSelection;
        info!("Session reset");
    }

    fn issue_request(&mut self) -> OpponentRequest {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        debug!(generation = self.generation, "Opponent request issued");
        OpponentRequest {
            generation: self.generation,
            board: self.board,
        }
    }

    fn finish(&mut self, human: Symbol, outcome: GameOutcome) {
        info!(%outcome, "Game over");
        self.state = State::Terminal { human, outcome };
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}
