//! Tests for the async session lifecycle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tictactoe_engine::{
    Board, BoardError, GameOutcome, GameSession, OpponentMoveProvider, Phase, ProviderError,
    ProviderErrorKind, Rejection, Symbol, Turn, TurnError, WinningLine,
};
use tokio::sync::Notify;

/// Provider that replays canned answers and records every board it sees.
#[derive(Default)]
struct Scripted {
    answers: Mutex<VecDeque<Result<usize, ProviderError>>>,
    seen: Mutex<Vec<Board>>,
}

impl Scripted {
    fn new(answers: impl IntoIterator<Item = Result<usize, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<Board> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OpponentMoveProvider for Scripted {
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
        self.seen.lock().unwrap().push(*board);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called more often than scripted")
    }
}

/// Provider that blocks until released.
#[derive(Default)]
struct Gated {
    entered: Notify,
    release: Notify,
    answer: usize,
}

#[async_trait::async_trait]
impl OpponentMoveProvider for Gated {
    async fn request_move(&self, _board: &Board) -> Result<usize, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.answer)
    }
}

/// Provider that never answers.
struct Silent;

#[async_trait::async_trait]
impl OpponentMoveProvider for Silent {
    async fn request_move(&self, _board: &Board) -> Result<usize, ProviderError> {
        std::future::pending().await
    }
}

/// Provider that hangs on its first call and answers every later one.
struct StallsOnce {
    calls: AtomicUsize,
    answer: usize,
}

#[async_trait::async_trait]
impl OpponentMoveProvider for StallsOnce {
    async fn request_move(&self, _board: &Board) -> Result<usize, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::future::pending::<()>().await;
        }
        Ok(self.answer)
    }
}

fn board(s: &str) -> Board {
    s.parse().expect("valid board")
}

#[tokio::test]
async fn test_scenario_a_first_move_reaches_provider() {
    let provider = Scripted::new([Ok(0)]);
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();

    let outcome = session.submit_human_move(4).await.unwrap();

    assert_eq!(outcome, GameOutcome::InProgress);
    assert_eq!(provider.seen(), vec![board("____X____")]);
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.board, board("O___X____"));
    assert_eq!(snapshot.turn, Some(Turn::Human));
}

#[tokio::test]
async fn test_scenario_b_winning_move_skips_provider() {
    // Reach [X,X,_,O,O,_,_,_,_] with the human on move.
    let provider = Scripted::new([Ok(3), Ok(4)]);
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();
    session.submit_human_move(0).await.unwrap();
    session.submit_human_move(1).await.unwrap();
    assert_eq!(session.snapshot().await.board, board("XX_OO____"));

    let outcome = session.submit_human_move(2).await.unwrap();

    assert_eq!(
        outcome,
        GameOutcome::Won {
            symbol: Symbol::X,
            line: WinningLine::ALL[0],
        }
    );
    assert_eq!(provider.seen().len(), 2);
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Terminal);
    assert_eq!(snapshot.outcome, Some(outcome));
}

#[tokio::test]
async fn test_scenario_d_invalid_opponent_index() {
    let provider = Scripted::new([Ok(4), Ok(0)]);
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();

    let err = session.submit_human_move(4).await.unwrap_err();

    assert_eq!(
        err,
        TurnError::OpponentMoveInvalid {
            index: 4,
            reason: BoardError::CellOccupied(4),
        }
    );
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.board, board("____X____"));
    assert_eq!(snapshot.turn, Some(Turn::Opponent));
    assert!(!snapshot.awaiting_opponent);

    // Human still cannot move; retry resolves the opponent's half-move.
    assert_eq!(
        session.submit_human_move(0).await,
        Err(TurnError::IllegalMove(Rejection::NotHumanTurn))
    );
    session.retry_opponent_move().await.unwrap();
    assert_eq!(session.snapshot().await.board, board("O___X____"));
}

#[tokio::test]
async fn test_transport_failure_keeps_human_move() {
    let failure = ProviderError::new(ProviderErrorKind::Transport, "connection refused".into());
    let provider = Scripted::new([Err(failure.clone()), Ok(8)]);
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::O).await.unwrap();

    let err = session.submit_human_move(0).await.unwrap_err();

    assert_eq!(err, TurnError::OpponentTransportFailure(failure));
    assert_eq!(session.snapshot().await.board, board("O________"));

    assert_eq!(
        session.retry_opponent_move().await,
        Ok(GameOutcome::InProgress)
    );
    assert_eq!(session.snapshot().await.board, board("O_______X"));
}

#[tokio::test]
async fn test_opponent_win_ends_game() {
    let provider = Scripted::new([Ok(6), Ok(4), Ok(2)]);
    let session = GameSession::new(provider);
    session.select_symbol(Symbol::X).await.unwrap();
    session.submit_human_move(0).await.unwrap();
    session.submit_human_move(1).await.unwrap();

    let outcome = session.submit_human_move(5).await.unwrap();

    assert_eq!(outcome.winner(), Some(Symbol::O));
    assert_eq!(outcome.winning_line(), Some(WinningLine::ALL[7]));
    assert_eq!(
        session.submit_human_move(3).await,
        Err(TurnError::IllegalMove(Rejection::GameOver))
    );
}

#[tokio::test]
async fn test_moves_rejected_while_opponent_thinking() {
    let provider = Arc::new(Gated {
        answer: 0,
        ..Default::default()
    });
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.submit_human_move(4).await }
    });
    provider.entered.notified().await;

    assert!(session.snapshot().await.awaiting_opponent);
    assert_eq!(
        session.submit_human_move(8).await,
        Err(TurnError::IllegalMove(Rejection::NotHumanTurn))
    );
    assert_eq!(
        session.retry_opponent_move().await,
        Err(TurnError::IllegalMove(Rejection::OpponentRequestInFlight))
    );

    provider.release.notify_one();
    assert_eq!(pending.await.unwrap(), Ok(GameOutcome::InProgress));
    assert_eq!(session.snapshot().await.board, board("O___X____"));
}

#[tokio::test]
async fn test_reset_discards_late_response() {
    let provider = Arc::new(Gated {
        answer: 0,
        ..Default::default()
    });
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.submit_human_move(4).await }
    });
    provider.entered.notified().await;

    session.reset().await;
    provider.release.notify_one();

    assert!(matches!(
        pending.await.unwrap(),
        Err(TurnError::StaleResponse { .. })
    ));
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.board, Board::new());
    assert_eq!(snapshot.phase, Phase::AwaitingSymbolSelection);
    assert_eq!(snapshot.outcome, None);
    assert_eq!(snapshot.turn, None);
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_failure() {
    let session = GameSession::new(Silent).with_timeout(Duration::from_millis(20));
    session.select_symbol(Symbol::X).await.unwrap();

    let err = session.submit_human_move(4).await.unwrap_err();

    match err {
        TurnError::OpponentTransportFailure(e) => assert_eq!(e.kind, ProviderErrorKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.turn, Some(Turn::Opponent));
    assert!(!snapshot.awaiting_opponent);
}

#[tokio::test]
async fn test_cancelled_move_can_be_retried() {
    let session = GameSession::new(StallsOnce {
        calls: AtomicUsize::new(0),
        answer: 0,
    });
    session.select_symbol(Symbol::X).await.unwrap();

    let cancelled =
        tokio::time::timeout(Duration::from_millis(20), session.submit_human_move(4)).await;
    assert!(cancelled.is_err());

    let snapshot = session.snapshot().await;
    assert!(!snapshot.awaiting_opponent);
    assert_eq!(snapshot.board, board("____X____"));
    assert_eq!(snapshot.turn, Some(Turn::Opponent));

    assert_eq!(
        session.retry_opponent_move().await,
        Ok(GameOutcome::InProgress)
    );
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.board, board("O___X____"));
    assert_eq!(snapshot.turn, Some(Turn::Human));
}

#[tokio::test]
async fn test_cancelled_move_after_reset_leaves_new_game_alone() {
    let provider = Arc::new(Gated {
        answer: 0,
        ..Default::default()
    });
    let session = GameSession::new(Arc::clone(&provider));
    session.select_symbol(Symbol::X).await.unwrap();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.submit_human_move(4).await }
    });
    provider.entered.notified().await;
    session.reset().await;
    session.select_symbol(Symbol::O).await.unwrap();
    let current = tokio::spawn({
        let session = session.clone();
        async move { session.submit_human_move(8).await }
    });
    provider.entered.notified().await;

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    // The new game's request must survive the old one being withdrawn.
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.board, board("________O"));
    assert!(snapshot.awaiting_opponent);

    provider.release.notify_one();
    assert_eq!(current.await.unwrap(), Ok(GameOutcome::InProgress));
    assert_eq!(session.snapshot().await.board, board("X_______O"));
}

#[tokio::test]
async fn test_reset_from_every_state() {
    let provider = Scripted::new([Ok(3), Ok(4)]);
    let session = GameSession::new(provider);

    session.reset().await;
    let fresh = session.snapshot().await;

    session.select_symbol(Symbol::X).await.unwrap();
    session.reset().await;
    assert_eq!(session.snapshot().await, fresh);

    session.select_symbol(Symbol::X).await.unwrap();
    session.submit_human_move(0).await.unwrap();
    session.submit_human_move(1).await.unwrap();
    session.submit_human_move(2).await.unwrap();
    assert_eq!(session.snapshot().await.phase, Phase::Terminal);
    session.reset().await;
    assert_eq!(session.snapshot().await, fresh);

    assert_eq!(
        session.submit_human_move(0).await,
        Err(TurnError::IllegalMove(Rejection::NoSymbolSelected))
    );
}
