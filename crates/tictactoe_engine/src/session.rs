//! Session lifecycle: the async wrapper presentation code talks to.

use crate::controller::{
    HumanMoveResult, OpponentRequest, SessionSnapshot, TurnController, TurnError,
};
use crate::outcome::GameOutcome;
use crate::provider::{OpponentMoveProvider, ProviderError};
use crate::types::Symbol;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// One human-vs-bot game session.
///
/// The controller lives behind an async mutex that is released while the
/// provider is awaited, so other tasks can read snapshots, get their moves
/// rejected, or reset the session in the meantime. Cloning yields another
/// handle to the same session.
pub struct GameSession<P> {
    controller: Arc<Mutex<TurnController>>,
    provider: Arc<P>,
    timeout: Option<Duration>,
}

impl<P> Clone for GameSession<P> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }
}

impl<P> std::fmt::Debug for GameSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<P: OpponentMoveProvider> GameSession<P> {
    /// Creates a session waiting for symbol selection.
    pub fn new(provider: P) -> Self {
        Self {
            controller: Arc::new(Mutex::new(TurnController::new())),
            provider: Arc::new(provider),
            timeout: None,
        }
    }

    /// Bounds every provider call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Picks the human's symbol; the human moves first.
    pub async fn select_symbol(&self, symbol: Symbol) -> Result<(), TurnError> {
        self.controller.lock().await.select_symbol(symbol)
    }

    /// Plays the human's move and, unless it ended the game, the opponent's
    /// reply.
    ///
    /// Returns the outcome after the last applied half-move.
    ///
    /// # Errors
    ///
    /// Rejections of the human move change nothing. Opponent faults
    /// ([`TurnError::OpponentMoveInvalid`],
    /// [`TurnError::OpponentTransportFailure`]) keep the human's move and
    /// leave the opponent to move; call [`Self::retry_opponent_move`].
    /// [`TurnError::StaleResponse`] means the session was reset while the
    /// provider was thinking.
    #[instrument(skip(self))]
    pub async fn submit_human_move(&self, index: usize) -> Result<GameOutcome, TurnError> {
        let request = {
            let mut controller = self.controller.lock().await;
            match controller.begin_human_move(index)? {
                HumanMoveResult::Finished(outcome) => return Ok(outcome),
                HumanMoveResult::AwaitOpponent(request) => request,
            }
        };
        self.play_opponent(request).await
    }

    /// Asks the provider again after an opponent fault.
    #[instrument(skip(self))]
    pub async fn retry_opponent_move(&self) -> Result<GameOutcome, TurnError> {
        let request = self.controller.lock().await.request_opponent_move()?;
        info!(generation = request.generation(), "Retrying opponent request");
        self.play_opponent(request).await
    }

    /// Returns to symbol selection from any state.
    pub async fn reset(&self) {
        self.controller.lock().await.reset();
    }

    /// Current state for rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.controller.lock().await.snapshot()
    }

    async fn play_opponent(&self, request: OpponentRequest) -> Result<GameOutcome, TurnError> {
        debug!(generation = request.generation(), "Awaiting opponent move");
        let mut pending = PendingRequest::new(Arc::clone(&self.controller), request);
        let answer = self.ask_provider(pending.request()).await;
        let mut controller = self.controller.lock().await;
        let request = pending.disarm();
        controller.resolve_opponent_move(&request, answer)
    }

    async fn ask_provider(&self, request: &OpponentRequest) -> Result<usize, ProviderError> {
        let call = self.provider.request_move(request.board());
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(ProviderError::timeout(format!(
                    "no answer within {} ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        }
    }
}

/// Withdraws an opponent request if the future awaiting it is dropped
/// before the answer is applied, so the session does not stay stuck in
/// "awaiting opponent".
struct PendingRequest {
    controller: Arc<Mutex<TurnController>>,
    request: OpponentRequest,
    armed: bool,
}

impl PendingRequest {
    fn new(controller: Arc<Mutex<TurnController>>, request: OpponentRequest) -> Self {
        Self {
            controller,
            request,
            armed: true,
        }
    }

    fn request(&self) -> &OpponentRequest {
        &self.request
    }

    fn disarm(&mut self) -> OpponentRequest {
        self.armed = false;
        self.request.clone()
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let request = self.request.clone();
        warn!(
            generation = request.generation(),
            "Opponent request cancelled before an answer was applied"
        );
        if let Ok(mut controller) = self.controller.try_lock() {
            controller.abandon_request(&request);
            return;
        }
        // The lock is held elsewhere; finish the cleanup on the runtime.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let controller = Arc::clone(&self.controller);
                handle.spawn(async move {
                    controller.lock().await.abandon_request(&request);
                });
            }
            Err(_) => warn!("No runtime available to withdraw the cancelled request"),
        }
    }
}
