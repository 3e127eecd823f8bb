//! Contract for the service that supplies the bot's moves.

use crate::board::Board;
use derive_new::new;

/// Why a provider could not produce a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Connection or I/O failure.
    #[display("transport")]
    Transport,
    /// The request did not finish in time.
    #[display("timeout")]
    Timeout,
    /// The service answered with a non-success status.
    #[display("HTTP {_0}")]
    Status(u16),
    /// The response body was not a cell index.
    #[display("malformed response")]
    Malformed,
}

/// Failure reported by an [`OpponentMoveProvider`].
#[derive(Debug, Clone, PartialEq, Eq, new, derive_more::Display, derive_more::Error)]
#[display("opponent provider {kind} error: {message}")]
pub struct ProviderError {
    /// Failure category.
    pub kind: ProviderErrorKind,
    /// Detail for logs and display.
    pub message: String,
}

impl ProviderError {
    /// Shorthand for a [`ProviderErrorKind::Timeout`] error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message.into())
    }
}

/// Supplies the opponent's move for a board.
///
/// The board passed in already contains the human's latest move. A
/// well-behaved provider returns the index of an empty cell; the turn
/// controller validates the answer and never trusts it blindly.
/// Providers must not retry on their own.
#[async_trait::async_trait]
pub trait OpponentMoveProvider: Send + Sync {
    /// Requests one move for `board`.
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError>;
}

#[async_trait::async_trait]
impl<P: OpponentMoveProvider + ?Sized> OpponentMoveProvider for std::sync::Arc<P> {
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
        (**self).request_move(board).await
    }
}

