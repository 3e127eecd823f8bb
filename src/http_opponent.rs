//! Opponent move provider backed by the remote bot service.

use crate::config::BotConfig;
use tictactoe_engine::{Board, OpponentMoveProvider, ProviderError, ProviderErrorKind};
use tracing::{debug, info, instrument, warn};

/// Asks the bot service for a move.
///
/// Each request POSTs the board as a JSON array of nine `"X"`, `"O"` or
/// `null` values and expects a bare JSON integer back. Failures are
/// reported, never retried here.
#[derive(Debug, Clone)]
pub struct HttpOpponent {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOpponent {
    /// Creates a client for `config`'s endpoint and timeout.
    #[instrument(skip_all, fields(endpoint = %config.endpoint()))]
    pub fn new(config: &BotConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::Transport, e.to_string()))?;
        info!("Created HTTP opponent");
        Ok(Self {
            endpoint: config.endpoint().clone(),
            client,
        })
    }

    /// Endpoint the board is sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(err: reqwest::Error) -> ProviderError {
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout
    } else if err.is_decode() {
        ProviderErrorKind::Malformed
    } else {
        ProviderErrorKind::Transport
    };
    ProviderError::new(kind, err.to_string())
}

fn parse_index(body: &str) -> Result<usize, ProviderError> {
    serde_json::from_str::<usize>(body.trim()).map_err(|e| {
        ProviderError::new(
            ProviderErrorKind::Malformed,
            format!("expected a cell index, got {body:?}: {e}"),
        )
    })
}

#[async_trait::async_trait]
impl OpponentMoveProvider for HttpOpponent {
    #[instrument(skip(self, board), fields(endpoint = %self.endpoint))]
    async fn request_move(&self, board: &Board) -> Result<usize, ProviderError> {
        let wire = board.to_wire();
        debug!(board = ?wire, "Requesting opponent move");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&wire)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            warn!(%status, %body, "Opponent service returned an error status");
            return Err(ProviderError::new(
                ProviderErrorKind::Status(status.as_u16()),
                body,
            ));
        }

        let index = parse_index(&body)?;
        info!(index, "Opponent chose a cell");
        Ok(index)
    }
}
