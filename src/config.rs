//! Client configuration: opponent endpoint, timeout, default symbol.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `TICTACTOE_BOT_*` environment variables, then command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tictactoe_engine::Symbol;
use tracing::{debug, info, instrument};

/// Default opponent service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://hiring-react-assignment.vercel.app/api/bot";

/// Environment variable overriding [`BotConfig::endpoint`].
pub const ENDPOINT_VAR: &str = "TICTACTOE_BOT_ENDPOINT";

/// Environment variable overriding [`BotConfig::timeout_ms`].
pub const TIMEOUT_VAR: &str = "TICTACTOE_BOT_TIMEOUT_MS";

/// Log filter used when `RUST_LOG` is unset. Kept quiet because logs share
/// the terminal with the board.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Configuration for talking to the opponent service.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BotConfig {
    /// URL the board is POSTed to.
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,

    /// Symbol to select automatically at the start of each game.
    #[serde(default)]
    human_symbol: Option<Symbol>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            human_symbol: None,
        }
    }
}

impl BotConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(endpoint = %config.endpoint, "Config loaded successfully");
        Ok(config)
    }

    /// Defaults, overlaid by `path` if given, then by the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Applies `TICTACTOE_BOT_*` overrides read through `lookup`.
    #[instrument(skip_all)]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            debug!(%endpoint, "Endpoint overridden from environment");
            self.endpoint = endpoint;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.timeout_ms = raw.trim().parse().map_err(|_| {
                ConfigError::new(format!("{} must be a whole number, got {:?}", TIMEOUT_VAR, raw))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Overrides the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Overrides the preselected symbol.
    pub fn with_human_symbol(mut self, symbol: Symbol) -> Self {
        self.human_symbol = Some(symbol);
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::new("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.human_symbol(), &None);
    }

    #[test]
    fn test_env_overrides() {
        let config = BotConfig::default()
            .with_env(env(&[
                (ENDPOINT_VAR, "http://localhost:9000/bot"),
                (TIMEOUT_VAR, "250"),
            ]))
            .unwrap();
        assert_eq!(config.endpoint(), "http://localhost:9000/bot");
        assert_eq!(*config.timeout_ms(), 250);
    }

    #[test]
    fn test_env_rejects_bad_timeout() {
        let err = BotConfig::default()
            .with_env(env(&[(TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(err.message.contains(TIMEOUT_VAR));
    }

    #[test]
    fn test_default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert_eq!(DEFAULT_LOG_FILTER, "warn");
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        assert!(BotConfig::default().with_endpoint("ftp://bot").validate().is_err());
        assert!(BotConfig::default().with_timeout_ms(0).validate().is_err());
    }
}
