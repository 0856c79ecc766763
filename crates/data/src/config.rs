//! Client configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "TRADEROBOTS_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TRADEROBOTS_TIMEOUT_SECS";
/// Environment variable holding the session file path.
pub const SESSION_FILE_VAR: &str = "TRADEROBOTS_SESSION_FILE";
/// Environment variable holding the progress tick interval in milliseconds.
pub const PROGRESS_TICK_VAR: &str = "TRADEROBOTS_PROGRESS_TICK_MS";

/// Configuration shared by the client and the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the signed-in session is persisted.
    pub session_file: PathBuf,
    /// Interval between cosmetic progress ticks.
    pub progress_tick: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(10),
            session_file: PathBuf::from(".traderobots/session.json"),
            progress_tick: Duration::from_millis(100),
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from environment variables.
    ///
    /// Unset variables keep their defaults; unparsable numbers are logged
    /// and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(url);
        }
        if let Some(secs) = parse_u64(&lookup, TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(SESSION_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }
        if let Some(ms) = parse_u64(&lookup, PROGRESS_TICK_VAR) {
            config.progress_tick = Duration::from_millis(ms);
        }

        config
    }

    /// Sets the backend URL, dropping any trailing slash.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring invalid configuration value");
            None
        }
    }
}
