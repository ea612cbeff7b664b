//! Client configuration

use crate::error::{DeskError, DeskResult, ErrorContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Retry policy for transport-level failures.
///
/// The delay before retry *n* is `backoff_unit_ms * n` (linear backoff: with
/// the defaults, 1s, 2s, 3s). HTTP responses are never retried; only requests
/// that received no response at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Base delay unit in milliseconds
    pub backoff_unit_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Delay to wait before retry `attempt` (1-based)
    pub fn delay_before_retry(&self, attempt: u32) -> std::time::Duration {
        std::time::Duration::from_millis(self.backoff_unit_ms * attempt as u64)
    }
}

/// Configuration for the portal client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the backend API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Retry policy for transport failures
    #[serde(default)]
    pub retry: RetryConfig,
    /// Directory for the persisted session snapshot. `None` selects the
    /// default namespace under the user's home directory.
    #[serde(default)]
    pub storage_dir: Option<std::path::PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            user_agent: "tradedesk/0.1".to_string(),
            retry: RetryConfig::default(),
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set snapshot storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DeskResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeskError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ClientConfig = toml::from_str(&content).map_err(|e| DeskError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }
}
