//! Unified error handling system
//!
//! Every failure the portal client surfaces is classified into one of the
//! kinds below. The gateway performs all classification; callers react to the
//! kind, never to raw status codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type DeskResult<T> = Result<T, DeskError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the tradedesk client
#[derive(Error, Debug)]
pub enum DeskError {
    /// No HTTP response was received (DNS, refused connection, timeout),
    /// and the retry budget is exhausted.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The backend rejected the credential. Session state has already been
    /// torn down by the time this error reaches the caller.
    #[error("Unauthorized: session is no longer valid")]
    Unauthorized { context: ErrorContext },

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        context: ErrorContext,
    },

    #[error("Rate limit exceeded")]
    RateLimited {
        retry_after_ms: Option<u64>,
        context: ErrorContext,
    },

    #[error("Server error: HTTP {status}")]
    Server {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    /// Generic non-2xx response, carrying the server-provided detail when the
    /// body had one.
    #[error("API error: {message}")]
    Api {
        message: String,
        context: ErrorContext,
    },

    /// Login or registration rejection, stored on the session for inline
    /// form display.
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Snapshot persistence failure (read, write, or clear).
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeskError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            DeskError::Network { context, .. } => Some(context),
            DeskError::Unauthorized { context } => Some(context),
            DeskError::Forbidden { context, .. } => Some(context),
            DeskError::RateLimited { context, .. } => Some(context),
            DeskError::Server { context, .. } => Some(context),
            DeskError::NotFound { context, .. } => Some(context),
            DeskError::Api { context, .. } => Some(context),
            DeskError::Auth { context, .. } => Some(context),
            DeskError::Config { context, .. } => Some(context),
            DeskError::Storage { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if error is recoverable by retrying later
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DeskError::Network { .. } | DeskError::RateLimited { .. }
        )
    }

    /// Get retry delay in milliseconds for recoverable errors
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            DeskError::Network { .. } => Some(1000),
            DeskError::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// User-visible message for the notification sink. Kinds without a fixed
    /// message (auth rejections, generic API errors) surface their
    /// server-provided detail instead.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            DeskError::Network { .. } => Some("Network error. Please check your connection."),
            DeskError::Unauthorized { .. } => Some("Session expired. Please login again."),
            DeskError::Forbidden { .. } => Some("Access denied. You don't have permission."),
            DeskError::RateLimited { .. } => Some("Too many requests. Please try again later."),
            DeskError::Server { .. } => Some("Server error. Our team has been notified."),
            DeskError::NotFound { .. } => Some("Resource not found."),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            DeskError::Network { .. } | DeskError::RateLimited { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Recoverable error occurred"
                );
            }
            DeskError::Auth { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Authentication rejected"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}
