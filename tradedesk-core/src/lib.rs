//! Tradedesk Core - shared types, errors, and configuration
//!
//! Foundation crate for the tradedesk portal client: the classified error
//! taxonomy, the domain types the session and gateway operate on, client
//! configuration, logging bootstrap, and the notification sink.

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use notify::*;
pub use types::*;

// Re-export commonly used external types
pub use tokio;
pub use tracing;
