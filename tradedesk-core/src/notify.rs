//! User-visible notification sink
//!
//! The gateway and session store push fire-and-forget messages here; the UI
//! layer decides how to render them. Nothing in this crate blocks on a
//! notification being seen.

use std::sync::Arc;

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// Fire-and-forget "show message" sink
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Default notifier that routes messages through tracing
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => tracing::warn!(notice = %level, "{}", message),
            _ => tracing::info!(notice = %level, "{}", message),
        }
    }
}

/// Notifier that drops every message
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}
}

/// Shared handle type used across the client
pub type SharedNotifier = Arc<dyn Notifier>;
