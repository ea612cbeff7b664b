//! Tradedesk client - session controller, authorization gate, and resilient
//! request gateway for the tradedesk portal
//!
//! Three components with a leaf-first dependency order:
//!
//! - [`Gateway`] wraps all outbound HTTP calls: credential attachment, retry
//!   of transport failures with linear backoff, and classification of HTTP
//!   errors into the [`tradedesk_core::DeskError`] taxonomy.
//! - [`SessionStore`] owns the authentication state machine and the persisted
//!   snapshot that survives a process restart.
//! - [`authz::decide`] answers "may the current session view destination D"
//!   through three capability checks, in a fixed order.

pub mod api;
pub mod authz;
pub mod client;
pub mod gateway;
pub mod session;
pub mod snapshot;
pub mod transport;

pub use api::{NewAccount, PortalApi};
pub use authz::{decide, Decision, RouteGuard, RouteRequirements};
pub use client::DeskClient;
pub use gateway::Gateway;
pub use session::{Phase, Session, SessionStore};
pub use snapshot::{SessionSnapshot, SnapshotStorage};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport, TransportError};

// Re-export the foundation crate for downstream convenience
pub use tradedesk_core as core;
