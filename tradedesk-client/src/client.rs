//! Client facade
//!
//! Wires snapshot storage, session state, gateway, and the typed API surface
//! into one explicitly owned container. Tests construct isolated clients with
//! temp directories and scripted transports.

use crate::api::PortalApi;
use crate::authz::RouteGuard;
use crate::gateway::Gateway;
use crate::session::{SessionInner, SessionStore};
use crate::snapshot::SnapshotStorage;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tradedesk_core::{ClientConfig, DeskResult, SharedNotifier, TracingNotifier};

pub struct DeskClient {
    session: Arc<SessionStore>,
    gateway: Arc<Gateway>,
    api: PortalApi,
    guard: RouteGuard,
}

impl DeskClient {
    /// Create a client with the production HTTP transport and the default
    /// tracing-backed notifier.
    pub fn new(config: ClientConfig) -> DeskResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
        Self::with_parts(config, transport, Arc::new(TracingNotifier))
    }

    /// Create a client with an injected transport and notifier
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: SharedNotifier,
    ) -> DeskResult<Self> {
        let storage = match &config.storage_dir {
            Some(dir) => SnapshotStorage::new(dir)?,
            None => SnapshotStorage::default_location()?,
        };

        let inner = Arc::new(SessionInner::new(storage));
        let gateway = Arc::new(Gateway::new(
            transport,
            config.retry.clone(),
            Arc::clone(&inner),
            notifier,
        ));
        let session = Arc::new(SessionStore::new(inner, Arc::clone(&gateway)));
        let api = PortalApi::new(Arc::clone(&gateway));
        let guard = RouteGuard::new(Arc::clone(&session));

        Ok(Self {
            session,
            gateway,
            api,
            guard,
        })
    }

    /// The session controller
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// The request gateway, for callers outside the typed surface
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Typed endpoint surface
    pub fn api(&self) -> &PortalApi {
        &self.api
    }

    /// Route guard bound to this client's session
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}
