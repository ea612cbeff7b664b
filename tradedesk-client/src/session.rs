//! Session store
//!
//! Single source of truth for "who is the caller". Owns the authentication
//! state machine, the persisted snapshot, and the capability queries the rest
//! of the application reads. All network interaction goes through the gateway.

use crate::api::{AuthResponse, MeResponse, NewAccount};
use crate::gateway::Gateway;
use crate::snapshot::{SessionSnapshot, SnapshotStorage};
use crate::transport::ApiRequest;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tradedesk_core::{Credential, DeskError, DeskResult, Role, UserProfile};
use tracing::{debug, info, warn};

/// Transient UI-facing phase of the authentication state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Authenticating,
    Authenticated,
    Unauthenticated,
}

/// In-memory record of the current caller
#[derive(Debug, Clone)]
pub struct Session {
    pub credential: Option<Credential>,
    pub profile: Option<UserProfile>,
    pub is_authenticated: bool,
    pub phase: Phase,
    pub last_error: Option<String>,
    /// Monotonic counter bumped by every mutating operation. A network
    /// response belonging to a superseded generation is discarded on arrival.
    pub generation: u64,
}

impl Session {
    fn empty() -> Self {
        Self {
            credential: None,
            profile: None,
            is_authenticated: false,
            phase: Phase::Idle,
            last_error: None,
            generation: 0,
        }
    }

    /// Whether the current profile holds any of the given roles
    pub fn has_role(&self, roles: &[Role]) -> bool {
        match &self.profile {
            Some(profile) => roles.contains(&profile.role),
            None => false,
        }
    }

    /// Whether the caller may access premium features: staff roles are always
    /// entitled, clients need an active subscription.
    pub fn has_active_entitlement(&self) -> bool {
        match &self.profile {
            Some(profile) => {
                profile.role.is_staff()
                    || profile.subscription_status == tradedesk_core::SubscriptionStatus::Active
            }
            None => false,
        }
    }
}

/// Shared session state. The store mutates it through the public operations;
/// the gateway reads the credential and tears the session down on 401.
pub(crate) struct SessionInner {
    state: RwLock<Session>,
    storage: SnapshotStorage,
}

impl SessionInner {
    pub(crate) fn new(storage: SnapshotStorage) -> Self {
        Self {
            state: RwLock::new(Session::empty()),
            storage,
        }
    }

    // A poisoned lock still holds a coherent Session; recover rather than
    // propagate the panic of an unrelated thread.
    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn credential(&self) -> Option<Credential> {
        self.read().credential.clone()
    }

    /// Clear credential, profile, and the persisted snapshot. Idempotent.
    /// Called by logout, by a failed identity verification, and by the
    /// gateway when the backend answers 401.
    pub(crate) fn teardown(&self) {
        {
            let mut session = self.write();
            session.credential = None;
            session.profile = None;
            session.is_authenticated = false;
            session.phase = Phase::Unauthenticated;
            session.generation += 1;
        }
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear session snapshot during teardown: {}", e);
        }
    }

    fn persist(&self, credential: &Credential, profile: &UserProfile) {
        let snapshot = SessionSnapshot::new(credential.clone(), profile.clone());
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("Failed to persist session snapshot: {}", e);
        }
    }
}

/// The session controller
pub struct SessionStore {
    inner: Arc<SessionInner>,
    gateway: Arc<Gateway>,
}

impl SessionStore {
    pub(crate) fn new(inner: Arc<SessionInner>, gateway: Arc<Gateway>) -> Self {
        Self { inner, gateway }
    }

    /// Exchange credentials for a session. On success the credential and
    /// profile are stored and the snapshot is persisted; on failure the prior
    /// state is untouched except for `last_error`.
    pub async fn login(&self, email: &str, password: &str) -> DeskResult<()> {
        self.begin_attempt();

        let request = ApiRequest::post(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        );

        match self.gateway.send_json::<AuthResponse>(request).await {
            Ok(response) => {
                self.complete_authentication(response);
                info!("Login succeeded");
                Ok(())
            }
            Err(e) => {
                self.fail_attempt(&e, "Login failed");
                Err(e)
            }
        }
    }

    /// Create an account and establish a session, with the same contract as
    /// [`login`](Self::login).
    pub async fn register(&self, account: NewAccount) -> DeskResult<()> {
        self.begin_attempt();

        let body = serde_json::to_value(&account)?;
        let request = ApiRequest::post("/auth/register", body);

        match self.gateway.send_json::<AuthResponse>(request).await {
            Ok(response) => {
                self.complete_authentication(response);
                info!("Registration succeeded");
                Ok(())
            }
            Err(e) => {
                self.fail_attempt(&e, "Registration failed");
                Err(e)
            }
        }
    }

    /// Unconditionally clear the session and its snapshot. Idempotent; no
    /// network call.
    pub fn logout(&self) {
        self.inner.teardown();
        info!("Logged out");
    }

    /// Two-phase identity refresh: restore the persisted snapshot
    /// optimistically, then verify it against the backend. Any verification
    /// failure tears the session down; a verification result arriving for a
    /// superseded generation is discarded.
    pub async fn refresh_identity(&self) -> DeskResult<()> {
        let generation = {
            let mut session = self.inner.write();

            if session.credential.is_none() {
                match self.inner.storage.load() {
                    Ok(Some(snapshot)) => {
                        debug!("Restoring persisted session optimistically");
                        session.credential = Some(snapshot.credential);
                        session.profile = Some(snapshot.profile);
                        session.is_authenticated = true;
                        session.phase = Phase::Authenticated;
                    }
                    Ok(None) => {
                        session.is_authenticated = false;
                        session.phase = Phase::Unauthenticated;
                        return Ok(());
                    }
                    Err(e) => {
                        warn!("Failed to load session snapshot: {}", e);
                        session.is_authenticated = false;
                        session.phase = Phase::Unauthenticated;
                        return Ok(());
                    }
                }
            }

            session.generation
        };

        let result = self
            .gateway
            .send_json::<MeResponse>(ApiRequest::get("/auth/me"))
            .await;

        {
            let mut session = self.inner.write();
            match result {
                Ok(me) => {
                    if session.generation != generation {
                        debug!("Discarding identity verification for superseded session");
                        return Ok(());
                    }
                    session.profile = Some(me.user.clone());
                    session.is_authenticated = true;
                    session.phase = Phase::Authenticated;
                    if let Some(credential) = session.credential.clone() {
                        drop(session);
                        self.inner.persist(&credential, &me.user);
                    }
                    debug!("Identity verified against backend");
                    Ok(())
                }
                Err(e) => {
                    // An unauthorized response already tore the session down
                    // inside the gateway, which bumps the generation. Skip
                    // the redundant teardown in that case, but still surface
                    // the failure.
                    let superseded = session.generation != generation;
                    drop(session);
                    if !superseded {
                        self.inner.teardown();
                    }
                    warn!("Identity verification failed: {}", e);
                    Err(e)
                }
            }
        }
    }

    fn begin_attempt(&self) {
        let mut session = self.inner.write();
        session.phase = Phase::Authenticating;
        session.last_error = None;
    }

    fn complete_authentication(&self, response: AuthResponse) {
        let credential = Credential::new(response.token);
        {
            let mut session = self.inner.write();
            session.credential = Some(credential.clone());
            session.profile = Some(response.user.clone());
            session.is_authenticated = true;
            session.phase = Phase::Authenticated;
            session.last_error = None;
            session.generation += 1;
        }
        self.inner.persist(&credential, &response.user);
    }

    fn fail_attempt(&self, error: &DeskError, default_message: &str) {
        let message = match error {
            DeskError::Api { message, .. } | DeskError::Auth { message, .. } => message.clone(),
            other => other
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| default_message.to_string()),
        };

        let mut session = self.inner.write();
        session.phase = Phase::Unauthenticated;
        session.last_error = Some(message);
    }

    // --- Capability query surface (the only session reads for UI code) ---

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.read().profile.clone()
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.inner.read().has_role(roles)
    }

    pub fn has_active_entitlement(&self) -> bool {
        self.inner.read().has_active_entitlement()
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().phase
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Point-in-time copy of the session for authorization decisions
    pub fn current(&self) -> Session {
        self.inner.read().clone()
    }
}
