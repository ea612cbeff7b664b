//! Authorization gate
//!
//! Deterministic, side-effect-free admission decision for a navigation
//! target. The check order is a contract: an unauthenticated caller is always
//! sent to login before entitlement or role is even considered, an
//! authenticated-but-unentitled caller goes to the entitlement page, and only
//! a caller lacking the required role falls through to the default redirect.

use crate::session::{Session, SessionStore};
use std::collections::HashSet;
use std::sync::Arc;
use tradedesk_core::Role;

/// Capability requirements for one navigation target
#[derive(Debug, Clone, Default)]
pub struct RouteRequirements {
    pub require_authenticated: bool,
    pub require_entitlement: bool,
    pub require_any_of_roles: Option<HashSet<Role>>,
}

impl RouteRequirements {
    /// Requires only an authenticated session
    pub fn authenticated() -> Self {
        Self {
            require_authenticated: true,
            ..Default::default()
        }
    }

    /// Requires authentication and an active entitlement
    pub fn entitled() -> Self {
        Self {
            require_authenticated: true,
            require_entitlement: true,
            ..Default::default()
        }
    }

    /// Requires authentication and any of the given roles
    pub fn any_of_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            require_authenticated: true,
            require_any_of_roles: Some(roles.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Add an entitlement requirement
    pub fn with_entitlement(mut self) -> Self {
        self.require_entitlement = true;
        self
    }
}

/// Admission decision for a navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
    RedirectToEntitlement,
    RedirectToDefault,
}

/// Decide whether the given session may view a destination with the given
/// requirements. Pure; evaluated in fixed short-circuit order.
pub fn decide(requirements: &RouteRequirements, session: &Session) -> Decision {
    if requirements.require_authenticated && !session.is_authenticated {
        return Decision::RedirectToLogin;
    }

    if requirements.require_entitlement && !session.has_active_entitlement() {
        return Decision::RedirectToEntitlement;
    }

    if let Some(roles) = &requirements.require_any_of_roles {
        let roles: Vec<Role> = roles.iter().copied().collect();
        if !session.has_role(&roles) {
            return Decision::RedirectToDefault;
        }
    }

    Decision::Allow
}

/// Route guard bound to a session store. Re-evaluates on every call, so a
/// session mutation elsewhere is reflected on the very next navigation.
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn evaluate(&self, requirements: &RouteRequirements) -> Decision {
        decide(requirements, &self.session.current())
    }
}
