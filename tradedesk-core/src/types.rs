//! Shared domain types
//!
//! Wire shapes follow the backend API: user records are camelCase JSON, role
//! and subscription status are lowercase strings.

use serde::{Deserialize, Serialize};

/// User role classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular client, entitled through an active subscription
    Client,
    /// Educator publishing trades and signals
    Educator,
    /// System administrator
    Admin,
}

impl Role {
    /// Staff roles are always entitled to premium features regardless of
    /// subscription status.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Educator | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Educator => write!(f, "educator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "educator" => Ok(Role::Educator),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Subscription status as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Cancelled,
    PastDue,
    /// Forward-compatible fallback for statuses this client does not know
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Inactive => write!(f, "inactive"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
            SubscriptionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Server-supplied user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub subscription_status: SubscriptionStatus,
}

impl UserProfile {
    /// Display string for logs and greetings
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Opaque bearer token proving identity to the backend.
///
/// Debug output redacts the token value so it never leaks into logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_camel_case_wire_shape() {
        let json = r#"{
            "id": "u-42",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "role": "educator",
            "subscriptionStatus": "past_due"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, Role::Educator);
        assert_eq!(profile.subscription_status, SubscriptionStatus::PastDue);
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }

    #[test]
    fn unknown_subscription_status_falls_back() {
        let status: SubscriptionStatus = serde_json::from_str("\"trialing\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Unknown);
    }

    #[test]
    fn role_parsing_and_staff_check() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("moderator".parse::<Role>().is_err());
        assert!(Role::Educator.is_staff());
        assert!(!Role::Client.is_staff());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("super-secret-token");
        assert_eq!(format!("{:?}", cred), "Credential(***)");
        assert_eq!(cred.expose(), "super-secret-token");
    }
}
