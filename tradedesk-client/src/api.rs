//! Typed backend API surface
//!
//! Thin, stateless wrappers over the gateway for the endpoints the portal
//! consumes. Auth endpoints are used by the session store; the domain
//! endpoints are the request contract the out-of-scope pages render from.

use crate::gateway::Gateway;
use crate::transport::ApiRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tradedesk_core::{DeskResult, UserProfile};

/// Response of the credential-exchange and registration endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Response of the identity-verification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Fields for the registration endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A published trade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub asset: String,
    pub direction: TradeDirection,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub status: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// A scanner-produced signal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerSignal {
    pub id: String,
    pub pair: String,
    pub signal_type: TradeDirection,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub strategy_name: String,
    pub confidence: f64,
}

/// Current subscription record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub status: String,
    #[serde(default)]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Typed endpoint surface over the gateway
pub struct PortalApi {
    gateway: Arc<Gateway>,
}

impl PortalApi {
    pub(crate) fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// List trades, optionally filtered by status (`active`, `closed`)
    pub async fn trades(&self, status: Option<&str>) -> DeskResult<Vec<Trade>> {
        let path = match status {
            Some(status) => format!("/trades?status={}", status),
            None => "/trades".to_string(),
        };
        self.gateway.send_json(ApiRequest::get(path)).await
    }

    /// Latest scanner signals
    pub async fn scanner_results(&self, limit: Option<u32>) -> DeskResult<Vec<ScannerSignal>> {
        let path = match limit {
            Some(limit) => format!("/scanner/results?limit={}", limit),
            None => "/scanner/results".to_string(),
        };
        self.gateway.send_json(ApiRequest::get(path)).await
    }

    /// Current subscription status
    pub async fn subscription_status(&self) -> DeskResult<SubscriptionInfo> {
        self.gateway
            .send_json(ApiRequest::get("/subscriptions/status"))
            .await
    }
}
