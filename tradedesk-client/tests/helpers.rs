//! Shared test fixtures: a scripted transport, a recording notifier, and
//! client construction against a temp storage directory.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tradedesk_client::{ApiRequest, DeskClient, RawResponse, Transport, TransportError};
use tradedesk_core::{ClientConfig, Credential, NoticeLevel, Notifier, RetryConfig};

/// One scripted transport outcome
pub enum Step {
    /// Produce an HTTP response
    Respond { status: u16, body: String },
    /// Fail at the transport level (no response received)
    FailTransport,
    /// Signal `entered`, wait for `release`, then produce a response
    GatedRespond {
        entered: Arc<Notify>,
        release: Arc<Notify>,
        status: u16,
        body: String,
    },
}

impl Step {
    pub fn ok(body: impl Into<String>) -> Self {
        Step::Respond {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Step::Respond {
            status,
            body: body.into(),
        }
    }
}

/// A request the transport observed
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub credential: Option<String>,
}

/// Transport that replays a script of outcomes and records every request
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(SeenRequest {
            method: request.method.to_string(),
            path: request.path.clone(),
            credential: credential.map(|c| c.expose().to_string()),
        });

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted request: {} {}", request.method, request.path));

        match step {
            Step::Respond { status, body } => Ok(RawResponse { status, body }),
            Step::FailTransport => Err(TransportError::new("connection refused")),
            Step::GatedRespond {
                entered,
                release,
                status,
                body,
            } => {
                entered.notify_one();
                release.notified().await;
                Ok(RawResponse { status, body })
            }
        }
    }
}

/// Notifier that records every message for assertion
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NoticeLevel, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count_of(&self, needle: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, m)| m == needle)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Everything a flow test needs, wired against a temp storage directory
pub struct TestHarness {
    pub client: DeskClient,
    pub transport: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub storage_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn snapshot_path(&self) -> std::path::PathBuf {
        self.storage_dir.path().join("auth-session.json")
    }
}

pub fn spawn_harness(steps: Vec<Step>) -> TestHarness {
    let storage_dir = tempfile::tempdir().expect("tempdir");
    let config = ClientConfig::new("http://test.local/api")
        .with_storage_dir(storage_dir.path())
        .with_retry(RetryConfig::default());

    let transport = ScriptedTransport::new(steps);
    let notifier = Arc::new(RecordingNotifier::default());

    let client = DeskClient::with_parts(
        config,
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    )
    .expect("client construction");

    TestHarness {
        client,
        transport,
        notifier,
        storage_dir,
    }
}

/// JSON body of the login/register endpoints
pub fn auth_body(token: &str, role: &str, subscription_status: &str) -> String {
    format!(
        r#"{{"token":"{token}","user":{}}}"#,
        user_json(role, subscription_status)
    )
}

/// JSON body of the identity-verification endpoint
pub fn me_body(role: &str, subscription_status: &str) -> String {
    format!(r#"{{"user":{}}}"#, user_json(role, subscription_status))
}

pub fn user_json(role: &str, subscription_status: &str) -> String {
    format!(
        r#"{{"id":"u-1","firstName":"Ada","lastName":"Lovelace","email":"a@b.com","role":"{role}","subscriptionStatus":"{subscription_status}"}}"#
    )
}
