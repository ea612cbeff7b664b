//! Request gateway
//!
//! Uniform request/response handling for every backend call: credential
//! attachment, linear-backoff retry of transport failures, and classification
//! of HTTP error statuses into the [`DeskError`] taxonomy. The gateway holds
//! no domain state; the one session mutation it performs is tearing the
//! session down when the backend answers 401.

use crate::session::SessionInner;
use crate::transport::{ApiRequest, RawResponse, Transport};
use std::sync::Arc;
use tokio::time::sleep;
use tradedesk_core::{
    DeskError, DeskResult, ErrorContext, NoticeLevel, RetryConfig, SharedNotifier,
};
use tracing::{debug, warn};

pub struct Gateway {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
    session: Arc<SessionInner>,
    notifier: SharedNotifier,
}

impl Gateway {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        retry: RetryConfig,
        session: Arc<SessionInner>,
        notifier: SharedNotifier,
    ) -> Self {
        Self {
            transport,
            retry,
            session,
            notifier,
        }
    }

    /// Send a request, retrying transport failures and classifying HTTP
    /// errors. Classified failures are returned, never panicked; each one
    /// produces exactly one user-visible notification unless the request is
    /// marked silent.
    pub async fn send(&self, request: ApiRequest) -> DeskResult<RawResponse> {
        let credential = self.session.credential();

        let mut attempt: u32 = 0;
        let response = loop {
            attempt += 1;
            match self.transport.execute(&request, credential.as_ref()).await {
                Ok(response) => break response,
                Err(e) => {
                    if attempt > self.retry.max_retries {
                        let error = DeskError::Network {
                            message: e.message.clone(),
                            source: Some(Box::new(e)),
                            context: ErrorContext::new("gateway")
                                .with_operation(&format!("{} {}", request.method, request.path))
                                .with_metadata("attempts", &attempt.to_string())
                                .with_suggestion("Check network connectivity"),
                        };
                        self.notify_failure(&error, &request);
                        error.log();
                        return Err(error);
                    }

                    let delay = self.retry.delay_before_retry(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        path = %request.path,
                        error = %e,
                        "Transport failure, retrying"
                    );
                    sleep(delay).await;
                }
            }
        };

        if response.is_success() {
            debug!(status = response.status, path = %request.path, "Request succeeded");
            return Ok(response);
        }

        let error = self.classify(&response, &request);

        // 401 invalidates the session; this is the only error kind that
        // mutates session state from inside the gateway.
        if matches!(error, DeskError::Unauthorized { .. }) {
            self.session.teardown();
        }

        self.notify_failure(&error, &request);
        error.log();
        Err(error)
    }

    /// Send and deserialize a 2xx JSON body
    pub async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> DeskResult<T> {
        let response = self.send(request).await?;
        response.json().map_err(DeskError::Serialization)
    }

    pub async fn get(&self, path: &str) -> DeskResult<RawResponse> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> DeskResult<RawResponse> {
        self.send(ApiRequest::post(path, body)).await
    }

    pub async fn put(&self, path: &str, body: serde_json::Value) -> DeskResult<RawResponse> {
        self.send(ApiRequest::put(path, body)).await
    }

    pub async fn delete(&self, path: &str) -> DeskResult<RawResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    fn classify(&self, response: &RawResponse, request: &ApiRequest) -> DeskError {
        let context = ErrorContext::new("gateway")
            .with_operation(&format!("{} {}", request.method, request.path))
            .with_metadata("status", &response.status.to_string());

        match response.status {
            401 => DeskError::Unauthorized { context },
            403 => DeskError::Forbidden {
                message: response
                    .server_message()
                    .unwrap_or_else(|| "permission denied".to_string()),
                context,
            },
            429 => DeskError::RateLimited {
                retry_after_ms: None,
                context,
            },
            404 => DeskError::NotFound {
                resource: request.path.clone(),
                context,
            },
            status if status >= 500 => DeskError::Server {
                status,
                message: response
                    .server_message()
                    .unwrap_or_else(|| "internal server error".to_string()),
                context,
            },
            _ => DeskError::Api {
                message: response
                    .server_message()
                    .unwrap_or_else(|| "An error occurred".to_string()),
                context,
            },
        }
    }

    fn notify_failure(&self, error: &DeskError, request: &ApiRequest) {
        if request.silent {
            return;
        }

        match error.user_message() {
            Some(message) => self.notifier.notify(NoticeLevel::Error, message),
            None => {
                if let DeskError::Api { message, .. } = error {
                    self.notifier.notify(NoticeLevel::Error, message);
                }
            }
        }
    }
}
