//! HTTP transport seam
//!
//! The gateway talks to the backend through the [`Transport`] trait. The
//! production implementation wraps reqwest; tests script transport-level
//! failures without sockets. A [`TransportError`] means *no HTTP response was
//! received at all* (DNS failure, refused connection, timeout); anything with
//! a status code comes back as a [`RawResponse`] for the gateway to classify.

use async_trait::async_trait;
use thiserror::Error;
use tradedesk_core::{ClientConfig, Credential, DeskError, ErrorContext};

/// HTTP method for an outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// An outgoing request, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Suppress user-visible notifications for this request's failures.
    /// Session teardown on 401 still happens.
    pub silent: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            silent: false,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            silent: false,
        }
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
            silent: false,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
            silent: false,
        }
    }

    /// Mark this request as silent
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

/// A response that carried an HTTP status, successful or not
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Best-effort extraction of the server-provided `message` field
    pub fn server_message(&self) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()?
            .get("message")?
            .as_str()
            .map(|s| s.to_string())
    }
}

/// Transport-level failure: the request never produced an HTTP response
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

/// Seam between the gateway and the wire
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, DeskError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| DeskError::Config {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_transport").with_operation("create_client"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(credential) = credential {
            builder = builder.bearer_auth(credential.expose());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| TransportError {
            message: format!("{} {} failed: {}", request.method, url, e),
            source: Some(Box::new(e)),
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError {
            message: format!("failed to read response body from {}: {}", url, e),
            source: Some(Box::new(e)),
        })?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_tolerates_slashes() {
        let config = ClientConfig::new("http://localhost:5000/api/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url_for("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );
        assert_eq!(
            transport.url_for("trades"),
            "http://localhost:5000/api/trades"
        );
    }

    #[test]
    fn server_message_extraction() {
        let resp = RawResponse {
            status: 400,
            body: r#"{"message": "Invalid credentials"}"#.to_string(),
        };
        assert_eq!(resp.server_message().as_deref(), Some("Invalid credentials"));

        let empty = RawResponse {
            status: 400,
            body: "not json".to_string(),
        };
        assert_eq!(empty.server_message(), None);
    }
}
