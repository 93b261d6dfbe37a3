//! WebhookTransport - the reqwest-backed reply transport.
//!
//! One exchange is one POST of the JSON envelope to the configured
//! endpoint. The response body is parsed as JSON; reply extraction happens
//! in the store, not here.

use async_trait::async_trait;
use relay_core::error::{RelayError, Result};
use relay_core::transport::{ChatEnvelope, ReplyTransport};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply transport that POSTs the envelope to an HTTP webhook.
#[derive(Clone)]
pub struct WebhookTransport {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookTransport {
    /// Creates a new transport for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout after construction.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReplyTransport for WebhookTransport {
    async fn exchange(&self, envelope: &ChatEnvelope) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(envelope)
            .send()
            .await
            .map_err(|err| RelayError::network(format!("webhook request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "webhook returned an error status: {}", body);
            return Err(status_error(status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| RelayError::Serialization {
                format: "JSON".to_string(),
                message: format!("failed to parse webhook response: {err}"),
            })
    }
}

/// Maps a non-success HTTP status to the transport error.
fn status_error(status: StatusCode) -> RelayError {
    RelayError::Http {
        status: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, RelayError::Http { status: 500 }));

        let err = status_error(StatusCode::NOT_FOUND);
        assert!(matches!(err, RelayError::Http { status: 404 }));
    }

    #[test]
    fn test_builder_overrides_timeout() {
        let transport =
            WebhookTransport::new("https://example.com/hook").with_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.url(), "https://example.com/hook");
    }
}
