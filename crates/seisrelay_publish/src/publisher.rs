//! HTTP publisher for converted bulletin payloads.

use reqwest::header::CONTENT_TYPE;
use seisrelay_convert::Classification;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::retry::{retry_with_backoff, RetryPolicy};

/// Delivery errors with retry classification.
///
/// Payload construction problems ([`NoTopic`]) are caller bugs and fail
/// immediately; everything else is retryable up to the policy's budget.
///
/// [`NoTopic`]: PublishError::NoTopic
#[derive(Debug, Error)]
pub enum PublishError {
    /// The classification carries no sink topic; nothing can be built.
    #[error("no sink topic for classification {0:?}")]
    NoTopic(Classification),

    /// The sink answered with a non-success status.
    #[error("invalid response status code: {status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;

/// Sends payloads to the configured HTTP sink, one POST per attempt.
///
/// The reqwest client (and its connection pool) is shared read-only across
/// all in-flight deliveries; per-attempt timeouts belong to the client.
pub struct HttpPublisher {
    endpoint: String,
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpPublisher {
    pub fn new(endpoint: String, client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self {
            endpoint,
            client,
            policy,
        }
    }

    /// Deliver `payload` to `<endpoint>jma.<topic>`, retrying transient
    /// failures with backoff.
    ///
    /// Success is any 2xx response. A network-level failure or a status of
    /// 300 and above is retried until the budget runs out, then logged and
    /// returned as the permanent outcome for the caller to record.
    pub async fn publish(&self, payload: &[u8], classification: Classification) -> Result<()> {
        let topic = classification
            .topic()
            .ok_or(PublishError::NoTopic(classification))?;
        let url = format!("{}jma.{}", self.endpoint, topic);

        info!(topic, url = %url, bytes = payload.len(), "Publish JSON");
        debug!(body = %String::from_utf8_lossy(payload), "Publish body");

        let outcome = retry_with_backoff(&self.policy, || self.send_once(&url, payload)).await;
        match outcome {
            Ok(()) => {
                info!(topic, "Publish succeeded");
                Ok(())
            }
            Err(error) => {
                error!(topic, error = %error, "Publish permanently failed");
                Err(error)
            }
        }
    }

    async fn send_once(&self, url: &str, payload: &[u8]) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|error| {
                warn!(error = %error, "Publish attempt failed");
                PublishError::from(error)
            })?;

        let status = response.status().as_u16();
        if status > 299 {
            warn!(status, "Publish response error");
            return Err(PublishError::Status { status });
        }

        Ok(())
    }
}
