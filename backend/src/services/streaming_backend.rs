//! Adapter for the external streaming media server.
//!
//! Outbound: stream provisioning over the server's HTTP control API.
//! Inbound: status callbacks carry a `/<app>/<stream_key>` path which is reduced
//! to the stream key here before the lifecycle manager sees it.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::StreamingConfig;

const PROVISION_PATH: &str = "api/stream/add";
const USER_AGENT: &str = "classlive-backend/1.0";

#[derive(Debug, thiserror::Error)]
pub enum StreamingBackendError {
    #[error("request to streaming backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("streaming backend rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid streaming backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Operations the lifecycle manager needs from the media server.
///
/// This trait is designed to be mockable using mockall for testing.
/// Use `MockStreamingBackend` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreamingBackend: Send + Sync {
    /// Registers `stream_key` so publishers may push to it. Single attempt.
    async fn provision_stream(&self, stream_key: &str) -> Result<(), StreamingBackendError>;
}

/// HTTP client for a livego-compatible control API.
#[derive(Debug, Clone)]
pub struct LivegoClient {
    http: reqwest::Client,
    api_url: Url,
}

impl LivegoClient {
    pub fn new(config: &StreamingConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize HTTP client: {}", e))?;
        Self::with_client(http, &config.api_url)
    }

    pub fn with_client(http: reqwest::Client, api_url: &str) -> anyhow::Result<Self> {
        let mut api_url = Url::parse(api_url)
            .map_err(|e| anyhow::anyhow!("Invalid streaming api url {}: {}", api_url, e))?;
        // Url::join drops the last path segment unless the base ends with '/'.
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        Ok(Self { http, api_url })
    }

    pub fn provision_url(&self, stream_key: &str) -> Result<Url, url::ParseError> {
        let mut url = self.api_url.join(PROVISION_PATH)?;
        url.query_pairs_mut().append_pair("stream", stream_key);
        Ok(url)
    }
}

#[async_trait]
impl StreamingBackend for LivegoClient {
    async fn provision_stream(&self, stream_key: &str) -> Result<(), StreamingBackendError> {
        let url = self.provision_url(stream_key)?;
        let response = self.http.post(url).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(stream_key, status = status.as_u16(), "Stream provisioned");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(StreamingBackendError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stream path: {0}")]
pub struct InvalidStreamPath(pub String);

/// Extracts the stream key from a `/<app>/<stream_key>` callback path.
pub fn parse_stream_path(stream_path: &str) -> Result<&str, InvalidStreamPath> {
    stream_path
        .split('/')
        .nth(2)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| InvalidStreamPath(stream_path.to_string()))
}
