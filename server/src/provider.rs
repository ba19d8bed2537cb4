use crate::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

/// Capability to turn a long URL into a short one via some external service.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    async fn shorten(&self, long_url: &str) -> Result<String, ProviderError>;
}

// ── TinyURL ────────────────────────────────────────────────────────────────

/// Client for TinyURL's `api-create.php` endpoint (or anything speaking the
/// same protocol): `GET <api_url>?url=<long url>` answers with the short URL
/// as a plain-text body.
#[derive(Debug, Clone)]
pub struct TinyUrlClient {
    client: reqwest::Client,
    api_url: String,
}

impl TinyUrlClient {
    /// Build the client once; every call shares the connection pool and the
    /// given timeout.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl Shortener for TinyUrlClient {
    async fn shorten(&self, long_url: &str) -> Result<String, ProviderError> {
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("url", long_url)])
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("shortening provider network error for {}: {}", long_url, e);
                e
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!("shortening provider returned {} for {}", status, long_url);
            return Err(ProviderError::Status(status));
        }

        let body = resp.text().await?;
        let short_url = body.trim();
        if short_url.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(short_url.to_owned())
    }
}
