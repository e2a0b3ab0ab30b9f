//! URL shortening.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::deep_link::DEFAULT_BOOKING_URL;

/// Default shortening endpoint.
pub const DEFAULT_SHORTENER_URL: &str = "https://www.googleapis.com/urlshortener/v1/url";

/// The link could not be produced. Callers get no detail beyond the message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("link unavailable: {message}")]
pub struct LinkError {
    message: String,
}

impl LinkError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration for booking links and their shortening.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Shortening endpoint
    pub shortener_url: String,
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Booking page the pre-filled fragment is appended to
    pub booking_url: String,
    /// How long shortened links stay cached
    pub cache_ttl: Duration,
    /// Maximum number of cached links
    pub cache_capacity: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LinkConfig {
    pub fn new() -> Self {
        Self {
            shortener_url: DEFAULT_SHORTENER_URL.to_string(),
            api_key: None,
            booking_url: DEFAULT_BOOKING_URL.to_string(),
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            cache_capacity: 10_000,
            timeout_secs: 10,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_shortener_url(mut self, url: impl Into<String>) -> Self {
        self.shortener_url = url.into();
        self
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns long URLs into short ones.
pub trait LinkShortener {
    fn shorten(&self, long_url: &str) -> impl Future<Output = Result<String, LinkError>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShortenRequest<'a> {
    long_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    id: String,
}

/// Shortener backed by an HTTP service taking `{"longUrl"}` and answering `{"id"}`.
#[derive(Debug, Clone)]
pub struct HttpShortener {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpShortener {
    pub fn new(config: &LinkConfig) -> Result<Self, LinkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LinkError::unavailable(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.shortener_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl LinkShortener for HttpShortener {
    async fn shorten(&self, long_url: &str) -> Result<String, LinkError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&ShortenRequest { long_url });
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LinkError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::unavailable(format!("shortener returned {status}")));
        }

        let body: ShortenResponse = response
            .json()
            .await
            .map_err(|e| LinkError::unavailable(e.to_string()))?;
        Ok(body.id)
    }
}

/// Shortener that remembers previous answers, keyed by the long URL.
///
/// Failures are not cached.
pub struct CachedShortener<S> {
    inner: S,
    cache: MokaCache<String, String>,
}

impl<S: LinkShortener + Sync> CachedShortener<S> {
    pub fn new(inner: S, config: &LinkConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.cache_ttl)
            .max_capacity(config.cache_capacity)
            .build();
        Self { inner, cache }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<S: LinkShortener + Sync> LinkShortener for CachedShortener<S> {
    async fn shorten(&self, long_url: &str) -> Result<String, LinkError> {
        if let Some(short) = self.cache.get(long_url).await {
            debug!(long_url, "shortened link cache hit");
            return Ok(short);
        }

        let short = self.inner.shorten(long_url).await.inspect_err(|e| {
            warn!(error = %e, "failed to shorten link");
        })?;
        self.cache
            .insert(long_url.to_string(), short.clone())
            .await;
        Ok(short)
    }
}
