//! Upstream timetable HTTP client.
//!
//! Provides async methods for the two-step listing protocol: a token-less
//! request that hands out a request id and a session cookie, followed by the
//! same request replaying both to obtain the fare lists.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::COOKIE;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Direction, RawFare, format_upstream_date};

use super::FareSource;
use super::convert::convert_listing;
use super::credentials::{Credentials, session_cookie};
use super::error::UpstreamError;
use super::types::{CredentialsResponse, ListingResponse};

/// Default timetable endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pass.rzd.ru/timetable/public/ru";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 30;

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Timetable endpoint URL
    pub base_url: String,
    /// Page structure id the endpoint requires
    pub structure_id: String,
    /// Layer id the endpoint requires
    pub layer_id: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            structure_id: "735".to_string(),
            layer_id: "5371".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for a one-day round-trip listing of `direction`.
///
/// Both dates are set to `date`, so the response lists `direction` first and
/// its reverse second.
pub fn listing_params(
    config: &UpstreamConfig,
    direction: Direction,
    date: NaiveDate,
    token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let day = format_upstream_date(date);
    let mut params = vec![
        ("STRUCTURE_ID", config.structure_id.clone()),
        ("layer_id", config.layer_id.clone()),
        ("dir", "1".to_string()),
        ("tfl", "3".to_string()),
        ("checkSeats", "1".to_string()),
        ("st0", direction.from().name().to_string()),
        ("code0", direction.from().code().to_string()),
        ("dt0", day.clone()),
        ("st1", direction.to().name().to_string()),
        ("code1", direction.to().code().to_string()),
        ("dt1", day),
    ];
    if let Some(token) = token {
        params.push(("rid", token.to_string()));
    }
    params
}

/// Upstream timetable client.
///
/// Cloning is cheap; clones share the connection pool and the concurrency
/// limit.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
    semaphore: Arc<Semaphore>,
}

impl UpstreamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            config,
        })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Request a token and session cookie for one day's listing.
    pub async fn acquire_credentials(
        &self,
        direction: Direction,
        date: NaiveDate,
    ) -> Result<Credentials, UpstreamError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| UpstreamError::Status {
            status: 0,
            body: "Semaphore closed".to_string(),
        })?;

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&listing_params(&self.config, direction, date, None))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let session_cookie = session_cookie(response.headers());
        let body = response.text().await?;

        let parsed: CredentialsResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::CredentialParse {
                message: e.to_string(),
            })?;

        let token = parsed.token().ok_or_else(|| UpstreamError::CredentialParse {
            message: format!(
                "no rid in response: {}",
                body.chars().take(200).collect::<String>()
            ),
        })?;

        debug!(%date, %direction, has_cookie = session_cookie.is_some(), "acquired credentials");

        Ok(Credentials {
            token,
            session_cookie,
        })
    }

    /// Fetch the fare listing for one day using previously acquired credentials.
    ///
    /// A stale session yields an empty list rather than an error; callers
    /// decide whether to retry.
    pub async fn get_listing(
        &self,
        direction: Direction,
        date: NaiveDate,
        credentials: &Credentials,
    ) -> Result<Vec<RawFare>, UpstreamError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| UpstreamError::Status {
            status: 0,
            body: "Semaphore closed".to_string(),
        })?;

        let mut request = self.http.get(&self.config.base_url).query(&listing_params(
            &self.config,
            direction,
            date,
            Some(&credentials.token),
        ));
        // The session cookie must be sent explicitly; a cookie jar does not
        // carry it over reliably.
        if let Some(cookie) = &credentials.session_cookie {
            request = request.header(COOKIE, cookie.header_value());
        }

        let response = request.send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        let listing: ListingResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert_listing(&listing))
    }
}

impl FareSource for UpstreamClient {
    async fn acquire(
        &self,
        direction: Direction,
        date: NaiveDate,
    ) -> Result<Credentials, UpstreamError> {
        self.acquire_credentials(direction, date).await
    }

    async fn list(
        &self,
        direction: Direction,
        date: NaiveDate,
        credentials: &Credentials,
    ) -> Result<Vec<RawFare>, UpstreamError> {
        self.get_listing(direction, date, credentials).await
    }
}
