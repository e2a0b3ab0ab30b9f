//! Upstream client error types.

/// Errors from the upstream timetable client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Transport failure (connection, timeout, TLS).
    #[error("upstream unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The endpoint answered with a non-200 status.
    #[error("upstream unavailable: status {status}: {body}")]
    Status { status: u16, body: String },

    /// The credential response carried no token.
    #[error("could not parse credentials: {message}")]
    CredentialParse { message: String },

    /// A response body was not the JSON we expected.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

impl UpstreamError {
    /// Whether this is a transport or status failure rather than a bad payload.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            UpstreamError::Unavailable(_) | UpstreamError::Status { .. }
        )
    }
}
