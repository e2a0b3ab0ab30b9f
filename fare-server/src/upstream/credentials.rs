//! Session credentials for the listing endpoint.

use reqwest::header::{HeaderMap, SET_COOKIE};

/// Name of the session cookie the listing endpoint expects back.
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// A `name=value` cookie pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    /// Parse the leading `name=value` pair of a `Set-Cookie` value.
    ///
    /// `JSESSIONID=00004ADS7pUenJ:17obq8rib; Path=/` gives
    /// (`JSESSIONID`, `00004ADS7pUenJ:17obq8rib`).
    pub fn parse(set_cookie: &str) -> Option<Self> {
        let pair = set_cookie.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }

    /// Value for a `Cookie` request header.
    pub fn header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Find the session cookie among a response's `Set-Cookie` headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<SessionCookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.contains(SESSION_COOKIE_NAME))
        .find_map(SessionCookie::parse)
}

/// Token and session cookie for one listing request.
///
/// Tokens go stale quickly, so credentials are acquired per day and never
/// shared between days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub session_cookie: Option<SessionCookie>,
}
