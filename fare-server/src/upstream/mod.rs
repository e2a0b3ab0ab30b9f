//! Upstream timetable client.
//!
//! The upstream service lists fares for a single date and direction pair
//! behind a short-lived session:
//! - a first request without a token returns a request id (`rid`) in the body
//!   and a `JSESSIONID` cookie in `Set-Cookie`
//! - the same request replayed with `rid` and the cookie returns the fare
//!   lists under `tp`, outbound first
//! - a stale session answers the replay with a new `rid` and no fares
//! - dates are `DD.MM.YYYY`, times `HH:MM` (local time)

mod client;
mod convert;
mod credentials;
mod error;
mod types;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{Direction, RawFare};

pub use client::{DEFAULT_BASE_URL, UpstreamClient, UpstreamConfig, listing_params};
pub use convert::{ConversionError, convert_listing, convert_train};
pub use credentials::{Credentials, SESSION_COOKIE_NAME, SessionCookie, session_cookie};
pub use error::UpstreamError;
pub use types::{CarDto, CredentialsResponse, ListingResponse, Tariff, TrainDto, TrainList};

/// Source of per-day fare listings.
///
/// This abstraction lets the fetcher be tested without the network.
pub trait FareSource {
    /// Obtain a token and session cookie for one day's listing.
    fn acquire(
        &self,
        direction: Direction,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Credentials, UpstreamError>> + Send;

    /// Fetch the listing for one day. An empty list means the token went stale.
    fn list(
        &self,
        direction: Direction,
        date: NaiveDate,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Vec<RawFare>, UpstreamError>> + Send;
}
