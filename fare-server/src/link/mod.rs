//! Booking links for selected round trips.

mod deep_link;
mod shortener;

pub use deep_link::{DEFAULT_BOOKING_URL, booking_link};
pub use shortener::{
    CachedShortener, DEFAULT_SHORTENER_URL, HttpShortener, LinkConfig, LinkError, LinkShortener,
};
