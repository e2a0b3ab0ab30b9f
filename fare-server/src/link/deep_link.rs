//! Pre-filled booking links.

use crate::domain::{RoundTrip, format_upstream_date};

/// Booking page the fragment is appended to.
pub const DEFAULT_BOOKING_URL: &str =
    "https://pass.rzd.ru/tickets/public/ru?STRUCTURE_ID=704&layer_id=5418";

/// Link to the upstream booking page with the round trip's route and both
/// dates filled in.
///
/// The booking page reads its parameters from a `|`-separated fragment. The
/// fragment is left unencoded; the page does not accept `%7C` for `|`.
pub fn booking_link(base_url: &str, trip: &RoundTrip) -> String {
    let direction = trip.direction();
    let (from, to) = (direction.from(), direction.to());

    let fragment = [
        ("dir", "1".to_string()),
        ("tfl", "3".to_string()),
        ("checkSeats", "1".to_string()),
        ("st0", from.name().to_string()),
        ("code0", from.code().to_string()),
        ("dt0", format_upstream_date(trip.outbound().date)),
        ("st1", to.name().to_string()),
        ("code1", to.code().to_string()),
        ("dt1", format_upstream_date(trip.inbound().date)),
    ]
    .iter()
    .map(|(key, value)| format!("{key}={value}"))
    .collect::<Vec<_>>()
    .join("|");

    format!("{base_url}#{fragment}")
}
