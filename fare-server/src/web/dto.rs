//! Data transfer objects for web requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, IndexedFareEntry, RoundTrip, TimeBand, WeekdayClass};
use crate::selection::{Period, QueryConstraint, Selection, SelectionMessage};

/// Request to select round trips.
///
/// Every field is optional; an empty object asks for the cheapest trip in
/// the default direction.
#[derive(Debug, Default, Deserialize)]
pub struct SelectRequest {
    /// Destination alias ("mow" or "spb")
    pub direction: Option<Direction>,

    /// Outbound band (e.g., "morning")
    pub band: Option<TimeBand>,

    /// "weekday" or "weekend"; omit for any
    pub weekday: Option<WeekdayClass>,

    /// Price ceiling for both legs together
    pub total_cost: Option<u32>,

    /// Calendar month, 1-12
    pub month: Option<u32>,

    /// Outbound date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,

    /// Page of further results
    #[serde(default)]
    pub segment: usize,

    /// Ask for further results beyond the cheapest
    #[serde(default)]
    pub more: bool,

    /// Include early-morning departures
    #[serde(default)]
    pub early_morning: bool,
}

impl SelectRequest {
    /// Validate and convert into a query constraint.
    pub fn into_constraint(self) -> Result<QueryConstraint, String> {
        let period = match (self.month, self.date) {
            (Some(_), Some(_)) => return Err("month and date cannot both be set".to_string()),
            (Some(month), None) if !(1..=12).contains(&month) => {
                return Err(format!("invalid month: {month}"));
            }
            (Some(month), None) => Some(Period::Month(month)),
            (None, Some(date)) => Some(Period::Date(date)),
            (None, None) => None,
        };

        Ok(QueryConstraint {
            direction: self.direction,
            band: self.band,
            weekday: self.weekday,
            total_cost: self.total_cost,
            period,
            segment: self.segment,
            more: self.more,
            early_morning: self.early_morning,
        })
    }
}

/// One leg of a round trip.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// Origin city display name
    pub from: String,

    /// Destination city display name
    pub to: String,

    /// Departure date (YYYY-MM-DD)
    pub date: NaiveDate,

    /// Departure time (HH:MM)
    pub time: String,

    pub band: TimeBand,

    pub price: u32,
}

/// A round trip in selection results.
#[derive(Debug, Serialize)]
pub struct RoundTripResult {
    /// e.g. "Санкт-Петербург → Москва"
    pub route: String,

    pub outbound: LegResult,

    #[serde(rename = "return")]
    pub inbound: LegResult,

    pub total_cost: u32,

    pub weekday: WeekdayClass,
}

/// Explanation attached to a selection.
#[derive(Debug, Serialize)]
pub struct MessageResult {
    #[serde(flatten)]
    pub detail: SelectionMessage,

    /// English rendering of the message
    pub text: String,
}

/// Response for round-trip selection.
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub roundtrips: Vec<RoundTripResult>,

    pub message: Option<MessageResult>,
}

/// Query for a booking link.
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    /// Destination alias; the default direction when omitted
    pub direction: Option<Direction>,

    /// Outbound date of the round trip (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Booking link for a round trip.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    /// Shortened link
    pub url: String,

    /// Full booking link
    pub long_url: String,
}

/// Service status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Number of round trips being served
    pub round_trips: usize,

    /// Start of the collection run that produced them
    pub last_collected_at: Option<DateTime<Utc>>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl LegResult {
    pub fn from_entry(entry: &IndexedFareEntry) -> Self {
        Self {
            from: entry.direction.from().display_name().to_string(),
            to: entry.direction.to().display_name().to_string(),
            date: entry.date,
            time: entry.departure.format("%H:%M").to_string(),
            band: entry.band,
            price: entry.price,
        }
    }
}

impl RoundTripResult {
    pub fn from_round_trip(trip: &RoundTrip) -> Self {
        Self {
            route: trip.direction().summary(),
            outbound: LegResult::from_entry(trip.outbound()),
            inbound: LegResult::from_entry(trip.inbound()),
            total_cost: trip.total_cost(),
            weekday: trip.weekday(),
        }
    }
}

impl MessageResult {
    pub fn from_message(message: SelectionMessage) -> Self {
        Self {
            text: message.to_string(),
            detail: message,
        }
    }
}

impl From<Selection> for SelectResponse {
    fn from(selection: Selection) -> Self {
        Self {
            roundtrips: selection
                .results
                .iter()
                .map(RoundTripResult::from_round_trip)
                .collect(),
            message: selection.message.map(MessageResult::from_message),
        }
    }
}
