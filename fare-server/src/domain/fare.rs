//! Raw fare records as collected from the upstream listing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::city::Direction;
use super::time_band::TimeBand;

/// Date format used by the upstream service (`DD.MM.YYYY`).
pub const UPSTREAM_DATE_FORMAT: &str = "%d.%m.%Y";

/// Time format used by the upstream service (`HH:MM`).
pub const UPSTREAM_TIME_FORMAT: &str = "%H:%M";

/// UTC offset of the upstream's local dates and times (Moscow, UTC+3).
pub const UPSTREAM_UTC_OFFSET_SECS: i32 = 3 * 60 * 60;

/// Calendar date at `now` in a zone `utc_offset_secs` east of UTC.
///
/// Offsets outside a day fall back to the UTC date.
pub fn local_date(now: DateTime<Utc>, utc_offset_secs: i32) -> NaiveDate {
    FixedOffset::east_opt(utc_offset_secs)
        .map(|tz| now.with_timezone(&tz).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

/// Error returned when an upstream date or time string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure {field}: {value:?}")]
pub struct FareParseError {
    field: &'static str,
    value: String,
}

/// Parse an upstream `DD.MM.YYYY` + `HH:MM` pair into a datetime.
///
/// # Examples
///
/// ```
/// use fare_server::domain::parse_departure;
///
/// let dt = parse_departure("16.03.2024", "05:30").unwrap();
/// assert_eq!(dt.to_string(), "2024-03-16 05:30:00");
///
/// assert!(parse_departure("2024-03-16", "05:30").is_err());
/// assert!(parse_departure("16.03.2024", "25:00").is_err());
/// ```
pub fn parse_departure(date: &str, time: &str) -> Result<NaiveDateTime, FareParseError> {
    let date =
        NaiveDate::parse_from_str(date.trim(), UPSTREAM_DATE_FORMAT).map_err(|_| FareParseError {
            field: "date",
            value: date.to_string(),
        })?;
    let time =
        NaiveTime::parse_from_str(time.trim(), UPSTREAM_TIME_FORMAT).map_err(|_| FareParseError {
            field: "time",
            value: time.to_string(),
        })?;
    Ok(date.and_time(time))
}

/// Format a date the way the upstream service expects it.
pub fn format_upstream_date(date: NaiveDate) -> String {
    date.format(UPSTREAM_DATE_FORMAT).to_string()
}

/// One fare as listed by the upstream service.
///
/// Lives only for one ingestion run; the raw-fare collection is replaced
/// wholesale on every successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFare {
    /// Sequential id assigned when a run stores its fares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Origin station name (e.g. "САНКТ-ПЕТЕРБУРГ").
    pub origin_station: String,

    /// Destination station name.
    pub destination_station: String,

    /// Local departure date and time.
    pub departure: NaiveDateTime,

    /// Carrier/brand tag (e.g. "САПСАН").
    pub brand: String,

    /// Lowest listed tariff, in whole currency units.
    pub price: u32,

    /// When the run that fetched this fare started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<DateTime<Utc>>,
}

impl RawFare {
    pub fn new(
        origin_station: impl Into<String>,
        destination_station: impl Into<String>,
        departure: NaiveDateTime,
        brand: impl Into<String>,
        price: u32,
    ) -> Self {
        Self {
            id: None,
            origin_station: origin_station.into(),
            destination_station: destination_station.into(),
            departure,
            brand: brand.into(),
            price,
            collected_at: None,
        }
    }

    /// Calendar day of departure.
    pub fn date(&self) -> NaiveDate {
        self.departure.date()
    }

    pub fn hour(&self) -> u32 {
        self.departure.hour()
    }

    pub fn time_band(&self) -> TimeBand {
        TimeBand::for_hour(self.hour())
    }

    /// Direction of travel, if both stations are the line's end points.
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_station_names(&self.origin_station, &self.destination_station)
    }

    /// One-line description used in logs.
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} {}",
            self.departure.format("%d.%m.%Y %H:%M"),
            self.origin_station,
            self.destination_station,
            self.price
        )
    }
}
