//! Domain types for the fare aggregator.
//!
//! This module contains the value types shared by the ingestion pipeline and
//! the selection engine. Types that carry invariants check them at
//! construction, so code that receives them can trust their validity.

mod city;
mod fare;
mod round_trip;
mod time_band;

pub use city::{City, Direction, InvalidCity};
pub use fare::{
    FareParseError, RawFare, UPSTREAM_DATE_FORMAT, UPSTREAM_TIME_FORMAT, UPSTREAM_UTC_OFFSET_SECS,
    format_upstream_date, local_date, parse_departure,
};
pub use round_trip::{IndexedFareEntry, RoundTrip, RoundTripError, WeekdayClass};
pub use time_band::{InvalidTimeBand, TimeBand};
