//! Fare predicates.
//!
//! A predicate is a sparse set of clauses. Every clause that is set must hold;
//! clauses that are not set are not evaluated. The same predicate type is used
//! after each fetch (brand only) and per grid cell during indexing.

use chrono::NaiveDate;

use crate::domain::{Direction, RawFare, TimeBand};

/// Brand tag of the high-speed service.
pub const HIGH_SPEED_BRAND: &str = "САПСАН";

/// Clauses a fare must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarePredicate {
    pub brand: Option<String>,
    pub origin_station: Option<String>,
    pub destination_station: Option<String>,
    /// Calendar day of departure (time of day is ignored).
    pub date: Option<NaiveDate>,
    /// Departure hour must fall inside the band's interval.
    pub band: Option<TimeBand>,
}

impl FarePredicate {
    /// A predicate with no clauses; matches every fare.
    pub fn any() -> Self {
        Self::default()
    }

    /// Only high-speed fares.
    pub fn high_speed() -> Self {
        Self::any().with_brand(HIGH_SPEED_BRAND)
    }

    /// Predicate selecting one (date, direction, band) grid cell.
    pub fn cell(date: NaiveDate, direction: Direction, band: TimeBand) -> Self {
        Self::any()
            .with_route(direction)
            .with_date(date)
            .with_band(band)
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_origin(mut self, station: impl Into<String>) -> Self {
        self.origin_station = Some(station.into());
        self
    }

    pub fn with_destination(mut self, station: impl Into<String>) -> Self {
        self.destination_station = Some(station.into());
        self
    }

    /// Both station clauses for a direction.
    pub fn with_route(self, direction: Direction) -> Self {
        self.with_origin(direction.from().name())
            .with_destination(direction.to().name())
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_band(mut self, band: TimeBand) -> Self {
        self.band = Some(band);
        self
    }

    /// Whether every set clause holds for `fare`.
    pub fn matches(&self, fare: &RawFare) -> bool {
        matches(fare, self)
    }
}

/// Whether every set clause of `predicate` holds for `fare`.
pub fn matches(fare: &RawFare, predicate: &FarePredicate) -> bool {
    if let Some(brand) = &predicate.brand
        && &fare.brand != brand
    {
        return false;
    }
    if let Some(origin) = &predicate.origin_station
        && &fare.origin_station != origin
    {
        return false;
    }
    if let Some(destination) = &predicate.destination_station
        && &fare.destination_station != destination
    {
        return false;
    }
    if let Some(date) = predicate.date
        && fare.date() != date
    {
        return false;
    }
    if let Some(band) = predicate.band
        && !band.contains_hour(fare.hour())
    {
        return false;
    }
    true
}

/// Keep the fares that satisfy `predicate`, preserving order.
pub fn filter_fares(fares: Vec<RawFare>, predicate: &FarePredicate) -> Vec<RawFare> {
    fares.into_iter().filter(|f| predicate.matches(f)).collect()
}
