//! Indexed fares and the round trips built from them.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::city::Direction;
use super::fare::RawFare;
use super::time_band::TimeBand;

/// Cheapest fare for one (date, direction, band) cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFareEntry {
    pub date: NaiveDate,
    pub direction: Direction,
    pub band: TimeBand,
    pub departure: NaiveDateTime,
    pub price: u32,
    /// The raw fare this entry was chosen from.
    pub fare: RawFare,
}

impl IndexedFareEntry {
    /// Build an entry for a cell from the fare that won it.
    pub fn from_fare(direction: Direction, band: TimeBand, fare: &RawFare) -> Self {
        Self {
            date: fare.date(),
            direction,
            band,
            departure: fare.departure,
            price: fare.price,
            fare: fare.clone(),
        }
    }
}

/// Weekday classification of a round trip, by its outbound date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayClass {
    Weekday,
    Weekend,
}

impl WeekdayClass {
    /// Saturday outbound (Sunday return) is a weekend trip; anything else is not.
    pub fn of(date: NaiveDate) -> Self {
        if date.weekday() == Weekday::Sat {
            WeekdayClass::Weekend
        } else {
            WeekdayClass::Weekday
        }
    }
}

/// Error returned when two entries cannot form a round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundTripError {
    #[error("outbound leg departs in the {0} band")]
    OutboundBand(TimeBand),

    #[error("return leg departs in the {0} band, expected evening")]
    ReturnBand(TimeBand),

    #[error("return leg does not travel the reverse direction")]
    NotReversed,

    #[error("return leg on {returning} is not the day after {outbound}")]
    NotNextDay {
        outbound: NaiveDate,
        returning: NaiveDate,
    },

    #[error("total cost of {outbound} + {returning} does not fit")]
    CostOverflow { outbound: u32, returning: u32 },
}

/// An outbound leg paired with an evening return leg one day later.
///
/// Round trips are immutable once built; the derived attributes are computed
/// at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    outbound: IndexedFareEntry,
    #[serde(rename = "return")]
    inbound: IndexedFareEntry,
    total_cost: u32,
    weekday: WeekdayClass,
    band: TimeBand,
    month: u32,
}

impl RoundTrip {
    /// Pair two legs, checking the adjacency rules.
    pub fn pair(
        outbound: IndexedFareEntry,
        inbound: IndexedFareEntry,
    ) -> Result<Self, RoundTripError> {
        if !outbound.band.is_outbound() {
            return Err(RoundTripError::OutboundBand(outbound.band));
        }
        if inbound.band != TimeBand::Evening {
            return Err(RoundTripError::ReturnBand(inbound.band));
        }
        if inbound.direction != outbound.direction.reverse() {
            return Err(RoundTripError::NotReversed);
        }
        if outbound.date.checked_add_days(Days::new(1)) != Some(inbound.date) {
            return Err(RoundTripError::NotNextDay {
                outbound: outbound.date,
                returning: inbound.date,
            });
        }

        let total_cost = outbound.price.checked_add(inbound.price).ok_or(
            RoundTripError::CostOverflow {
                outbound: outbound.price,
                returning: inbound.price,
            },
        )?;

        Ok(Self {
            total_cost,
            weekday: WeekdayClass::of(outbound.date),
            band: outbound.band,
            month: outbound.date.month(),
            outbound,
            inbound,
        })
    }

    pub fn outbound(&self) -> &IndexedFareEntry {
        &self.outbound
    }

    pub fn inbound(&self) -> &IndexedFareEntry {
        &self.inbound
    }

    /// Sum of both leg prices.
    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    pub fn weekday(&self) -> WeekdayClass {
        self.weekday
    }

    /// Band of the outbound leg.
    pub fn band(&self) -> TimeBand {
        self.band
    }

    /// Calendar month (1-12) of the outbound leg.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn direction(&self) -> Direction {
        self.outbound.direction
    }

    pub fn outbound_date(&self) -> NaiveDate {
        self.outbound.date
    }
}
