//! Fare indexing.
//!
//! Reduces the raw fares of one ingestion run to a cheapest-fare grid keyed by
//! (date, direction, band), then pairs outbound and return cells into round
//! trips:
//!
//! 1. Collect the distinct departure dates.
//! 2. For every date, direction and band, keep the cheapest matching fare.
//! 3. Pair each morning-ish outbound entry with the evening entry of the
//!    reverse direction one day later.
//!
//! An empty result is an error so that callers never replace a good index
//! with an empty one.

mod grid;
mod pair;

pub use grid::{build_grid, cheapest_in_cell, extract_dates};
pub use pair::pair_round_trips;

use tracing::info;

use crate::domain::{RawFare, RoundTrip};

/// Error from index building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// No round trip could be built from the fares.
    #[error("index is empty: no round trips could be built")]
    EmptyIndex,
}

/// Build the round-trip index from every raw fare of a run.
pub fn build_index(fares: &[RawFare]) -> Result<Vec<RoundTrip>, IndexError> {
    let dates = extract_dates(fares);
    let Some(&last_date) = dates.last() else {
        return Err(IndexError::EmptyIndex);
    };

    let entries = build_grid(fares);
    let trips = pair_round_trips(&entries, last_date);

    info!(
        fares = fares.len(),
        dates = dates.len(),
        entries = entries.len(),
        round_trips = trips.len(),
        "built fare index"
    );

    if trips.is_empty() {
        return Err(IndexError::EmptyIndex);
    }

    Ok(trips)
}
