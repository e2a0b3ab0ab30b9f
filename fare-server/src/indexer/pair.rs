//! Pairing outbound and return entries into round trips.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::domain::{Direction, IndexedFareEntry, RoundTrip, TimeBand};

type CellKey = (NaiveDate, Direction, TimeBand);

/// Pair every outbound candidate with the evening return one day later.
///
/// Candidates dated on or after `last_date` are skipped, since the return leg
/// would fall outside the window. Candidates without a matching return are
/// dropped.
pub fn pair_round_trips(entries: &[IndexedFareEntry], last_date: NaiveDate) -> Vec<RoundTrip> {
    let returns: HashMap<CellKey, &IndexedFareEntry> = entries
        .iter()
        .map(|e| ((e.date, e.direction, e.band), e))
        .collect();

    let mut trips = Vec::new();

    for outbound in entries.iter().filter(|e| e.band.is_outbound()) {
        if outbound.date >= last_date {
            continue;
        }

        let Some(next_day) = outbound.date.checked_add_days(Days::new(1)) else {
            continue;
        };
        let key = (next_day, outbound.direction.reverse(), TimeBand::Evening);

        let Some(inbound) = returns.get(&key) else {
            debug!(
                fare = %outbound.fare.summary(),
                band = %outbound.band,
                "no return leg, skipping outbound candidate"
            );
            continue;
        };

        match RoundTrip::pair(outbound.clone(), (*inbound).clone()) {
            Ok(trip) => trips.push(trip),
            Err(e) => debug!(date = %outbound.date, error = %e, "could not pair legs"),
        }
    }

    trips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, RawFare, parse_departure};

    fn entry(to: City, date: &str, time: &str, price: u32) -> IndexedFareEntry {
        let direction = Direction::towards(to);
        let fare = RawFare::new(
            direction.from().name(),
            direction.to().name(),
            parse_departure(date, time).unwrap(),
            "САПСАН",
            price,
        );
        IndexedFareEntry::from_fare(direction, fare.time_band(), &fare)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn pairs_outbound_with_next_evening_reverse() {
        let entries = vec![
            entry(City::Moscow, "15.03.2024", "07:00", 1000),
            entry(City::SaintPetersburg, "16.03.2024", "19:00", 1200),
        ];
        let trips = pair_round_trips(&entries, day(16));
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].total_cost(), 2200);
        assert_eq!(trips[0].inbound().date, day(16));
    }

    #[test]
    fn every_outbound_band_pairs_with_the_same_return() {
        let entries = vec![
            entry(City::Moscow, "15.03.2024", "05:30", 900),
            entry(City::Moscow, "15.03.2024", "09:00", 1000),
            entry(City::Moscow, "15.03.2024", "14:00", 1100),
            entry(City::SaintPetersburg, "16.03.2024", "20:00", 1200),
        ];
        let trips = pair_round_trips(&entries, day(16));
        let bands: Vec<_> = trips.iter().map(RoundTrip::band).collect();
        assert_eq!(
            bands,
            vec![TimeBand::EarlyMorning, TimeBand::Morning, TimeBand::Daytime]
        );
    }

    #[test]
    fn last_window_date_never_starts_a_trip() {
        let entries = vec![
            entry(City::Moscow, "16.03.2024", "07:00", 1000),
            entry(City::SaintPetersburg, "17.03.2024", "19:00", 1200),
        ];
        assert!(pair_round_trips(&entries, day(16)).is_empty());
    }

    #[test]
    fn missing_return_drops_candidate() {
        let entries = vec![
            entry(City::Moscow, "15.03.2024", "07:00", 1000),
            // Same direction, so not a return
            entry(City::Moscow, "16.03.2024", "19:00", 1200),
            // Reverse direction, but not evening
            entry(City::SaintPetersburg, "16.03.2024", "10:00", 1200),
        ];
        assert!(pair_round_trips(&entries, day(17)).is_empty());
    }

    #[test]
    fn evening_entries_do_not_start_trips() {
        let entries = vec![
            entry(City::Moscow, "15.03.2024", "18:00", 1000),
            entry(City::SaintPetersburg, "16.03.2024", "19:00", 1200),
        ];
        assert!(pair_round_trips(&entries, day(17)).is_empty());
    }

    #[test]
    fn overflowing_pair_is_skipped() {
        let entries = vec![
            entry(City::Moscow, "15.03.2024", "07:00", u32::MAX),
            entry(City::Moscow, "16.03.2024", "07:00", 1000),
            entry(City::SaintPetersburg, "16.03.2024", "19:00", 1200),
            entry(City::SaintPetersburg, "17.03.2024", "19:00", 1200),
        ];
        let trips = pair_round_trips(&entries, day(17));
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].outbound().date, day(16));
    }
}
