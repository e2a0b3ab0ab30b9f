//! Cheapest-fare grid keyed by (date, direction, band).

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{Direction, IndexedFareEntry, RawFare, TimeBand};
use crate::filter::FarePredicate;

/// Distinct departure dates present in `fares`, ascending.
pub fn extract_dates(fares: &[RawFare]) -> Vec<NaiveDate> {
    fares
        .iter()
        .map(RawFare::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cheapest fare matching one grid cell.
///
/// When several fares share the minimum price the first one in input order
/// wins.
pub fn cheapest_in_cell(
    fares: &[RawFare],
    date: NaiveDate,
    direction: Direction,
    band: TimeBand,
) -> Option<IndexedFareEntry> {
    let predicate = FarePredicate::cell(date, direction, band);
    fares
        .iter()
        .filter(|f| predicate.matches(f))
        .min_by_key(|f| f.price)
        .map(|f| IndexedFareEntry::from_fare(direction, band, f))
}

/// One entry per (date, direction, band) cell that has at least one fare.
///
/// Entries are ordered by date, then direction, then band.
pub fn build_grid(fares: &[RawFare]) -> Vec<IndexedFareEntry> {
    let mut entries = Vec::new();

    for date in extract_dates(fares) {
        for direction in Direction::all() {
            for band in TimeBand::ALL {
                if let Some(entry) = cheapest_in_cell(fares, date, direction, band) {
                    entries.push(entry);
                }
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, parse_departure};

    fn fare(origin: City, date: &str, time: &str, price: u32) -> RawFare {
        RawFare::new(
            origin.name(),
            origin.other().name(),
            parse_departure(date, time).unwrap(),
            "САПСАН",
            price,
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn dates_are_distinct_and_sorted() {
        let fares = vec![
            fare(City::Moscow, "17.03.2024", "09:00", 1),
            fare(City::Moscow, "15.03.2024", "09:00", 1),
            fare(City::Moscow, "17.03.2024", "19:00", 1),
        ];
        assert_eq!(extract_dates(&fares), vec![day(15), day(17)]);
    }

    #[test]
    fn cell_picks_minimum_price() {
        let fares = vec![
            fare(City::SaintPetersburg, "15.03.2024", "07:00", 2500),
            fare(City::SaintPetersburg, "15.03.2024", "09:40", 1800),
            fare(City::SaintPetersburg, "15.03.2024", "11:59", 2100),
            // Cheaper, but outside the morning band
            fare(City::SaintPetersburg, "15.03.2024", "13:00", 900),
        ];
        let entry = cheapest_in_cell(
            &fares,
            day(15),
            Direction::towards(City::Moscow),
            TimeBand::Morning,
        )
        .unwrap();
        assert_eq!(entry.price, 1800);
        assert_eq!(entry.band, TimeBand::Morning);
        assert_eq!(entry.departure, fares[1].departure);
    }

    #[test]
    fn tie_goes_to_first_fare() {
        let fares = vec![
            fare(City::Moscow, "15.03.2024", "08:00", 1500),
            fare(City::Moscow, "15.03.2024", "10:00", 1500),
        ];
        let entry = cheapest_in_cell(
            &fares,
            day(15),
            Direction::towards(City::SaintPetersburg),
            TimeBand::Morning,
        )
        .unwrap();
        assert_eq!(entry.departure, fares[0].departure);
    }

    #[test]
    fn empty_cell_yields_nothing() {
        let fares = vec![fare(City::Moscow, "15.03.2024", "08:00", 1500)];
        assert!(
            cheapest_in_cell(
                &fares,
                day(15),
                Direction::towards(City::Moscow),
                TimeBand::Morning
            )
            .is_none()
        );
    }

    #[test]
    fn grid_has_one_entry_per_populated_cell() {
        let fares = vec![
            fare(City::Moscow, "15.03.2024", "08:00", 1500),
            fare(City::Moscow, "15.03.2024", "09:00", 1400),
            fare(City::Moscow, "15.03.2024", "19:00", 1600),
            fare(City::SaintPetersburg, "16.03.2024", "19:00", 1700),
        ];
        let grid = build_grid(&fares);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0].price, 1400);
        assert_eq!(grid[1].band, TimeBand::Evening);
        assert_eq!(grid[2].date, day(16));
    }

    #[test]
    fn fares_off_the_line_are_ignored() {
        let mut stray = fare(City::Moscow, "15.03.2024", "08:00", 100);
        stray.destination_station = "ТВЕРЬ".to_string();
        assert!(build_grid(&[stray]).is_empty());
    }
}
