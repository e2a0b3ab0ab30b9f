//! Selection policies over the round-trip index.

use std::cmp::Ordering;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::domain::RoundTrip;

use super::config::SelectionConfig;
use super::constraint::QueryConstraint;
use super::message::SelectionMessage;

/// Result of a selection: zero or more round trips and an optional explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub results: Vec<RoundTrip>,
    pub message: Option<SelectionMessage>,
}

impl Selection {
    fn new(results: Vec<RoundTrip>, message: Option<SelectionMessage>) -> Self {
        Self { results, message }
    }

    fn single(trip: Option<&RoundTrip>, message: Option<SelectionMessage>) -> Self {
        Self::new(trip.into_iter().cloned().collect(), message)
    }
}

/// Ordering for further results: total cost, then outbound and return departure.
pub fn paging_order(a: &RoundTrip, b: &RoundTrip) -> Ordering {
    a.total_cost()
        .cmp(&b.total_cost())
        .then(a.outbound().departure.cmp(&b.outbound().departure))
        .then(a.inbound().departure.cmp(&b.inbound().departure))
}

/// Applies constraints and selection policies to an index.
///
/// Selection is pure: it reads the given round trips and the configured
/// "today", and never fails. An empty result always carries a message
/// explaining it.
#[derive(Debug, Clone)]
pub struct Selector {
    config: SelectionConfig,
    today: NaiveDate,
}

impl Selector {
    pub fn new(config: SelectionConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn select(&self, constraint: &QueryConstraint, trips: &[RoundTrip]) -> Selection {
        let filtered: Vec<&RoundTrip> = trips.iter().filter(|t| constraint.matches(t)).collect();
        debug!(
            total = trips.len(),
            matching = filtered.len(),
            more = constraint.more,
            "selecting round trip"
        );

        if constraint.more {
            return self.select_more(constraint, filtered);
        }

        if let Some(ceiling) = constraint.total_cost {
            let nearest_under = filtered
                .iter()
                .copied()
                .filter(|t| t.total_cost() <= ceiling)
                .min_by_key(|t| t.outbound().departure);

            return match nearest_under {
                Some(trip) => Selection::single(Some(trip), None),
                None => Selection::single(
                    cheapest(&filtered),
                    Some(SelectionMessage::NothingUnderPrice { ceiling }),
                ),
            };
        }

        if let Some(month) = constraint.month()
            && filtered.is_empty()
        {
            let message = if self.month_in_window(month) {
                SelectionMessage::NoTicketsInMonth { month }
            } else {
                SelectionMessage::MonthBeyondWindow {
                    month,
                    window_days: self.config.window_days,
                }
            };
            return Selection::new(Vec::new(), Some(message));
        }

        if let Some(date) = constraint.date()
            && filtered.is_empty()
        {
            let message = if self.date_in_window(date) {
                SelectionMessage::NoTicketsOnDate { date }
            } else {
                SelectionMessage::DateBeyondWindow {
                    date,
                    window_days: self.config.window_days,
                }
            };
            return Selection::new(Vec::new(), Some(message));
        }

        match cheapest(&filtered) {
            Some(trip) => Selection::single(Some(trip), None),
            None => Selection::new(Vec::new(), Some(SelectionMessage::NoMatchingTickets)),
        }
    }

    /// Page `segment` of the matching trips, leaving out the overall cheapest one.
    fn select_more(&self, constraint: &QueryConstraint, mut filtered: Vec<&RoundTrip>) -> Selection {
        filtered.sort_by(|a, b| paging_order(a, b));

        let page_size = self.config.page_size;
        let offset = constraint.segment.saturating_mul(page_size);
        let page: Vec<RoundTrip> = filtered
            .into_iter()
            .skip(1)
            .skip(offset)
            .take(page_size)
            .cloned()
            .collect();

        let message = match page.len() {
            0 if constraint.date().is_some() => SelectionMessage::OnePairPerDay,
            0 => SelectionMessage::NoMoreTickets,
            1 => SelectionMessage::LastPair,
            _ => SelectionMessage::MoreTickets,
        };
        Selection::new(page, Some(message))
    }

    /// Days `[today, today + window)`.
    fn window(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.config.window_days)
            .filter_map(|offset| self.today.checked_add_days(Days::new(u64::from(offset))))
    }

    /// Whether any day of the window falls in `month`.
    pub fn month_in_window(&self, month: u32) -> bool {
        self.window().any(|d| d.month() == month)
    }

    pub fn date_in_window(&self, date: NaiveDate) -> bool {
        let end = self
            .today
            .checked_add_days(Days::new(u64::from(self.config.window_days)));
        date >= self.today && end.is_some_and(|end| date < end)
    }
}

fn cheapest<'a>(trips: &[&'a RoundTrip]) -> Option<&'a RoundTrip> {
    trips.iter().copied().min_by_key(|t| t.total_cost())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, Direction, IndexedFareEntry, RawFare, TimeBand, WeekdayClass};
    use chrono::NaiveTime;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        today().checked_add_days(Days::new(offset)).unwrap()
    }

    fn leg(direction: Direction, date: NaiveDate, hour: u32, price: u32) -> IndexedFareEntry {
        let fare = RawFare::new(
            direction.from().name(),
            direction.to().name(),
            date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
            "САПСАН",
            price,
        );
        IndexedFareEntry::from_fare(direction, fare.time_band(), &fare)
    }

    /// Round trip leaving `offset` days from today, split evenly between both legs.
    fn trip_on(direction: Direction, offset: u64, hour: u32, total: u32) -> RoundTrip {
        let out_price = total / 2;
        RoundTrip::pair(
            leg(direction, day(offset), hour, out_price),
            leg(direction.reverse(), day(offset + 1), 19, total - out_price),
        )
        .unwrap()
    }

    fn trip(offset: u64, total: u32) -> RoundTrip {
        trip_on(Direction::default(), offset, 8, total)
    }

    fn selector() -> Selector {
        Selector::new(SelectionConfig::default(), today())
    }

    fn costs(selection: &Selection) -> Vec<u32> {
        selection.results.iter().map(RoundTrip::total_cost).collect()
    }

    #[test]
    fn picks_cheapest_without_special_clauses() {
        let index = vec![trip(3, 1500), trip(5, 1000)];
        let selection = selector().select(&QueryConstraint::new(), &index);
        assert_eq!(costs(&selection), vec![1000]);
        assert_eq!(selection.message, None);
    }

    #[test]
    fn ceiling_met_returns_nearest_under_it() {
        let index = vec![trip(3, 1500), trip(5, 1000)];
        let constraint = QueryConstraint::new()
            .with_direction(Direction::default())
            .with_total_cost(1200);
        let selection = selector().select(&constraint, &index);
        assert_eq!(costs(&selection), vec![1000]);
        assert_eq!(selection.message, None);
    }

    #[test]
    fn ceiling_prefers_earliest_date_over_price() {
        let index = vec![trip(7, 900), trip(2, 1100), trip(4, 1150)];
        let selection = selector().select(&QueryConstraint::new().with_total_cost(1200), &index);
        assert_eq!(selection.results[0].outbound_date(), day(2));
    }

    #[test]
    fn ceiling_missed_falls_back_to_cheapest() {
        let index = vec![trip(3, 1500), trip(5, 1000)];
        let selection = selector().select(&QueryConstraint::new().with_total_cost(900), &index);
        assert_eq!(costs(&selection), vec![1000]);
        assert_eq!(
            selection.message,
            Some(SelectionMessage::NothingUnderPrice { ceiling: 900 })
        );
    }

    #[test]
    fn filters_by_direction_and_band() {
        let to_spb = Direction::towards(City::SaintPetersburg);
        let index = vec![
            trip(3, 1000),
            trip_on(to_spb, 4, 8, 800),
            trip_on(Direction::default(), 5, 14, 1200),
        ];

        let selection = selector().select(&QueryConstraint::new().with_direction(to_spb), &index);
        assert_eq!(costs(&selection), vec![800]);

        let daytime = QueryConstraint::new().with_band(TimeBand::Daytime);
        assert_eq!(costs(&selector().select(&daytime, &index)), vec![1200]);
    }

    #[test]
    fn more_skips_cheapest_and_pages() {
        let index: Vec<RoundTrip> = (0..9).map(|i| trip(i, 1000 + 100 * i as u32)).collect();
        let s = selector();

        let first = s.select(&QueryConstraint::new().with_more(0), &index);
        assert_eq!(costs(&first), vec![1100, 1200, 1300, 1400, 1500]);
        assert_eq!(first.message, Some(SelectionMessage::MoreTickets));

        let second = s.select(&QueryConstraint::new().with_more(1), &index);
        assert_eq!(costs(&second), vec![1600, 1700, 1800]);

        let third = s.select(&QueryConstraint::new().with_more(2), &index);
        assert!(third.results.is_empty());
        assert_eq!(third.message, Some(SelectionMessage::NoMoreTickets));
    }

    #[test]
    fn more_orders_equal_costs_by_departure() {
        let index = vec![trip(5, 1000), trip(2, 1000), trip(9, 1000)];
        let selection = selector().select(&QueryConstraint::new().with_more(0), &index);
        let dates: Vec<_> = selection.results.iter().map(RoundTrip::outbound_date).collect();
        assert_eq!(dates, vec![day(5), day(9)]);
    }

    #[test]
    fn more_messages_by_count() {
        let index = vec![trip(1, 1000), trip(2, 1100)];
        let selection = selector().select(&QueryConstraint::new().with_more(0), &index);
        assert_eq!(costs(&selection), vec![1100]);
        assert_eq!(selection.message, Some(SelectionMessage::LastPair));

        let on_date = QueryConstraint::new().with_date(day(1)).with_more(0);
        let selection = selector().select(&on_date, &index);
        assert!(selection.results.is_empty());
        assert_eq!(selection.message, Some(SelectionMessage::OnePairPerDay));
    }

    #[test]
    fn empty_month_inside_and_beyond_window() {
        // Window is March 1st to April 29th.
        let index = vec![trip(3, 1000)];
        let s = selector();

        let april = s.select(&QueryConstraint::new().with_month(4), &index);
        assert!(april.results.is_empty());
        assert_eq!(april.message, Some(SelectionMessage::NoTicketsInMonth { month: 4 }));

        let may = s.select(&QueryConstraint::new().with_month(5), &index);
        assert_eq!(
            may.message,
            Some(SelectionMessage::MonthBeyondWindow {
                month: 5,
                window_days: 60
            })
        );

        let march = s.select(&QueryConstraint::new().with_month(3), &index);
        assert_eq!(costs(&march), vec![1000]);
        assert_eq!(march.message, None);
    }

    #[test]
    fn empty_date_inside_and_beyond_window() {
        let index = vec![trip(3, 1000)];
        let s = selector();

        let inside = s.select(&QueryConstraint::new().with_date(day(10)), &index);
        assert_eq!(
            inside.message,
            Some(SelectionMessage::NoTicketsOnDate { date: day(10) })
        );

        let beyond = s.select(&QueryConstraint::new().with_date(day(60)), &index);
        assert_eq!(
            beyond.message,
            Some(SelectionMessage::DateBeyondWindow {
                date: day(60),
                window_days: 60
            })
        );

        let past = today().pred_opt().unwrap();
        assert!(!s.date_in_window(past));
    }

    #[test]
    fn empty_index_is_explained() {
        let selection = selector().select(&QueryConstraint::new(), &[]);
        assert!(selection.results.is_empty());
        assert_eq!(selection.message, Some(SelectionMessage::NoMatchingTickets));
    }

    #[test]
    fn unmatched_band_or_weekday_is_explained() {
        // Every trip leaves on a weekday morning.
        let index = vec![trip(3, 1000), trip(4, 1200)];
        let s = selector();

        let daytime = s.select(&QueryConstraint::new().with_band(TimeBand::Daytime), &index);
        assert!(daytime.results.is_empty());
        assert_eq!(daytime.message, Some(SelectionMessage::NoMatchingTickets));

        let weekend = s.select(
            &QueryConstraint::new().with_weekday(WeekdayClass::Weekend),
            &index,
        );
        assert!(weekend.results.is_empty());
        assert_eq!(weekend.message, Some(SelectionMessage::NoMatchingTickets));
    }

    #[test]
    fn ceiling_over_nothing_is_explained() {
        let selection = selector().select(&QueryConstraint::new().with_total_cost(900), &[]);
        assert!(selection.results.is_empty());
        assert!(selection.message.is_some());
    }

    fn arb_index() -> impl Strategy<Value = Vec<RoundTrip>> {
        prop::collection::vec((0u64..20, 0u32..17, 2u32..60), 0..40).prop_map(|specs| {
            specs
                .into_iter()
                .map(|(offset, hour, hundreds)| {
                    trip_on(Direction::default(), offset, hour, hundreds * 100)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn select_is_idempotent(
            index in arb_index(),
            ceiling in prop::option::of(500u32..6000),
            more in any::<bool>(),
            segment in 0usize..4,
        ) {
            let mut constraint = QueryConstraint::new();
            constraint.total_cost = ceiling;
            constraint.more = more;
            constraint.segment = segment;

            let s = selector();
            prop_assert_eq!(s.select(&constraint, &index), s.select(&constraint, &index));
        }

        #[test]
        fn pages_are_contiguous_and_disjoint(index in arb_index(), segment in 0usize..5) {
            let s = selector();
            let page_size = s.config().page_size;

            let query = QueryConstraint::new();
            let mut sorted: Vec<&RoundTrip> = index.iter().filter(|t| query.matches(t)).collect();
            sorted.sort_by(|a, b| paging_order(a, b));
            let rest: Vec<RoundTrip> = sorted.into_iter().skip(1).cloned().collect();

            let this = s.select(&QueryConstraint::new().with_more(segment), &index).results;
            let next = s.select(&QueryConstraint::new().with_more(segment + 1), &index).results;

            let start = (segment * page_size).min(rest.len());
            let end = ((segment + 2) * page_size).min(rest.len());
            let joined: Vec<RoundTrip> = this.into_iter().chain(next).collect();
            prop_assert_eq!(joined, rest[start..end].to_vec());
        }
    }
}
