//! Query constraints over the round-trip index.

use chrono::NaiveDate;

use crate::domain::{Direction, RoundTrip, TimeBand, WeekdayClass};

/// Calendar restriction of a query. A month and a specific date exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Calendar month (1-12) of the outbound leg.
    Month(u32),
    /// Exact outbound date.
    Date(NaiveDate),
}

/// A fully resolved query.
///
/// Unset clauses match everything. Accumulating constraints over a
/// conversation is the caller's business; the engine only sees the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConstraint {
    /// Outbound direction; the default direction when unset.
    pub direction: Option<Direction>,
    /// Band of the outbound leg.
    pub band: Option<TimeBand>,
    pub weekday: Option<WeekdayClass>,
    /// Price ceiling for the whole round trip.
    pub total_cost: Option<u32>,
    pub period: Option<Period>,
    /// Page index of "more" results.
    pub segment: usize,
    /// Ask for further results beyond the cheapest one.
    pub more: bool,
    /// Include early-morning outbound trips. They are left out unless asked
    /// for, or unless a band is set.
    pub early_morning: bool,
}

impl QueryConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_band(mut self, band: TimeBand) -> Self {
        self.band = Some(band);
        self
    }

    pub fn with_weekday(mut self, weekday: WeekdayClass) -> Self {
        self.weekday = Some(weekday);
        self
    }

    pub fn with_total_cost(mut self, ceiling: u32) -> Self {
        self.total_cost = Some(ceiling);
        self
    }

    /// Restrict to a month, clearing any specific date.
    pub fn with_month(mut self, month: u32) -> Self {
        self.period = Some(Period::Month(month));
        self
    }

    /// Restrict to a specific date, clearing any month.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.period = Some(Period::Date(date));
        self
    }

    /// Request page `segment` of the further results.
    pub fn with_more(mut self, segment: usize) -> Self {
        self.more = true;
        self.segment = segment;
        self
    }

    pub fn with_early_morning(mut self, allowed: bool) -> Self {
        self.early_morning = allowed;
        self
    }

    /// The direction this query asks about.
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    pub fn month(&self) -> Option<u32> {
        match self.period {
            Some(Period::Month(m)) => Some(m),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self.period {
            Some(Period::Date(d)) => Some(d),
            _ => None,
        }
    }

    /// Whether `trip` satisfies every filtering clause.
    ///
    /// The price ceiling and pagination clauses are selection policy, not
    /// filters, and are not checked here.
    pub fn matches(&self, trip: &RoundTrip) -> bool {
        if trip.direction() != self.direction() {
            return false;
        }
        match self.band {
            Some(band) if trip.band() != band => return false,
            None if !self.early_morning && trip.band() == TimeBand::EarlyMorning => {
                return false;
            }
            _ => {}
        }
        if let Some(weekday) = self.weekday
            && trip.weekday() != weekday
        {
            return false;
        }
        match self.period {
            Some(Period::Month(m)) => trip.month() == m,
            Some(Period::Date(d)) => trip.outbound_date() == d,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, IndexedFareEntry, RawFare};
    use chrono::{Days, NaiveTime};

    fn trip(direction: Direction, date: NaiveDate, hour: u32) -> RoundTrip {
        let leg = |direction: Direction, date: NaiveDate, hour: u32| {
            let fare = RawFare::new(
                direction.from().name(),
                direction.to().name(),
                date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
                "САПСАН",
                1000,
            );
            IndexedFareEntry::from_fare(direction, fare.time_band(), &fare)
        };
        let next = date.checked_add_days(Days::new(1)).unwrap();
        RoundTrip::pair(leg(direction, date, hour), leg(direction.reverse(), next, 19)).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn empty_constraint_uses_default_direction() {
        let to_mow = trip(Direction::towards(City::Moscow), date(15), 8);
        let to_spb = trip(Direction::towards(City::SaintPetersburg), date(15), 8);
        let c = QueryConstraint::new();
        assert!(c.matches(&to_mow));
        assert!(!c.matches(&to_spb));
        assert!(
            c.clone()
                .with_direction(Direction::towards(City::SaintPetersburg))
                .matches(&to_spb)
        );
    }

    #[test]
    fn month_and_date_exclude_each_other() {
        let c = QueryConstraint::new().with_month(3).with_date(date(15));
        assert_eq!(c.month(), None);
        assert_eq!(c.date(), Some(date(15)));

        let c = c.with_month(4);
        assert_eq!(c.month(), Some(4));
        assert_eq!(c.date(), None);
    }

    #[test]
    fn calendar_clauses() {
        // 16.03.2024 is a Saturday
        let saturday = trip(Direction::default(), date(16), 9);
        assert!(QueryConstraint::new().with_month(3).matches(&saturday));
        assert!(!QueryConstraint::new().with_month(4).matches(&saturday));
        assert!(QueryConstraint::new().with_date(date(16)).matches(&saturday));
        assert!(!QueryConstraint::new().with_date(date(17)).matches(&saturday));
        assert!(
            QueryConstraint::new()
                .with_weekday(WeekdayClass::Weekend)
                .matches(&saturday)
        );
        assert!(
            !QueryConstraint::new()
                .with_weekday(WeekdayClass::Weekday)
                .matches(&saturday)
        );
    }

    #[test]
    fn early_morning_left_out_unless_asked_for() {
        let early = trip(Direction::default(), date(15), 5);
        let morning = trip(Direction::default(), date(15), 8);

        let default = QueryConstraint::new();
        assert!(!default.matches(&early));
        assert!(default.matches(&morning));

        assert!(QueryConstraint::new().with_early_morning(true).matches(&early));

        // An explicit band wins over the default.
        assert!(default.with_band(TimeBand::EarlyMorning).matches(&early));
    }
}
