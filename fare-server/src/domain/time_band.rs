//! Departure-hour bands.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown band name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time band: {name}")]
pub struct InvalidTimeBand {
    name: String,
}

/// A named bucket of departure hours.
///
/// Each band maps to a half-open clock-hour interval. The intervals do not
/// overlap and together cover the whole day, so every departure hour belongs
/// to exactly one band.
///
/// # Examples
///
/// ```
/// use fare_server::domain::TimeBand;
///
/// assert_eq!(TimeBand::for_hour(6), TimeBand::EarlyMorning);
/// assert_eq!(TimeBand::for_hour(7), TimeBand::Morning);
/// assert_eq!(TimeBand::for_hour(23), TimeBand::Evening);
/// assert!(TimeBand::Daytime.contains_hour(12));
/// assert!(!TimeBand::Daytime.contains_hour(17));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeBand {
    EarlyMorning,
    Morning,
    Daytime,
    Evening,
}

impl TimeBand {
    pub const ALL: [TimeBand; 4] = [
        TimeBand::EarlyMorning,
        TimeBand::Morning,
        TimeBand::Daytime,
        TimeBand::Evening,
    ];

    /// Half-open hour interval `[start, end)`.
    pub fn hours(&self) -> Range<u32> {
        match self {
            TimeBand::EarlyMorning => 0..7,
            TimeBand::Morning => 7..12,
            TimeBand::Daytime => 12..17,
            TimeBand::Evening => 17..24,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.hours().contains(&hour)
    }

    /// The band an hour (0-23) falls into. Hours past 23 count as evening.
    pub fn for_hour(hour: u32) -> TimeBand {
        Self::ALL
            .into_iter()
            .find(|b| b.contains_hour(hour))
            .unwrap_or(TimeBand::Evening)
    }

    /// Whether a leg departing in this band can start a round trip.
    pub fn is_outbound(&self) -> bool {
        !matches!(self, TimeBand::Evening)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBand::EarlyMorning => "early-morning",
            TimeBand::Morning => "morning",
            TimeBand::Daytime => "daytime",
            TimeBand::Evening => "evening",
        }
    }
}

impl FromStr for TimeBand {
    type Err = InvalidTimeBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| InvalidTimeBand {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_the_day() {
        for hour in 0..24 {
            let owners = TimeBand::ALL
                .iter()
                .filter(|b| b.contains_hour(hour))
                .count();
            assert_eq!(owners, 1, "hour {hour} belongs to {owners} bands");
        }
    }

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(TimeBand::for_hour(11), TimeBand::Morning);
        assert_eq!(TimeBand::for_hour(12), TimeBand::Daytime);
        assert_eq!(TimeBand::for_hour(16), TimeBand::Daytime);
        assert_eq!(TimeBand::for_hour(17), TimeBand::Evening);
    }

    #[test]
    fn only_evening_is_a_return_band() {
        assert!(TimeBand::EarlyMorning.is_outbound());
        assert!(TimeBand::Morning.is_outbound());
        assert!(TimeBand::Daytime.is_outbound());
        assert!(!TimeBand::Evening.is_outbound());
    }

    #[test]
    fn parse_and_display() {
        for band in TimeBand::ALL {
            assert_eq!(band.to_string().parse::<TimeBand>().unwrap(), band);
        }
        assert!("night".parse::<TimeBand>().is_err());
    }

    #[test]
    fn serde_kebab_case() {
        let json = serde_json::to_string(&TimeBand::EarlyMorning).unwrap();
        assert_eq!(json, "\"early-morning\"");
    }
}
