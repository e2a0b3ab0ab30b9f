//! Collector configuration.

use std::ops::Range;
use std::time::Duration;

use crate::config::ConfigError;
use crate::domain::{Direction, UPSTREAM_UTC_OFFSET_SECS};
use crate::filter::HIGH_SPEED_BRAND;

/// Shortest allowed pause between two collection runs.
pub const MIN_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Configuration parameters for fare collection.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Days ahead the upstream service accepts queries for.
    pub window_days: u32,

    /// Maximum per-day requests in flight; also the size of one portion.
    pub portion_size: usize,

    /// Wait between acquiring credentials and using them.
    /// The upstream session is not usable immediately.
    pub settle_delay: Duration,

    /// Listing attempts per day before giving up on a stale token.
    pub max_attempts: u32,

    /// Runs with fewer fares than this are discarded.
    pub min_fare_count: usize,

    /// Only fares of this brand are kept.
    pub brand: String,

    /// Direction queried; the listing returns its reverse as well.
    pub direction: Direction,

    /// Pause between scheduled runs.
    pub interval: Duration,

    /// UTC offset the window's first day is taken in.
    pub utc_offset_secs: i32,
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self {
            window_days: 60,
            portion_size: 30,
            settle_delay: Duration::from_secs(10),
            max_attempts: 5,
            min_fare_count: 100,
            brand: HIGH_SPEED_BRAND.to_string(),
            direction: Direction::default(),
            interval: Duration::from_secs(20 * 60),
            utc_offset_secs: UPSTREAM_UTC_OFFSET_SECS,
        }
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_portion_size(mut self, n: usize) -> Self {
        self.portion_size = n;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn with_min_fare_count(mut self, n: usize) -> Self {
        self.min_fare_count = n;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Check the values that would make a run misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::invalid("window_days", "must be at least 1"));
        }
        if self.portion_size == 0 {
            return Err(ConfigError::invalid("portion_size", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts", "must be at least 1"));
        }
        if self.interval < MIN_INTERVAL {
            return Err(ConfigError::invalid(
                "interval",
                format!("must be at least {} minutes", MIN_INTERVAL.as_secs() / 60),
            ));
        }
        Ok(())
    }

    /// Day-offset ranges of each portion, covering the window in order.
    pub fn portions(&self) -> Vec<Range<u32>> {
        portions(self.window_days, self.portion_size)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `window_days` into consecutive ranges of at most `portion_size` days.
pub fn portions(window_days: u32, portion_size: usize) -> Vec<Range<u32>> {
    let size = u32::try_from(portion_size.max(1)).unwrap_or(u32::MAX);
    (0..window_days)
        .step_by(size as usize)
        .map(|start| start..(start.saturating_add(size)).min(window_days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CollectorConfig::default();

        assert_eq!(config.window_days, 60);
        assert_eq!(config.portion_size, 30);
        assert_eq!(config.settle_delay, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.brand, "САПСАН");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn portions_cover_window_exactly() {
        assert_eq!(portions(60, 30), vec![0..30, 30..60]);
        assert_eq!(portions(65, 30), vec![0..30, 30..60, 60..65]);
        assert_eq!(portions(10, 30), vec![0..10]);
        assert!(portions(0, 30).is_empty());
    }

    #[test]
    fn rejects_short_interval() {
        let config = CollectorConfig::default().with_interval(Duration::from_secs(60));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn rejects_zero_attempts() {
        let config = CollectorConfig::default().with_max_attempts(0);
        assert!(config.validate().is_err());
    }
}
