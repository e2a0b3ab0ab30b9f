//! Selection configuration.

use crate::domain::UPSTREAM_UTC_OFFSET_SECS;

/// Configuration parameters for the selection engine.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Results per page of "more" results.
    pub page_size: usize,

    /// Days ahead the upstream service sells tickets for.
    pub window_days: u32,

    /// UTC offset "today" is taken in.
    pub utc_offset_secs: i32,
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self {
            page_size: 5,
            window_days: 60,
            utc_offset_secs: UPSTREAM_UTC_OFFSET_SECS,
        }
    }

    pub fn with_page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
