//! Fare collection.
//!
//! One run fetches every day of the lookup window, portion by portion, keeps
//! the high-speed fares, and republishes the round-trip index. Runs never
//! overlap and never replace a good index with a worse one.

mod config;
mod fetcher;
mod run;


pub use config::{CollectorConfig, MIN_INTERVAL, portions};
pub use fetcher::{DayOutcome, FetchError, Fetcher, WindowFetch};
pub use run::{CollectError, Collector, RunReport};
