//! Rate-limited window fetcher.
//!
//! The lookup window is split into portions. Portions run strictly one after
//! another: every request of a portion must resolve before the next portion
//! starts. Days inside a portion are fetched concurrently.

use chrono::{Days, NaiveDate};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{Direction, RawFare};
use crate::filter::{FarePredicate, filter_fares};
use crate::upstream::{FareSource, UpstreamError};

use super::config::CollectorConfig;

/// Error from fetching a single day.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Every attempt came back without fares.
    #[error("no fares for {date} after {attempts} attempts")]
    MaxAttemptsExceeded { date: NaiveDate, attempts: u32 },
}

/// Result of fetching one day.
#[derive(Debug)]
pub struct DayOutcome {
    pub date: NaiveDate,
    pub result: Result<Vec<RawFare>, FetchError>,
}

/// Results of fetching a whole window, in date order.
#[derive(Debug, Default)]
pub struct WindowFetch {
    pub days: Vec<DayOutcome>,
}

impl WindowFetch {
    /// All fetched fares, in date order.
    pub fn into_fares(self) -> Vec<RawFare> {
        self.days
            .into_iter()
            .filter_map(|d| d.result.ok())
            .flatten()
            .collect()
    }

    pub fn fare_count(&self) -> usize {
        self.days
            .iter()
            .filter_map(|d| d.result.as_ref().ok())
            .map(Vec::len)
            .sum()
    }

    /// Days that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (NaiveDate, &FetchError)> {
        self.days
            .iter()
            .filter_map(|d| d.result.as_ref().err().map(|e| (d.date, e)))
    }
}

/// Fetches fares from a source for one ingestion run.
pub struct Fetcher<'a, S: FareSource> {
    source: &'a S,
    config: &'a CollectorConfig,
}

impl<'a, S: FareSource> Fetcher<'a, S> {
    pub fn new(source: &'a S, config: &'a CollectorConfig) -> Self {
        Self { source, config }
    }

    /// Fetch one day, retrying while the token keeps coming back stale.
    ///
    /// An empty listing means the session went stale, not that no train runs:
    /// fresh credentials are acquired and the listing retried, up to
    /// `max_attempts` listings in total. Transport errors are not retried.
    pub async fn fetch_day(
        &self,
        direction: Direction,
        date: NaiveDate,
    ) -> Result<Vec<RawFare>, FetchError> {
        let brand = FarePredicate::any().with_brand(self.config.brand.as_str());

        for attempt in 1..=self.config.max_attempts {
            let credentials = self.source.acquire(direction, date).await?;

            if !self.config.settle_delay.is_zero() {
                tokio::time::sleep(self.config.settle_delay).await;
            }

            let fares = self.source.list(direction, date, &credentials).await?;
            if fares.is_empty() {
                warn!(%date, attempt, "listing came back empty, token probably stale");
                continue;
            }

            let total = fares.len();
            let relevant = filter_fares(fares, &brand);
            if relevant.is_empty() {
                debug!(%date, total, "all fares filtered out by brand");
            }
            debug!(%date, attempt, kept = relevant.len(), total, "fetched day");
            return Ok(relevant);
        }

        Err(FetchError::MaxAttemptsExceeded {
            date,
            attempts: self.config.max_attempts,
        })
    }

    /// Fetch a set of days concurrently and wait for all of them.
    pub async fn fetch_portion(&self, direction: Direction, dates: &[NaiveDate]) -> Vec<DayOutcome> {
        let futures = dates.iter().map(|&date| async move {
            DayOutcome {
                date,
                result: self.fetch_day(direction, date).await,
            }
        });

        join_all(futures).await
    }

    /// Fetch every day of the window starting at `start`, portion by portion.
    ///
    /// A failed day does not abort the window; its error is kept in the
    /// returned outcome and the caller decides what a partial result is worth.
    pub async fn fetch_window(&self, direction: Direction, start: NaiveDate) -> WindowFetch {
        let mut window = WindowFetch::default();

        for (i, portion) in self.config.portions().into_iter().enumerate() {
            let dates: Vec<NaiveDate> = portion
                .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
                .collect();

            let outcomes = self.fetch_portion(direction, &dates).await;

            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            for outcome in &outcomes {
                if let Err(e) = &outcome.result {
                    let unavailable = matches!(e, FetchError::Upstream(u) if u.is_unavailable());
                    warn!(date = %outcome.date, unavailable, error = %e, "day fetch failed");
                }
            }
            info!(
                portion = i,
                days = dates.len(),
                failed,
                "portion fetched"
            );

            window.days.extend(outcomes);
        }

        window
    }
}
