//! Ingestion runs.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::domain::{RawFare, local_date};
use crate::indexer::{IndexError, build_index};
use crate::serving::RoundTripIndex;
use crate::store::{DocumentStore, FARES, ROUND_TRIPS, Settings, StoreError, load_all, replace_all};
use crate::upstream::FareSource;

use super::config::CollectorConfig;
use super::fetcher::Fetcher;

/// Error that ends an ingestion run.
///
/// None of these leave a partially written round-trip index behind.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Too few fares came back to trust the run.
    #[error("collected {count} fares, below the threshold of {threshold}")]
    InsufficientFareCount { count: usize, threshold: usize },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub fares: usize,
    pub failed_days: usize,
    pub round_trips: usize,
    pub collected_at: DateTime<Utc>,
}

/// Runs collections against a fare source and publishes the results.
pub struct Collector<S, D> {
    source: S,
    store: Arc<D>,
    config: CollectorConfig,
    index: RoundTripIndex,
}

impl<S, D> Collector<S, D>
where
    S: FareSource + Sync,
    D: DocumentStore,
{
    pub fn new(source: S, store: Arc<D>, config: CollectorConfig, index: RoundTripIndex) -> Self {
        Self {
            source,
            store,
            config,
            index,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Fetch the window starting at `today` and publish the result.
    ///
    /// The raw fares are replaced only once the run clears the fare-count
    /// threshold; the round-trip index only once it has been built.
    pub async fn run_once(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<RunReport, CollectError> {
        info!(%today, window_days = self.config.window_days, "starting collection run");

        let fetcher = Fetcher::new(&self.source, &self.config);
        let window = fetcher.fetch_window(self.config.direction, today).await;

        let failed_days = window.failures().count();
        let count = window.fare_count();
        if count < self.config.min_fare_count {
            return Err(CollectError::InsufficientFareCount {
                count,
                threshold: self.config.min_fare_count,
            });
        }

        let mut fares = window.into_fares();
        for (id, fare) in (1..).zip(fares.iter_mut()) {
            fare.id = Some(id);
            fare.collected_at = Some(now);
        }
        replace_all(self.store.as_ref(), FARES, &fares)?;

        let round_trips = self.publish(&fares, now).await?;

        Ok(RunReport {
            fares: fares.len(),
            failed_days,
            round_trips,
            collected_at: now,
        })
    }

    /// Rebuild the round-trip index from the stored raw fares.
    pub async fn reindex(&self, now: DateTime<Utc>) -> Result<usize, CollectError> {
        let fares: Vec<RawFare> = load_all(self.store.as_ref(), FARES)?;
        let collected_at = fares
            .iter()
            .filter_map(|f| f.collected_at)
            .max()
            .unwrap_or(now);

        let round_trips = self.publish(&fares, collected_at).await?;
        info!(fares = fares.len(), round_trips, "reindexed stored fares");
        Ok(round_trips)
    }

    /// Window dates with no stored raw fare.
    pub fn check_integrity(&self, today: NaiveDate) -> Result<Vec<NaiveDate>, CollectError> {
        let fares: Vec<RawFare> = load_all(self.store.as_ref(), FARES)?;
        let present: BTreeSet<NaiveDate> = fares.iter().map(RawFare::date).collect();

        let missing: Vec<NaiveDate> = (0..self.config.window_days)
            .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
            .filter(|date| !present.contains(date))
            .collect();

        if missing.is_empty() {
            info!(%today, "stored fares cover the whole window");
        } else {
            warn!(%today, missing = missing.len(), "stored fares have gaps");
        }
        Ok(missing)
    }

    /// Run collections forever, one at a time, every `interval`.
    ///
    /// The first run starts immediately. A run that overlaps the next tick
    /// delays it rather than running twice in a row.
    pub async fn run_forever(&self) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let now = Utc::now();
            let today = local_date(now, self.config.utc_offset_secs);

            match self.run_once(today, now).await {
                Ok(report) => info!(
                    fares = report.fares,
                    failed_days = report.failed_days,
                    round_trips = report.round_trips,
                    "collection run finished"
                ),
                Err(e @ CollectError::Store(_)) => error!(error = %e, "collection run failed"),
                Err(e) => warn!(error = %e, "collection run discarded"),
            }
        }
    }

    async fn publish(
        &self,
        fares: &[RawFare],
        collected_at: DateTime<Utc>,
    ) -> Result<usize, CollectError> {
        let trips = build_index(fares)?;
        replace_all(self.store.as_ref(), ROUND_TRIPS, &trips)?;
        Settings {
            last_collected_at: Some(collected_at),
        }
        .save(self.store.as_ref())?;

        let count = trips.len();
        self.index.replace(trips, collected_at).await;
        Ok(count)
    }
}
