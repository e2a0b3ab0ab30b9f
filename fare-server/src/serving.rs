//! The round-trip index served to queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::RoundTrip;
use crate::store::{DocumentStore, ROUND_TRIPS, Settings, StoreError, load_all};

/// The last known-good round trips and when they were collected.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub trips: Arc<Vec<RoundTrip>>,
    pub last_collected_at: Option<DateTime<Utc>>,
}

impl IndexSnapshot {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Thread-safe handle to the serving index.
///
/// Readers take a snapshot and release the lock before selecting, so a swap
/// never waits for a query and a query always sees one consistent index.
#[derive(Debug, Clone, Default)]
pub struct RoundTripIndex {
    inner: Arc<RwLock<IndexSnapshot>>,
}

impl RoundTripIndex {
    pub fn new(trips: Vec<RoundTrip>, last_collected_at: Option<DateTime<Utc>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(IndexSnapshot {
                trips: Arc::new(trips),
                last_collected_at,
            })),
        }
    }

    /// Load the persisted round trips and collection time.
    pub fn load(store: &impl DocumentStore) -> Result<Self, StoreError> {
        let trips: Vec<RoundTrip> = load_all(store, ROUND_TRIPS)?;
        let settings = Settings::load(store)?;
        Ok(Self::new(trips, settings.last_collected_at))
    }

    pub async fn snapshot(&self) -> IndexSnapshot {
        self.inner.read().await.clone()
    }

    /// Swap in a freshly built index.
    pub async fn replace(&self, trips: Vec<RoundTrip>, collected_at: DateTime<Utc>) {
        let snapshot = IndexSnapshot {
            trips: Arc::new(trips),
            last_collected_at: Some(collected_at),
        };
        *self.inner.write().await = snapshot;
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, IndexedFareEntry, RawFare, parse_departure};
    use crate::store::{MemoryStore, replace_all};
    use chrono::TimeZone;

    fn trip() -> RoundTrip {
        let leg = |direction: Direction, date: &str, time: &str| {
            let fare = RawFare::new(
                direction.from().name(),
                direction.to().name(),
                parse_departure(date, time).unwrap(),
                "САПСАН",
                1000,
            );
            IndexedFareEntry::from_fare(direction, fare.time_band(), &fare)
        };
        let d = Direction::default();
        RoundTrip::pair(
            leg(d, "15.03.2024", "08:00"),
            leg(d.reverse(), "16.03.2024", "19:00"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn load_empty_store() {
        let index = RoundTripIndex::load(&MemoryStore::new()).unwrap();
        assert!(index.is_empty().await);
        assert_eq!(index.snapshot().await.last_collected_at, None);
    }

    #[tokio::test]
    async fn load_persisted_index() {
        let store = MemoryStore::new();
        replace_all(&store, ROUND_TRIPS, &[trip(), trip()]).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Settings {
            last_collected_at: Some(at),
        }
        .save(&store)
        .unwrap();

        let index = RoundTripIndex::load(&store).unwrap();
        let snapshot = index.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.last_collected_at, Some(at));
    }

    #[tokio::test]
    async fn snapshots_outlive_replacement() {
        let index = RoundTripIndex::new(vec![trip()], None);
        let before = index.snapshot().await;

        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        index.replace(vec![trip(), trip(), trip()], at).await;

        assert_eq!(before.len(), 1);
        assert_eq!(index.len().await, 3);
        assert_eq!(index.snapshot().await.last_collected_at, Some(at));
    }
}
