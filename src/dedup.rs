//! Picks out the vessels that arrived since the last poll.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{IgnoreList, VesselSighting};
use crate::store::SightingStore;

/// Partitions sightings into new arrivals and already-known vessels
pub struct DeduplicationEngine {
    store: Arc<SightingStore>,
}

impl DeduplicationEngine {
    pub fn new(store: Arc<SightingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<SightingStore> {
        &self.store
    }

    /// Return the sightings of vessels not known before this call, in input
    /// order.
    ///
    /// Every sighting with a usable MMSI refreshes that vessel's `last_seen`,
    /// one vessel at a time. Sightings without a numeric MMSI are dropped.
    /// Ignored vessels are dropped without touching the store.
    pub async fn select_new(
        &self,
        sightings: Vec<VesselSighting>,
        ignore: &IgnoreList,
        now: DateTime<Utc>,
    ) -> Vec<VesselSighting> {
        let mut arrivals = Vec::new();

        for sighting in sightings {
            let mmsi = match sighting.mmsi.as_ref().map(|raw| raw.normalize()) {
                Some(Ok(mmsi)) => mmsi,
                Some(Err(e)) => {
                    warn!("Dropping sighting of {:?}: {}", sighting.name, e);
                    continue;
                }
                None => {
                    warn!("Dropping sighting of {:?}: missing MMSI", sighting.name);
                    continue;
                }
            };

            if ignore.matches(mmsi, sighting.name.as_deref()) {
                debug!("Ignoring MMSI {} ({:?})", mmsi, sighting.name);
                continue;
            }

            if self.store.observe(mmsi, now).await {
                debug!("New arrival: MMSI {} ({:?})", mmsi, sighting.name);
                arrivals.push(sighting);
            }
        }

        arrivals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IgnoredVessel, Mmsi, MmsiField};
    use crate::store::MemoryBackend;
    use chrono::{Duration, TimeZone};

    async fn engine() -> DeduplicationEngine {
        let store = SightingStore::open(Arc::new(MemoryBackend::new())).await;
        DeduplicationEngine::new(Arc::new(store))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn sighting(mmsi: u64, name: &str) -> VesselSighting {
        VesselSighting::new(MmsiField::Number(mmsi), Some(name))
    }

    #[tokio::test]
    async fn second_call_returns_nothing() {
        let engine = engine().await;
        let batch = vec![sighting(123, "Test"), sighting(257_000_001, "Veøy")];

        let first = engine
            .select_new(batch.clone(), &IgnoreList::default(), now())
            .await;
        let second = engine
            .select_new(batch, &IgnoreList::default(), now())
            .await;

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name.as_deref(), Some("Test"));
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn duplicate_in_one_batch_counts_once() {
        let engine = engine().await;
        let batch = vec![sighting(123, "Test"), sighting(123, "Test")];

        let arrivals = engine
            .select_new(batch, &IgnoreList::default(), now())
            .await;
        assert_eq!(arrivals.len(), 1);
    }

    #[tokio::test]
    async fn drops_unusable_identifiers() {
        let engine = engine().await;
        let mut missing = sighting(0, "Nameless");
        missing.mmsi = None;
        let batch = vec![
            missing,
            VesselSighting::new(MmsiField::Text("not-a-number".to_string()), Some("Bad")),
            VesselSighting::new(MmsiField::Text("257000002".to_string()), Some("Good")),
        ];

        let arrivals = engine
            .select_new(batch, &IgnoreList::default(), now())
            .await;

        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].name.as_deref(), Some("Good"));
        assert_eq!(engine.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ignored_vessels_never_touch_the_store() {
        let engine = engine().await;
        let ignore = IgnoreList::new(vec![IgnoredVessel {
            name: Some("Amanda".to_string()),
            mmsi: Some(259_032_810),
        }]);

        let arrivals = engine
            .select_new(vec![sighting(259_032_810, "Amanda")], &ignore, now())
            .await;

        assert!(arrivals.is_empty());
        assert_eq!(engine.store().count().await.unwrap(), 0);
        let amanda = Mmsi::try_from(259_032_810u32).unwrap();
        assert!(!engine.store().is_known(amanda).await);
    }

    #[tokio::test]
    async fn known_vessel_refreshes_recency() {
        let engine = engine().await;
        let batch = vec![sighting(123, "Test")];

        engine
            .select_new(batch.clone(), &IgnoreList::default(), now())
            .await;
        // Seen again 20 hours later: still suppressed, but last_seen moves on
        let later = now() + Duration::hours(20);
        assert!(engine
            .select_new(batch.clone(), &IgnoreList::default(), later)
            .await
            .is_empty());

        // A cutoff between the first sighting and the refresh keeps it
        engine
            .store()
            .evict_older_than(now() + Duration::hours(1))
            .await
            .unwrap();
        assert!(engine
            .select_new(batch, &IgnoreList::default(), later)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn evicted_vessel_arrives_again() {
        let engine = engine().await;
        let batch = vec![sighting(999, "Persist")];
        let retention = Duration::hours(24);

        engine
            .select_new(batch.clone(), &IgnoreList::default(), now())
            .await;
        engine
            .store()
            .evict_older_than(now() + retention + Duration::seconds(1))
            .await
            .unwrap();

        let again = engine
            .select_new(batch, &IgnoreList::default(), now() + Duration::hours(30))
            .await;
        assert_eq!(again.len(), 1);
    }
}
