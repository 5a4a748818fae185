//! Durable record of already-announced vessels.
//!
//! [`SightingStore`] keeps an in-memory map of `mmsi -> last_seen` in front
//! of a [`SeenVesselBackend`]. Membership tests only touch memory; every
//! mutation goes to both. The map is guarded by a single async mutex held
//! across the backend write, so the "is it known? then record it" step of
//! two concurrent poll cycles can never interleave. The backend upsert also
//! reports whether it created the row, which keeps processes sharing one
//! table from announcing the same arrival twice.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::errors::AisWatchError;
use crate::models::{Mmsi, SeenVessel};

/// Persistence collaborator for seen vessels.
///
/// Implementations must upsert atomically, keep the later of two timestamps
/// for the same MMSI, and tell whether the row was new.
#[async_trait]
pub trait SeenVesselBackend: Send + Sync {
    /// Every persisted row
    async fn load_all(&self) -> Result<Vec<SeenVessel>, AisWatchError>;

    /// Insert the row, or move `last_seen` forward if it exists. Returns
    /// true when the row was inserted.
    async fn upsert(&self, mmsi: Mmsi, at: DateTime<Utc>) -> Result<bool, AisWatchError>;

    /// Delete rows with `last_seen` before `cutoff`, returning how many went
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AisWatchError>;

    /// Delete every row, returning how many went
    async fn delete_all(&self) -> Result<u64, AisWatchError>;

    async fn count(&self) -> Result<i64, AisWatchError>;
}

/// Backend that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: Mutex<BTreeMap<Mmsi, DateTime<Utc>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeenVesselBackend for MemoryBackend {
    async fn load_all(&self) -> Result<Vec<SeenVessel>, AisWatchError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .map(|(&mmsi, &last_seen)| SeenVessel { mmsi, last_seen })
            .collect())
    }

    async fn upsert(&self, mmsi: Mmsi, at: DateTime<Utc>) -> Result<bool, AisWatchError> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&mmsi) {
            Some(seen) => {
                *seen = (*seen).max(at);
                Ok(false)
            }
            None => {
                rows.insert(mmsi, at);
                Ok(true)
            }
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AisWatchError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|_, seen| *seen >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all(&self) -> Result<u64, AisWatchError> {
        let mut rows = self.rows.lock().await;
        let deleted = rows.len() as u64;
        rows.clear();
        Ok(deleted)
    }

    async fn count(&self) -> Result<i64, AisWatchError> {
        Ok(self.rows.lock().await.len() as i64)
    }
}

/// Known vessels, cached in memory and persisted through a backend
pub struct SightingStore {
    backend: Arc<dyn SeenVesselBackend>,
    known: Mutex<HashMap<Mmsi, DateTime<Utc>>>,
}

impl SightingStore {
    /// Open the store and rehydrate the cache from the backend.
    ///
    /// A backend failure here is logged and the store starts empty.
    pub async fn open(backend: Arc<dyn SeenVesselBackend>) -> Self {
        let known = match backend.load_all().await {
            Ok(rows) => rows
                .into_iter()
                .map(|row| (row.mmsi, row.last_seen))
                .collect::<HashMap<_, _>>(),
            Err(e) => {
                error!("Failed to load seen vessels, starting empty: {}", e);
                HashMap::new()
            }
        };
        info!("Sighting store opened with {} known vessels", known.len());

        Self {
            backend,
            known: Mutex::new(known),
        }
    }

    /// Whether the vessel is currently known
    pub async fn is_known(&self, mmsi: Mmsi) -> bool {
        self.known.lock().await.contains_key(&mmsi)
    }

    /// Upsert the vessel's `last_seen`.
    ///
    /// The cache is updated even when persisting fails.
    pub async fn record(&self, mmsi: Mmsi, at: DateTime<Utc>) -> Result<(), AisWatchError> {
        let mut known = self.known.lock().await;
        Self::remember(&mut known, mmsi, at);
        self.backend.upsert(mmsi, at).await.map(|_| ())
    }

    /// Check-and-record as one step: refresh the vessel's `last_seen` and
    /// report whether it was unknown before this call.
    ///
    /// A vessel arrives only when both the cache and the backend saw it for
    /// the first time. Persistence failures are logged, not returned, and
    /// the cache alone decides.
    pub async fn observe(&self, mmsi: Mmsi, at: DateTime<Utc>) -> bool {
        let mut known = self.known.lock().await;
        let unknown = !known.contains_key(&mmsi);
        Self::remember(&mut known, mmsi, at);

        match self.backend.upsert(mmsi, at).await {
            Ok(inserted) => {
                if unknown && !inserted {
                    debug!("MMSI {} was already recorded by another store", mmsi);
                }
                unknown && inserted
            }
            Err(e) => {
                error!("Failed to persist sighting of MMSI {}: {}", mmsi, e);
                unknown
            }
        }
    }

    /// Forget every vessel last seen before `cutoff`, so its next sighting
    /// counts as a new arrival.
    ///
    /// Returns the number of persisted rows deleted. The cache is pruned
    /// even when the backend fails.
    pub async fn evict_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AisWatchError> {
        let mut known = self.known.lock().await;
        let before = known.len();
        known.retain(|_, seen| *seen >= cutoff);
        let forgotten = before - known.len();
        if forgotten > 0 {
            info!("Evicted {} vessels last seen before {}", forgotten, cutoff);
        }

        self.backend.delete_older_than(cutoff).await
    }

    /// Delete every record and empty the cache
    pub async fn clear_all(&self) -> Result<u64, AisWatchError> {
        let mut known = self.known.lock().await;
        let deleted = self.backend.delete_all().await?;
        known.clear();
        warn!("Cleared all sighting state ({} rows)", deleted);
        Ok(deleted)
    }

    /// Number of persisted rows
    pub async fn count(&self) -> Result<i64, AisWatchError> {
        self.backend.count().await
    }

    /// Persisted rows, ordered by MMSI
    pub async fn rows(&self) -> Result<Vec<SeenVessel>, AisWatchError> {
        let mut rows = self.backend.load_all().await?;
        rows.sort_by_key(|row| row.mmsi);
        Ok(rows)
    }

    fn remember(known: &mut HashMap<Mmsi, DateTime<Utc>>, mmsi: Mmsi, at: DateTime<Utc>) {
        known
            .entry(mmsi)
            .and_modify(|seen| *seen = (*seen).max(at))
            .or_insert(at);
    }
}
