//! One poll of the monitored area.
//!
//! validate geometry → enforce max area → fetch sightings → deduplicate →
//! notify → evict stale vessels.
//!
//! Geometry and area errors are returned before anything is fetched. Fetch
//! and delivery failures are logged and reported in the [`PollReport`]; the
//! next scheduled cycle retries.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    barentswatch::VesselSource,
    config::MonitorConfig,
    dedup::DeduplicationEngine,
    errors::AisWatchError,
    formatter::NotificationFormatter,
    geometry::{self, ValidGeometry},
    models::{IgnoreList, VesselSighting},
    notifier::Notifier,
    store::SightingStore,
};

/// Limits and windows for a poll cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub max_area_km2: f64,
    /// How long a vessel stays known without being sighted
    pub retention: Duration,
    /// How far back to look for vessels in the area
    pub lookback: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_area_km2: 500.0,
            retention: Duration::hours(24),
            lookback: Duration::hours(1),
        }
    }
}

impl From<&MonitorConfig> for PollSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            max_area_km2: config.max_area_km2,
            retention: config.retention(),
            lookback: config.lookback(),
        }
    }
}

/// Outcome of a poll cycle that got past input validation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollReport {
    pub area_km2: f64,
    /// Sightings returned by the vessel source
    pub fetched: usize,
    /// Vessels that arrived in this cycle
    pub arrivals: usize,
    pub notified: usize,
    pub failed_notifications: usize,
    /// Persisted rows removed by eviction
    pub evicted: u64,
    /// Set when fetching failed and the cycle was cut short
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

/// Vessels currently inside an area
#[derive(Debug, Clone, Serialize)]
pub struct AreaSnapshot {
    pub area_km2: f64,
    pub sightings: Vec<VesselSighting>,
}

pub struct PollCycle {
    source: Arc<dyn VesselSource>,
    notifier: Arc<dyn Notifier>,
    engine: DeduplicationEngine,
    formatter: NotificationFormatter,
    ignore: IgnoreList,
    settings: PollSettings,
}

impl PollCycle {
    pub fn new(
        source: Arc<dyn VesselSource>,
        notifier: Arc<dyn Notifier>,
        engine: DeduplicationEngine,
        formatter: NotificationFormatter,
        ignore: IgnoreList,
        settings: PollSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            engine,
            formatter,
            ignore,
            settings,
        }
    }

    pub fn store(&self) -> &Arc<SightingStore> {
        self.engine.store()
    }

    /// Run one cycle now
    pub async fn run(&self, geometry: &Value) -> Result<PollReport, AisWatchError> {
        self.run_at(geometry, Utc::now()).await
    }

    /// Run one cycle as of `now`.
    ///
    /// Only input validation errors are returned.
    pub async fn run_at(
        &self,
        geometry: &Value,
        now: DateTime<Utc>,
    ) -> Result<PollReport, AisWatchError> {
        let (valid, area_km2) = self.validated_area(geometry)?;
        let mut report = PollReport {
            area_km2,
            ..Default::default()
        };

        let sightings = match self.fetch(&valid, now).await {
            Ok(sightings) => sightings,
            Err(e) => {
                error!("Vessel fetch failed, skipping this cycle: {}", e);
                report.upstream_error = Some(e.to_string());
                return Ok(report);
            }
        };
        report.fetched = sightings.len();

        let arrivals = self.engine.select_new(sightings, &self.ignore, now).await;
        report.arrivals = arrivals.len();

        for sighting in &arrivals {
            let text = self.formatter.format(sighting);
            match self.notifier.send(&text).await {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    error!(
                        "Failed to notify about MMSI {:?} ({:?}): {}",
                        sighting.mmsi, sighting.name, e
                    );
                    report.failed_notifications += 1;
                }
            }
        }

        let cutoff = now
            .checked_sub_signed(self.settings.retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match self.store().evict_older_than(cutoff).await {
            Ok(evicted) => report.evicted = evicted,
            Err(e) => error!("Failed to evict vessels seen before {}: {}", cutoff, e),
        }

        info!(
            "Poll cycle done: {} fetched, {} new, {} notified, {} evicted",
            report.fetched, report.arrivals, report.notified, report.evicted
        );
        Ok(report)
    }

    /// Fetch the vessels inside an area without deduplicating or notifying.
    ///
    /// Unlike [`PollCycle::run_at`], fetch errors are returned.
    pub async fn snapshot(
        &self,
        geometry: &Value,
        now: DateTime<Utc>,
    ) -> Result<AreaSnapshot, AisWatchError> {
        let (valid, area_km2) = self.validated_area(geometry)?;
        let sightings = self.fetch(&valid, now).await?;
        Ok(AreaSnapshot {
            area_km2,
            sightings,
        })
    }

    fn validated_area(&self, geometry: &Value) -> Result<(ValidGeometry, f64), AisWatchError> {
        let valid = geometry::validate(geometry)?;
        let area = geometry::enforce_max_area(&valid, self.settings.max_area_km2)?;
        Ok((valid, area))
    }

    async fn fetch(
        &self,
        geometry: &ValidGeometry,
        now: DateTime<Utc>,
    ) -> Result<Vec<VesselSighting>, AisWatchError> {
        let from = now
            .checked_sub_signed(self.settings.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mmsi = self
            .source
            .find_vessels(geometry.as_geojson(), from, now)
            .await?;
        self.source.fetch_details(&mmsi).await
    }
}
