//! Data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};

use crate::errors::AisWatchError;
use serde_helpers::*;

/// Maritime Mobile Service Identity (MMSI)
///
/// A unique nine-digit number for identifying vessels in AIS messages. The
/// first three digits are the Maritime Identification Digits (MID) of the
/// flag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct Mmsi(u32);

impl TryFrom<u32> for Mmsi {
    type Error = AisWatchError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > 999_999_999 {
            return Err(AisWatchError::InvalidMmsi(value.to_string()));
        }
        Ok(Self(value))
    }
}

impl TryFrom<u64> for Mmsi {
    type Error = AisWatchError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let narrowed =
            u32::try_from(value).map_err(|_| AisWatchError::InvalidMmsi(value.to_string()))?;
        Self::try_from(narrowed)
    }
}

impl TryFrom<i32> for Mmsi {
    type Error = AisWatchError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let unsigned =
            u32::try_from(value).map_err(|_| AisWatchError::InvalidMmsi(value.to_string()))?;
        Self::try_from(unsigned)
    }
}

impl TryFrom<&str> for Mmsi {
    type Error = AisWatchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|_| AisWatchError::InvalidMmsi(value.to_string()))?;
        Self::try_from(parsed)
    }
}

impl Mmsi {
    /// Get the raw MMSI value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Maritime Identification Digits: the first three digits of the
    /// decimal representation, or `None` for identifiers shorter than that.
    pub fn mid(&self) -> Option<u16> {
        let digits = self.0.to_string();
        digits.get(..3).and_then(|mid| mid.parse().ok())
    }
}

impl fmt::Display for Mmsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier as reported by the provider, before normalisation.
///
/// Providers and operators hand out MMSIs both as JSON numbers and as
/// strings; anything else is kept verbatim so a single bad record does not
/// fail the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MmsiField {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

impl MmsiField {
    /// Normalise to an [`Mmsi`]
    pub fn normalize(&self) -> Result<Mmsi, AisWatchError> {
        match self {
            MmsiField::Number(n) => Mmsi::try_from(*n),
            MmsiField::Text(s) => Mmsi::try_from(s.as_str()),
            MmsiField::Other(v) => Err(AisWatchError::InvalidMmsi(v.to_string())),
        }
    }
}

impl From<Mmsi> for MmsiField {
    fn from(mmsi: Mmsi) -> Self {
        MmsiField::Number(mmsi.value() as u64)
    }
}

/// Ship type as reported by the provider: an AIS type code, or occasionally
/// a free-text description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShipType {
    Code(i64),
    Text(String),
}

/// One reported position/metadata record for a vessel.
///
/// Produced by the vessel source for a single poll cycle and never persisted
/// as a whole. Fields other than `mmsi` that do not have the expected JSON
/// type read as absent.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VesselSighting {
    /// Raw identifier, normalised by the deduplication engine
    #[serde(default)]
    pub mmsi: Option<MmsiField>,
    /// Vessel name, None if empty
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub name: Option<String>,
    /// Latitude in WGS84 decimal degrees
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in WGS84 decimal degrees
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Time of the last received message
    #[serde(default, deserialize_with = "deserialize_lenient_datetime")]
    pub msgtime: Option<DateTime<Utc>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(rename = "shipType", default)]
    pub ship_type: Option<ShipType>,
    /// Reported destination, None if empty
    #[serde(default, deserialize_with = "deserialize_trimmed_string")]
    pub destination: Option<String>,
    /// Length overall in metres
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub length: Option<f64>,
}

impl VesselSighting {
    /// Create a sighting carrying only identifier and name
    pub fn new(mmsi: impl Into<MmsiField>, name: Option<&str>) -> Self {
        Self {
            mmsi: Some(mmsi.into()),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }
}

/// Persisted record of an announced vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeenVessel {
    pub mmsi: Mmsi,
    pub last_seen: DateTime<Utc>,
}

/// A vessel that must never trigger a notification
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct IgnoredVessel {
    pub name: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub mmsi: Option<u32>,
}

/// Operator-maintained list of vessels to stay silent about
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    entries: Vec<IgnoredVessel>,
}

impl IgnoreList {
    pub fn new(entries: Vec<IgnoredVessel>) -> Self {
        Self { entries }
    }

    /// Whether a vessel matches an entry by identifier, or by name
    /// (case-insensitive, surrounding whitespace ignored).
    pub fn matches(&self, mmsi: Mmsi, name: Option<&str>) -> bool {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        self.entries.iter().any(|entry| {
            let by_mmsi = entry.mmsi == Some(mmsi.value());
            let by_name = match (entry.name.as_deref().map(str::trim), name) {
                (Some(ignored), Some(name)) if !ignored.is_empty() => {
                    ignored.to_lowercase() == name.to_lowercase()
                }
                _ => false,
            };
            by_mmsi || by_name
        })
    }
}

/// Custom deserializers
mod serde_helpers {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer};
    use serde_json::Value;

    /// Trimmed string, None if empty or not a string
    pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<Value> = Option::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            _ => None,
        })
    }

    /// RFC 3339, or a naive timestamp taken as UTC. Anything else is None.
    pub fn deserialize_lenient_datetime<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<Value> = Option::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse_timestamp(s.trim()),
            _ => None,
        })
    }

    pub(super) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
