//! Notification text for newly arrived vessels.

mod flags;
mod ship_types;

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::models::{Mmsi, ShipType, VesselSighting};

/// Placeholder for any value the sighting does not carry
pub const UNKNOWN: &str = "Unknown";

/// Flag state resolved from Maritime Identification Digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    /// ISO 3166-1 alpha-2
    pub code: &'static str,
}

/// Ship type and flag state tables, built once at startup
#[derive(Debug, Clone)]
pub struct LookupTables {
    ship_types: HashMap<i64, &'static str>,
    countries: HashMap<u16, Country>,
}

impl LookupTables {
    pub fn load() -> Self {
        let ship_types = ship_types::SHIP_TYPES
            .iter()
            .flat_map(|&(first, last, description)| {
                (first..=last).map(move |code| (code, description))
            })
            .collect();
        let countries = flags::MID_COUNTRIES
            .iter()
            .map(|&(mid, name, code)| (mid, Country { name, code }))
            .collect();

        Self {
            ship_types,
            countries,
        }
    }

    /// Description of an AIS ship type code
    pub fn ship_type(&self, code: i64) -> Option<&'static str> {
        self.ship_types.get(&code).copied()
    }

    /// Flag state of a vessel, from the first three digits of its MMSI
    pub fn country(&self, mmsi: Mmsi) -> Option<Country> {
        mmsi.mid().and_then(|mid| self.countries.get(&mid).copied())
    }
}

/// Renders a country code as a flag emoji, where that is possible.
pub trait CountryResolver: Send + Sync {
    fn flag_emoji(&self, code: &str) -> Option<String>;
}

/// Flag emoji from Unicode regional indicator symbols
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionalIndicators;

impl CountryResolver for RegionalIndicators {
    fn flag_emoji(&self, code: &str) -> Option<String> {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        code.chars()
            .map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
            .collect()
    }
}

/// Resolver for outputs that cannot show emoji
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlagEmoji;

impl CountryResolver for NoFlagEmoji {
    fn flag_emoji(&self, _code: &str) -> Option<String> {
        None
    }
}

/// Formats one message per newly arrived vessel.
///
/// Output is a pure function of the sighting and the lookup tables. Every
/// message has the same lines, with [`UNKNOWN`] for anything missing.
pub struct NotificationFormatter {
    tables: LookupTables,
    resolver: Box<dyn CountryResolver>,
}

impl NotificationFormatter {
    pub fn new(tables: LookupTables, resolver: Box<dyn CountryResolver>) -> Self {
        Self { tables, resolver }
    }

    pub fn format(&self, sighting: &VesselSighting) -> String {
        let mmsi = sighting.mmsi.as_ref().and_then(|raw| raw.normalize().ok());

        let name = text_or_unknown(sighting.name.as_deref());
        let destination = text_or_unknown(sighting.destination.as_deref());
        let ship_type = self.ship_type(sighting.ship_type.as_ref());
        let length = sighting
            .length
            .filter(|l| l.is_finite() && *l > 0.0)
            .map(format_length)
            .unwrap_or_else(|| UNKNOWN.to_string());
        let flag = mmsi
            .map(|mmsi| self.flag(mmsi))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let position = match (sighting.latitude, sighting.longitude) {
            (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
            _ => UNKNOWN.to_string(),
        };
        let msgtime = sighting
            .msgtime
            .map(format_time)
            .unwrap_or_else(|| UNKNOWN.to_string());

        [
            format!("{ship_type}: {name} seiler mot {destination}. Lengde: {length}. Flagg: {flag}"),
            line("Name", &name),
            line("MMSI", or_unknown(mmsi)),
            line("Type", &ship_type),
            line("Destination", &destination),
            line("Length", &length),
            line("Flag", &flag),
            line("Position", &position),
            line("Last message", &msgtime),
        ]
        .join("\n")
    }

    /// Flag state name, with emoji when the resolver provides one
    pub fn flag(&self, mmsi: Mmsi) -> String {
        match self.tables.country(mmsi) {
            Some(country) => match self.resolver.flag_emoji(country.code) {
                Some(emoji) => format!("{} {}", country.name, emoji),
                None => country.name.to_string(),
            },
            None => UNKNOWN.to_string(),
        }
    }

    fn ship_type(&self, ship_type: Option<&ShipType>) -> String {
        let description = match ship_type {
            Some(ShipType::Code(code)) => self.tables.ship_type(*code).unwrap_or(UNKNOWN),
            Some(ShipType::Text(text)) => text_or_unknown_ref(text),
            None => UNKNOWN,
        };
        description.to_string()
    }
}

/// One message listing several vessels, for manual posts.
///
/// Vessels without a name are listed as `Ukjent`.
pub fn format_summary(sightings: &[VesselSighting]) -> String {
    let mut text = format!("*Nye skip innenfor området ({})*", sightings.len());
    for sighting in sightings {
        let mmsi = sighting.mmsi.as_ref().and_then(|raw| raw.normalize().ok());
        let position = match (sighting.latitude, sighting.longitude) {
            (Some(lat), Some(lon)) => format!("{lat},{lon}"),
            _ => UNKNOWN.to_string(),
        };
        text.push_str(&format!(
            "\n• {} (MMSI {}) – {} – {}",
            sighting.name.as_deref().unwrap_or("Ukjent"),
            or_unknown(mmsi),
            position,
            or_unknown(sighting.msgtime.map(format_time)),
        ));
    }
    text
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn line(label: &str, value: impl Display) -> String {
    format!("{label}: {value}")
}

fn or_unknown(value: Option<impl Display>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn text_or_unknown(text: Option<&str>) -> String {
    text.map(text_or_unknown_ref).unwrap_or(UNKNOWN).to_string()
}

fn text_or_unknown_ref(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        UNKNOWN
    } else {
        trimmed
    }
}

fn format_length(length: f64) -> String {
    if length.fract() == 0.0 {
        format!("{length:.0} m")
    } else {
        format!("{length:.1} m")
    }
}
