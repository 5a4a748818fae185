//! Monitored-area geometry: GeoJSON validation and area measurement.
//!
//! Areas are measured in km² by projecting every vertex into the UTM zone
//! of the shape's centroid. Planar area on raw longitude/latitude would be
//! wrong by an amount that grows with both size and latitude.

pub mod utm;

use std::path::Path;

use geo::{Area, Centroid, MapCoords, Validation};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use tracing::debug;

use crate::errors::AisWatchError;
use utm::UtmZone;

/// A Polygon or MultiPolygon that passed validation.
///
/// Keeps the caller's GeoJSON for handing to the vessel source, along with
/// the parsed shape used for measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidGeometry {
    geojson: Value,
    shape: MultiPolygon<f64>,
}

impl ValidGeometry {
    /// The validated GeoJSON geometry object
    pub fn as_geojson(&self) -> &Value {
        &self.geojson
    }

    /// Parsed shape in longitude/latitude degrees
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

/// Validate a GeoJSON geometry object.
///
/// Only `Polygon` and `MultiPolygon` are accepted, and their rings must form
/// a valid shape: closed, at least four positions, numeric in-range
/// coordinates, no self-intersections.
pub fn validate(geometry: &Value) -> Result<ValidGeometry, AisWatchError> {
    let object = geometry
        .as_object()
        .ok_or(AisWatchError::InvalidGeometryKind)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(AisWatchError::InvalidGeometryKind)?;

    let shape = match kind {
        "Polygon" => MultiPolygon::new(vec![parse_polygon(coordinates(object)?)?]),
        "MultiPolygon" => parse_multi_polygon(coordinates(object)?)?,
        other => return Err(AisWatchError::UnsupportedGeometryType(other.to_string())),
    };

    if !shape.is_valid() {
        return Err(AisWatchError::MalformedGeometry(
            "rings intersect themselves or each other".to_string(),
        ));
    }

    Ok(ValidGeometry {
        geojson: geometry.clone(),
        shape,
    })
}

/// Area of the geometry in km².
pub fn area_km2(geometry: &ValidGeometry) -> f64 {
    let Some(centroid) = geometry.shape.centroid() else {
        return 0.0;
    };
    let zone = UtmZone::for_lon_lat(centroid.x(), centroid.y());
    debug!(
        "Measuring area in EPSG:{} (centroid {:.4}, {:.4})",
        zone.epsg(),
        centroid.x(),
        centroid.y()
    );

    let projected = geometry.shape.map_coords(move |c| zone.project(c));
    projected.unsigned_area() / 1_000_000.0
}

/// Measure the geometry and fail with `AreaTooLarge` if it exceeds `max_km2`.
pub fn enforce_max_area(geometry: &ValidGeometry, max_km2: f64) -> Result<f64, AisWatchError> {
    let area = area_km2(geometry);
    if area > max_km2 {
        return Err(AisWatchError::AreaTooLarge {
            area_km2: area,
            max_km2,
        });
    }
    Ok(area)
}

/// Pull the geometry out of a GeoJSON document.
///
/// Accepts a `FeatureCollection` (first feature), a `Feature`, an object
/// wrapping the geometry under a `geometry` key, or a bare geometry.
pub fn extract_geometry(document: Value) -> Result<Value, AisWatchError> {
    match document.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => document
            .get("features")
            .and_then(Value::as_array)
            .and_then(|features| features.first())
            .and_then(|feature| feature.get("geometry"))
            .cloned()
            .ok_or_else(|| {
                AisWatchError::MalformedGeometry("FeatureCollection has no features".to_string())
            }),
        Some("Feature") => document
            .get("geometry")
            .cloned()
            .ok_or(AisWatchError::InvalidGeometryKind),
        _ => match document.get("geometry") {
            Some(geometry) => Ok(geometry.clone()),
            None => Ok(document),
        },
    }
}

/// Read the monitored area from a GeoJSON file.
pub fn load_geometry_file(path: &Path) -> Result<Value, AisWatchError> {
    if !path.exists() {
        return Err(AisWatchError::GeometryFileNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&contents)?;
    extract_geometry(document)
}

fn coordinates(object: &serde_json::Map<String, Value>) -> Result<&Value, AisWatchError> {
    object
        .get("coordinates")
        .ok_or_else(|| AisWatchError::MalformedGeometry("missing coordinates".to_string()))
}

fn parse_multi_polygon(value: &Value) -> Result<MultiPolygon<f64>, AisWatchError> {
    let polygons = as_array(value, "MultiPolygon coordinates")?;
    if polygons.is_empty() {
        return Err(AisWatchError::MalformedGeometry(
            "MultiPolygon has no polygons".to_string(),
        ));
    }
    let polygons = polygons
        .iter()
        .map(parse_polygon)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiPolygon::new(polygons))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, AisWatchError> {
    let rings = as_array(value, "Polygon coordinates")?;
    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings
        .next()
        .ok_or_else(|| AisWatchError::MalformedGeometry("Polygon has no rings".to_string()))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Result<LineString<f64>, AisWatchError> {
    let positions = as_array(value, "ring")?;
    if positions.len() < 4 {
        return Err(AisWatchError::MalformedGeometry(format!(
            "ring needs at least 4 positions, got {}",
            positions.len()
        )));
    }
    let coords = positions
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()?;
    if coords.first() != coords.last() {
        return Err(AisWatchError::MalformedGeometry(
            "ring is not closed".to_string(),
        ));
    }
    Ok(LineString::new(coords))
}

fn parse_position(value: &Value) -> Result<Coord<f64>, AisWatchError> {
    let position = as_array(value, "position")?;
    let number = |index: usize| {
        position
            .get(index)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .ok_or_else(|| {
                AisWatchError::MalformedGeometry(format!("non-numeric coordinate in {value}"))
            })
    };
    let (lon, lat) = (number(0)?, number(1)?);
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(AisWatchError::MalformedGeometry(format!(
            "coordinate out of range: {value}"
        )));
    }
    Ok(Coord { x: lon, y: lat })
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, AisWatchError> {
    value
        .as_array()
        .ok_or_else(|| AisWatchError::MalformedGeometry(format!("{what} must be an array")))
}
