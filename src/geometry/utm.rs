// src/geometry/utm.rs
//! WGS84 / UTM forward projection.
//!
//! Transverse Mercator series expansion after Snyder, "Map Projections: A
//! Working Manual" (USGS PP 1395), eqs. 3-21, 8-9 to 8-10. Accurate to well
//! under a metre inside a zone, which is far below what matters for area
//! checks of a few hundred km².

use geo_types::Coord;

/// WGS84 semi-major axis in metres
const A: f64 = 6_378_137.0;
/// WGS84 flattening
const F: f64 = 1.0 / 298.257_223_563;
/// UTM scale factor on the central meridian
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// A 6-degree UTM zone and hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub number: u8,
    pub north: bool,
}

impl UtmZone {
    /// Pick the zone containing a longitude/latitude pair.
    ///
    /// Zone is `floor((lon + 180) / 6) + 1`, clamped into 1..=60 so that
    /// longitude 180 falls into zone 60. Latitude 0 counts as north.
    pub fn for_lon_lat(lon: f64, lat: f64) -> Self {
        let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
        Self {
            number: zone.clamp(1, 60) as u8,
            north: lat >= 0.0,
        }
    }

    /// EPSG code of the matching "WGS 84 / UTM zone" CRS
    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + self.number as u32
    }

    /// Central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    /// Project a longitude/latitude coordinate (degrees) to easting/northing
    /// in metres.
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        let e2 = F * (2.0 - F);
        let ep2 = e2 / (1.0 - e2);

        let phi = coord.y.to_radians();
        let dlambda = (coord.x - self.central_meridian()).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = cos_phi * dlambda;

        let m = meridian_arc(phi, e2);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let easting = K0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
            + FALSE_EASTING;

        let mut northing = K0
            * (m + n
                * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        if !self.north {
            northing += FALSE_NORTHING_SOUTH;
        }

        Coord {
            x: easting,
            y: northing,
        }
    }
}

/// Distance along the meridian from the equator to latitude `phi` (radians)
fn meridian_arc(phi: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
