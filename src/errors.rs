//! Errors for AIS watch
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AisWatchError {
    #[error("Invalid geometry: expected GeoJSON geometry object")]
    InvalidGeometryKind,

    #[error("Unsupported geometry type: {0}. Use Polygon or MultiPolygon.")]
    UnsupportedGeometryType(String),

    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("Area too large: {area_km2:.1} km^2 (max {max_km2} km^2)")]
    AreaTooLarge { area_km2: f64, max_km2: f64 },

    #[error("GeoJSON file not found: {}", .0.display())]
    GeometryFileNotFound(PathBuf),

    #[error("{operation} failed: {status} {body}")]
    UpstreamError {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Notification failed: {0}")]
    NotificationError(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid MMSI: {0}")]
    InvalidMmsi(String),

    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AisWatchError {
    /// Whether the error was caused by the caller's input (bad geometry,
    /// area over the ceiling). These are surfaced and never retried.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            AisWatchError::InvalidGeometryKind
                | AisWatchError::UnsupportedGeometryType(_)
                | AisWatchError::MalformedGeometry(_)
                | AisWatchError::AreaTooLarge { .. }
                | AisWatchError::GeometryFileNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_too_large_message() {
        let err = AisWatchError::AreaTooLarge {
            area_km2: 612.345,
            max_km2: 500.0,
        };
        assert_eq!(err.to_string(), "Area too large: 612.3 km^2 (max 500 km^2)");
        assert!(err.is_input_validation());
    }

    #[test]
    fn upstream_is_not_input_validation() {
        let err = AisWatchError::UpstreamError {
            operation: "latest/combined",
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "latest/combined failed: 503 busy");
        assert!(!err.is_input_validation());
    }
}
