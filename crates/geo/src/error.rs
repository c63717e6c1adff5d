//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geographic computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A latitude/longitude pair is non-finite or out of geographic range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// An unrecognized distance unit token
    #[error("Unsupported unit: {0}. Use 'km' or 'miles'")]
    InvalidUnit(String),

    /// Non-positive radius supplied to a bounding-box computation
    #[error("Invalid radius: {0} (must be positive)")]
    InvalidRadius(f64),
}
