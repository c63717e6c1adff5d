//! Geographic mathematics for courier-tools.
//!
//! This crate provides:
//! - Coordinate validation and precision normalization
//! - Haversine great-circle distances with unit handling
//! - Initial bearing calculation
//! - Radius bounding boxes for range queries
//!
//! All functions are pure and stateless; invalid input is an explicit error,
//! never clamped to the nearest valid value and never a sentinel result.
//!
//! # Example
//!
//! ```
//! use courier_geo::{calculate_distance, DistanceUnit};
//!
//! // Berlin -> Paris
//! let distance = calculate_distance(52.5200, 13.4050, 48.8566, 2.3522, DistanceUnit::Kilometers)
//!     .unwrap();
//! assert!((distance - 878.0).abs() < 10.0); // ~878 km
//! ```

mod bearing;
mod bounds;
mod error;
mod haversine;

pub use bearing::calculate_bearing;
pub use bounds::{BoundingBox, distance_bounds, is_coordinate_in_bounds};
pub use error::{GeoError, Result};
pub use haversine::{
    DistanceUnit, EARTH_RADIUS_KM, EARTH_RADIUS_MILES, calculate_distance, convert_distance_unit,
    haversine_distance,
};

/// Decimal places kept by coordinate normalization (~1 cm on the ground).
const COORDINATE_PRECISION: i32 = 7;

/// Rounds to a fixed number of decimal places.
#[inline]
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A geographic coordinate with latitude and longitude.
///
/// Construction goes through [`Coordinate::try_new`], so a value of this type
/// is never non-finite or outside geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting non-finite or out-of-range components.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        if !validate_coordinates(latitude, longitude) {
            return Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude})"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns true if the coordinate has valid values.
    ///
    /// The fields are public and the type derives `Deserialize`, so values
    /// built outside [`Coordinate::try_new`] can still be re-checked here.
    #[inline]
    pub fn is_valid(&self) -> bool {
        validate_coordinates(self.latitude, self.longitude)
    }

    /// Rounds both components to storage precision (7 decimal places).
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            latitude: round_to(self.latitude, COORDINATE_PRECISION),
            longitude: round_to(self.longitude, COORDINATE_PRECISION),
        }
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = GeoError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self> {
        Self::try_new(lat, lng)
    }
}

/// Checks that a latitude/longitude pair is finite and within geographic bounds.
///
/// NaN compares false against everything, so naive range checks would let it
/// through; the finite check is explicit.
#[inline]
pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// Validates a pair and rounds both components to 7 decimal places.
pub fn normalize_coordinates(lat: f64, lng: f64) -> Result<(f64, f64)> {
    let coord = Coordinate::try_new(lat, lng)?.normalized();
    Ok((coord.latitude, coord.longitude))
}
