//! Haversine distance calculation and unit handling.
//!
//! The Haversine formula calculates the great-circle distance between two
//! points on a sphere given their longitudes and latitudes.

use crate::{GeoError, Result, round_to, validate_coordinates};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Kilometers per statute mile.
pub(crate) const KM_PER_MILE: f64 = 1.609344;

/// Miles per kilometer.
const MILES_PER_KM: f64 = 0.621371;

/// Decimal places kept on reported distances.
const DISTANCE_PRECISION: i32 = 3;

/// Distance units understood by the engine.
///
/// Parsing from text accepts the aliases `km`, `kilometers`, `miles` and `mi`
/// case-insensitively; anything else is [`GeoError::InvalidUnit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Kilometers (aliases: `km`, `kilometers`)
    #[default]
    Kilometers,
    /// Statute miles (aliases: `miles`, `mi`)
    Miles,
}

impl DistanceUnit {
    /// Canonical token for API responses: `"km"` or `"miles"`.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "miles",
        }
    }

    /// Earth's mean radius expressed in this unit.
    #[inline]
    fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
            DistanceUnit::Miles => EARTH_RADIUS_MILES,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "km" | "kilometers" => Ok(DistanceUnit::Kilometers),
            "miles" | "mi" => Ok(DistanceUnit::Miles),
            other => Err(GeoError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Calculates the great-circle distance between two points using the
/// Haversine formula.
///
/// Both coordinate pairs are validated first; the error names the offending
/// pair. The result is rounded to 3 decimal places.
///
/// Callers that may see exactly equal pairs should go through
/// [`calculate_distance`], which short-circuits equality before touching the
/// trigonometric path.
///
/// # Example
/// ```
/// use courier_geo::{haversine_distance, DistanceUnit};
///
/// // Berlin -> Paris
/// let distance = haversine_distance(52.5200, 13.4050, 48.8566, 2.3522, DistanceUnit::Kilometers)
///     .unwrap();
/// assert!((distance - 878.0).abs() < 5.0);
/// ```
pub fn haversine_distance(
    lat1: f64,
    lng1: f64,
    lat2: f64,
    lng2: f64,
    unit: DistanceUnit,
) -> Result<f64> {
    if !validate_coordinates(lat1, lng1) {
        return Err(GeoError::InvalidCoordinate(format!(
            "point 1: ({lat1}, {lng1})"
        )));
    }
    if !validate_coordinates(lat2, lng2) {
        return Err(GeoError::InvalidCoordinate(format!(
            "point 2: ({lat2}, {lng2})"
        )));
    }

    let lat1_rad = lat1.to_radians();
    let lng1_rad = lng1.to_radians();
    let lat2_rad = lat2.to_radians();
    let lng2_rad = lng2.to_radians();

    let d_lat = lat2_rad - lat1_rad;
    let d_lng = lng2_rad - lng1_rad;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    Ok(round_to(unit.earth_radius() * c, DISTANCE_PRECISION))
}

/// Calculates the distance between two points, short-circuiting exactly
/// equal pairs to `0.0`.
///
/// The equality check runs before anything else, so identical points yield an
/// exact zero rather than a near-zero floating artifact, and the
/// `asin(sqrt(..))` domain can never be hit by round-off at the boundary.
pub fn calculate_distance(
    lat1: f64,
    lng1: f64,
    lat2: f64,
    lng2: f64,
    unit: DistanceUnit,
) -> Result<f64> {
    if lat1 == lat2 && lng1 == lng2 {
        debug!(lat = lat1, lng = lng1, "same location, returning 0 distance");
        return Ok(0.0);
    }

    haversine_distance(lat1, lng1, lat2, lng2, unit)
}

/// Converts a distance value between kilometer and mile families.
///
/// Converting within the same family is a no-op; converted values are rounded
/// to 3 decimal places.
pub fn convert_distance_unit(distance: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    match (from, to) {
        (DistanceUnit::Kilometers, DistanceUnit::Miles) => {
            round_to(distance * MILES_PER_KM, DISTANCE_PRECISION)
        }
        (DistanceUnit::Miles, DistanceUnit::Kilometers) => {
            round_to(distance * KM_PER_MILE, DISTANCE_PRECISION)
        }
        _ => distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known city pairs
    const BERLIN: (f64, f64) = (52.5200, 13.4050);
    const PARIS: (f64, f64) = (48.8566, 2.3522);
    const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
    const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);

    fn km(from: (f64, f64), to: (f64, f64)) -> f64 {
        haversine_distance(from.0, from.1, to.0, to.1, DistanceUnit::Kilometers).unwrap()
    }

    #[test]
    fn test_berlin_to_paris() {
        let distance = km(BERLIN, PARIS);
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {distance}");
    }

    #[test]
    fn test_new_york_to_los_angeles() {
        let distance = km(NEW_YORK, LOS_ANGELES);
        assert!((distance - 3944.0).abs() < 50.0, "NYC-LA: {distance}");
    }

    #[test]
    fn test_quarter_circumference() {
        // (0,0) to (0,90) is a quarter of the equator
        let distance = km((0.0, 0.0), (0.0, 90.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM / 2.0;
        assert!((distance - expected).abs() / expected < 0.001, "{distance}");
    }

    #[test]
    fn test_antipodal_points() {
        let distance = km((0.0, 0.0), (0.0, 180.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance - expected).abs() / expected < 0.001, "{distance}");
    }

    #[test]
    fn test_same_point_exact_zero() {
        let distance = calculate_distance(
            BERLIN.0,
            BERLIN.1,
            BERLIN.0,
            BERLIN.1,
            DistanceUnit::Kilometers,
        )
        .unwrap();
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_symmetry() {
        let d1 = km(BERLIN, PARIS);
        let d2 = km(PARIS, BERLIN);
        assert!((d1 - d2).abs() < 0.001);
    }

    #[test]
    fn test_miles_smaller_than_km() {
        let km_value = km(BERLIN, PARIS);
        let miles =
            haversine_distance(BERLIN.0, BERLIN.1, PARIS.0, PARIS.1, DistanceUnit::Miles).unwrap();
        assert!((miles - km_value * MILES_PER_KM).abs() < 1.0);
    }

    #[test]
    fn test_invalid_pair_named_in_error() {
        let err =
            haversine_distance(91.0, 0.0, 48.0, 2.0, DistanceUnit::Kilometers).unwrap_err();
        assert!(err.to_string().contains("point 1"));

        let err =
            haversine_distance(48.0, 2.0, 0.0, 181.0, DistanceUnit::Kilometers).unwrap_err();
        assert!(err.to_string().contains("point 2"));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(
            haversine_distance(f64::NAN, 0.0, 0.0, 0.0, DistanceUnit::Kilometers).is_err()
        );
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("km".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert_eq!(
            "Kilometers".parse::<DistanceUnit>().unwrap(),
            DistanceUnit::Kilometers
        );
        assert_eq!("MILES".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert_eq!("mi".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert!(matches!(
            "furlongs".parse::<DistanceUnit>(),
            Err(GeoError::InvalidUnit(_))
        ));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(
            convert_distance_unit(100.0, DistanceUnit::Kilometers, DistanceUnit::Miles),
            62.137
        );
        assert_eq!(
            convert_distance_unit(100.0, DistanceUnit::Miles, DistanceUnit::Kilometers),
            160.934
        );
        // Same family is a no-op, no re-rounding
        assert_eq!(
            convert_distance_unit(12.3456, DistanceUnit::Kilometers, DistanceUnit::Kilometers),
            12.3456
        );
    }
}
