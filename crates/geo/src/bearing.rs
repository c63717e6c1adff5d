//! Initial bearing (forward azimuth) between two points.

use crate::{GeoError, Result, round_to, validate_coordinates};

/// Decimal places kept on reported bearings.
const BEARING_PRECISION: i32 = 1;

/// Calculates the initial bearing from point 1 toward point 2 along the
/// great circle.
///
/// Result is in degrees, clockwise from north, always in `[0, 360)`.
///
/// # Example
/// ```
/// use courier_geo::calculate_bearing;
///
/// // Due east along the equator
/// let bearing = calculate_bearing(0.0, 0.0, 0.0, 10.0).unwrap();
/// assert_eq!(bearing, 90.0);
/// ```
pub fn calculate_bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64> {
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
    let lat2_rad = lat2.to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let y = d_lng.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * d_lng.cos();

    let bearing = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    // Rounding can push e.g. 359.96 up to 360.0, which must wrap back to 0.
    Ok(round_to(bearing, BEARING_PRECISION) % 360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_north() {
        let bearing = calculate_bearing(0.0, 0.0, 10.0, 0.0).unwrap();
        assert_eq!(bearing, 0.0);
    }

    #[test]
    fn test_due_east() {
        let bearing = calculate_bearing(0.0, 0.0, 0.0, 10.0).unwrap();
        assert_eq!(bearing, 90.0);
    }

    #[test]
    fn test_due_south() {
        let bearing = calculate_bearing(10.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(bearing, 180.0);
    }

    #[test]
    fn test_due_west() {
        let bearing = calculate_bearing(0.0, 10.0, 0.0, 0.0).unwrap();
        assert_eq!(bearing, 270.0);
    }

    #[test]
    fn test_never_reaches_360() {
        // Just barely west of due north
        let bearing = calculate_bearing(0.0, 0.0, 80.0, -0.01).unwrap();
        assert!((0.0..360.0).contains(&bearing), "{bearing}");
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(calculate_bearing(91.0, 0.0, 0.0, 0.0).is_err());
        assert!(calculate_bearing(0.0, 0.0, f64::NAN, 0.0).is_err());
    }
}
