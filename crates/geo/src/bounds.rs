//! Radius bounding boxes and containment tests.

use crate::haversine::KM_PER_MILE;
use crate::{DistanceUnit, EARTH_RADIUS_KM, GeoError, Result, validate_coordinates};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// A latitude/longitude rectangle approximating "within radius R of a point".
///
/// `min_lng > max_lng` encodes an interval that wraps across the ±180° seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude bound in degrees
    pub min_lat: f64,
    /// Northern latitude bound in degrees
    pub max_lat: f64,
    /// Western longitude bound in degrees
    pub min_lng: f64,
    /// Eastern longitude bound in degrees
    pub max_lng: f64,
}

impl BoundingBox {
    /// Whether the longitude interval crosses the ±180° seam.
    #[inline]
    pub fn wraps(&self) -> bool {
        self.min_lng > self.max_lng
    }

    /// Whether the given point lies inside this box.
    #[inline]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        is_coordinate_in_bounds(lat, lng, self)
    }
}

/// Derives the bounding box for a radius around a center point.
///
/// The radius must be strictly positive. Near the poles, where the raw
/// latitude bound would leave ±90°, the longitude bounds collapse to the full
/// [-180, 180] range since every longitude is within radius of a pole.
/// Latitude bounds are clamped to ±90; longitude bounds past ±180 wrap back
/// into range and are signaled via `min_lng > max_lng`.
pub fn distance_bounds(
    center_lat: f64,
    center_lng: f64,
    radius: f64,
    unit: DistanceUnit,
) -> Result<BoundingBox> {
    if !validate_coordinates(center_lat, center_lng) {
        return Err(GeoError::InvalidCoordinate(format!(
            "center: ({center_lat}, {center_lng})"
        )));
    }
    // Also catches NaN, which fails every comparison.
    if !(radius > 0.0) {
        return Err(GeoError::InvalidRadius(radius));
    }

    let radius_km = match unit {
        DistanceUnit::Kilometers => radius,
        DistanceUnit::Miles => radius * KM_PER_MILE,
    };

    let angular_radius = radius_km / EARTH_RADIUS_KM;

    let center_lat_rad = center_lat.to_radians();
    let center_lng_rad = center_lng.to_radians();

    let min_lat_rad = center_lat_rad - angular_radius;
    let max_lat_rad = center_lat_rad + angular_radius;

    let (min_lng_rad, max_lng_rad) = if min_lat_rad > -FRAC_PI_2 && max_lat_rad < FRAC_PI_2 {
        // Longitude compresses with latitude, so the widest longitude span of
        // the circle is wider than radius/cos(lat) would suggest.
        let d_lng = (angular_radius.sin() / center_lat_rad.cos()).asin();
        (center_lng_rad - d_lng, center_lng_rad + d_lng)
    } else {
        // A pole sits inside the radius; every longitude qualifies.
        (-PI, PI)
    };

    let mut min_lng = min_lng_rad.to_degrees();
    let mut max_lng = max_lng_rad.to_degrees();

    if min_lng < -180.0 {
        min_lng += 360.0;
    }
    if max_lng > 180.0 {
        max_lng -= 360.0;
    }

    Ok(BoundingBox {
        min_lat: min_lat_rad.max(-FRAC_PI_2).to_degrees(),
        max_lat: max_lat_rad.min(FRAC_PI_2).to_degrees(),
        min_lng,
        max_lng,
    })
}

/// Checks whether a point lies inside a bounding box.
///
/// Returns false for an invalid point rather than failing; containment of
/// garbage is simply "no". Handles longitude intervals that wrap across the
/// ±180° seam.
pub fn is_coordinate_in_bounds(lat: f64, lng: f64, bounds: &BoundingBox) -> bool {
    if !validate_coordinates(lat, lng) {
        return false;
    }

    if lat < bounds.min_lat || lat > bounds.max_lat {
        return false;
    }

    if bounds.min_lng <= bounds.max_lng {
        bounds.min_lng <= lng && lng <= bounds.max_lng
    } else {
        // Wrapped interval crossing 180/-180
        lng >= bounds.min_lng || lng <= bounds.max_lng
    }
}
