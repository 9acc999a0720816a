//! Spherical geodesy helpers: great-circle distance and direct projection.

use crate::models::GeoPoint;

/// Mean Earth radius in meters used by every spherical formula in this crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance between two points in meters.
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Project a destination from `origin` along a bearing.
///
/// # Arguments
/// * `origin` - Starting position in degrees
/// * `distance_m` - Distance in meters
/// * `bearing_rad` - Bearing in radians (0 = north, π/2 = east)
///
/// # Returns
/// Destination in degrees. Longitude is not wrapped into [-180, 180], so
/// projections across the antimeridian come back outside that range.
pub fn destination_point(origin: GeoPoint, distance_m: f64, bearing_rad: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * lat2.sin();
    let lon2 = lon1 + y.atan2(x);

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}
