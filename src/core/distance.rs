use crate::models::Coordinate;

/// Earth's mean radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance reported when either endpoint is unusable, so such candidates sort last
pub const UNREACHABLE_KM: f64 = 1e9;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers, or [`UNREACHABLE_KM`] if any input is not finite
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !(lat1.is_finite() && lon1.is_finite() && lat2.is_finite() && lon2.is_finite()) {
        return UNREACHABLE_KM;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two optional coordinates.
///
/// Never fails: a missing endpoint yields [`UNREACHABLE_KM`].
#[inline]
pub fn distance_km(a: Option<Coordinate>, b: Option<Coordinate>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude()),
        _ => UNREACHABLE_KM,
    }
}

/// Round a distance to 2 decimal places for presentation
#[inline]
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
