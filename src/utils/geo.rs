// src/utils/geo.rs

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates using the haversine
/// formula, in kilometers.
///
/// Assumes a spherical Earth, which is close enough for pricing but not
/// for navigation. Inputs are degrees; out-of-range coordinates produce
/// mathematically defined but meaningless results, so callers validate
/// ranges before getting here.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
