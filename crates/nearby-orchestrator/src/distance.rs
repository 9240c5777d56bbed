//! Great-circle distance and its display label.

use nearby_core::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in meters.
#[must_use]
pub fn calculate_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// `"<m>m away"` below one kilometre, `"<km to 1 dp>km away"` from there on.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0}m away", meters.round())
    } else {
        // Ties round up, so 1250m reads 1.3km.
        let tenths = (meters / 100.0).round();
        format!("{:.1}km away", tenths / 10.0)
    }
}
