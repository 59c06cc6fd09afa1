//! Great-circle distance and the user-facing distance labels.

use crate::candidates::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres.
///
/// Returns `None` when any coordinate is not finite.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> Option<f64> {
    let coords = [a.latitude, a.longitude, b.latitude, b.longitude];
    if coords.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Some(EARTH_RADIUS_KM * c)
}

/// Distance between two optional points; `None` unless both are present.
pub fn distance_between(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Option<f64> {
    haversine_km(a?, b?)
}

/// Human-readable label for a distance.
///
/// - `>= 100 km` → `"{rounded} km away"`
/// - `>= 1 km` → `"{one decimal} km away"`
/// - otherwise → `"{metres} m away"`
/// - no distance → empty string
///
/// Bands are chosen on the rounded value, so 99.95 km reads `"100 km away"`
/// rather than `"100.0 km away"`.
pub fn format_distance(distance_km: Option<f64>) -> String {
    let Some(km) = distance_km.filter(|d| d.is_finite()) else {
        return String::new();
    };

    let tenths = (km * 10.0).round() / 10.0;
    let metres = (km * 1000.0).round();

    if tenths >= 100.0 {
        format!("{} km away", km.round() as i64)
    } else if metres >= 1000.0 {
        format!("{:.1} km away", tenths)
    } else {
        format!("{} m away", metres as i64)
    }
}
