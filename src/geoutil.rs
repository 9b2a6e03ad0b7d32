//! Geodesic helpers shared by the clustering strategies

use geo::Point;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two WGS84 points in kilometers
///
/// Uses the haversine formula. Points are `geo::Point<f64>` with
/// x = longitude and y = latitude, both in degrees.
///
/// The intermediate haversine term is clamped to [0, 1] so floating-point
/// overshoot near antipodal points can never push `sqrt`/`atan2` out of
/// domain; the result is always finite for finite input.
#[inline]
pub fn haversine_km(p1: Point<f64>, p2: Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lat = (p2.y() - p1.y()).to_radians();
    let delta_lon = (p2.x() - p1.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arithmetic-mean centroid of a non-empty set of points
///
/// Mean of latitudes and mean of longitudes. This is an acceptable
/// approximation at map scale, not a geodesic centroid; callers must not
/// pass an empty slice.
#[inline]
pub fn centroid(points: &[Point<f64>]) -> Point<f64> {
    debug_assert!(!points.is_empty());
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x(), sy + p.y()));
    Point::new(sum_x / n, sum_y / n)
}
