//! Geometric helpers: great-circle distance and polyline coding.
//!
//! Pure functions with no I/O, shared by route resolution (straight-line
//! fallback, geometry decoding) and region detection (nearest center).

mod polyline;

pub use polyline::{DecodeError, decode_polyline, encode_polyline};

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres (haversine).
///
/// Symmetric, and zero for identical points.
///
/// # Examples
///
/// ```
/// use fare_server::domain::Coordinate;
/// use fare_server::geo::great_circle_distance_km;
///
/// let tunis = Coordinate::new(36.8065, 10.1815).unwrap();
/// let sousse = Coordinate::new(35.8254, 10.6360).unwrap();
///
/// let d = great_circle_distance_km(tunis, sousse);
/// assert!((d - 116.0).abs() < 2.0);
/// assert_eq!(great_circle_distance_km(tunis, tunis), 0.0);
/// ```
pub fn great_circle_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
