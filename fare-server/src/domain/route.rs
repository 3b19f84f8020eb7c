//! Resolved route between two points.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Where a [`RouteInfo`] came from.
///
/// Downstream fare code treats both sources identically; this is kept for
/// logging and for clients that want to flag an estimate as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Road-network route from the routing service.
    Routed,
    /// Great-circle estimate used when the routing service was unavailable.
    StraightLine,
}

/// Travel distance and duration for a trip, plus the path when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Distance in kilometres, rounded to 2 decimals.
    pub distance_km: f64,

    /// Duration in minutes, rounded to 1 decimal.
    pub duration_min: f64,

    /// Ordered path geometry. Absent for straight-line estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<Coordinate>>,

    /// Which strategy produced this route.
    pub source: RouteSource,
}

impl RouteInfo {
    /// Build a routed result from raw metres and seconds.
    pub fn routed(distance_m: f64, duration_s: f64, geometry: Option<Vec<Coordinate>>) -> Self {
        Self {
            distance_km: round_to(distance_m / 1000.0, 2),
            duration_min: round_to(duration_s / 60.0, 1),
            geometry,
            source: RouteSource::Routed,
        }
    }

    /// Build a straight-line estimate from a great-circle distance and an
    /// assumed average speed.
    pub fn straight_line(distance_km: f64, speed_kmh: f64) -> Self {
        let duration_min = distance_km / speed_kmh * 60.0;
        Self {
            distance_km: round_to(distance_km, 2),
            duration_min: round_to(duration_min, 1),
            geometry: None,
            source: RouteSource::StraightLine,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
