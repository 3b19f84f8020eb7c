//! Named fare regions.

use super::Coordinate;

/// One of the fixed governorates used as a fare-model input.
///
/// Regions are static reference data: a name, a reference center, and a
/// radius within which a point is considered to be inside the region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Canonical name passed to the scoring model (e.g. "Béja").
    pub name: &'static str,

    /// Reference center.
    pub center: Coordinate,

    /// Detection radius in kilometres.
    pub radius_km: f64,
}

impl Region {
    /// Create a region.
    pub const fn new(name: &'static str, center: Coordinate, radius_km: f64) -> Self {
        Self {
            name,
            center,
            radius_km,
        }
    }
}
