//! Region detection with a nearest-center fallback.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::Coordinate;

use super::geocoder::ReverseGeocoder;
use super::table::{CAPITAL, REGIONS, match_alias, nearest_region};

/// Maps a coordinate to one of the known region names.
///
/// Asks the reverse geocoder first. Any geocoder failure, or an address
/// that matches no known region, falls back to nearest-center detection, so
/// detection itself never fails.
#[derive(Clone)]
pub struct RegionDetector {
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl RegionDetector {
    /// Create a detector backed by a live reverse geocoder.
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            geocoder: Some(geocoder),
        }
    }

    /// Create a detector that only uses nearest-center detection.
    pub fn offline() -> Self {
        Self { geocoder: None }
    }

    /// Detect the region containing `point`.
    #[instrument(skip(self))]
    pub async fn detect_region(&self, point: Coordinate) -> &'static str {
        if let Some(geocoder) = &self.geocoder {
            match geocoder.reverse(point).await {
                Ok(address) => match address.place_name().and_then(match_alias) {
                    Some(name) => {
                        debug!(region = name, "region from reverse geocoding");
                        return name;
                    }
                    None => debug!(
                        place = ?address.place_name(),
                        "reverse geocoding matched no known region"
                    ),
                },
                Err(e) => warn!(error = %e, "reverse geocoding failed, using nearest region"),
            }
        }

        detect_by_distance(point)
    }
}

/// Nearest-center detection over the static region table.
pub fn detect_by_distance(point: Coordinate) -> &'static str {
    nearest_region(point, &REGIONS).map_or(CAPITAL, |r| r.name)
}
