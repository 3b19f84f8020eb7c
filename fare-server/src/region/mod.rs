//! Region detection.
//!
//! Maps a trip origin to one of the 24 governorates used by the fare
//! model: first via a [`ReverseGeocoder`] and the alias table, then by
//! distance to the static region centers.

mod detector;
mod geocoder;
mod table;

pub use detector::{RegionDetector, detect_by_distance};
pub use geocoder::{Address, GeocodingError, ReverseGeocoder};
pub use table::{CAPITAL, REGIONS, find_region, match_alias, nearest_region};
