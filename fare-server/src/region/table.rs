//! Static region reference data and name matching.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::{Coordinate, Region};
use crate::geo::great_circle_distance_km;

/// Region used when nothing else applies.
pub const CAPITAL: &str = "Tunis";

const fn region(name: &'static str, lat: f64, lng: f64, radius_km: f64) -> Region {
    Region::new(name, Coordinate::from_static(lat, lng), radius_km)
}

/// The 24 governorates, in detection order.
///
/// Order matters: nearest-center detection returns the first region whose
/// radius contains the point, and breaks distance ties in favour of the
/// earlier entry.
pub static REGIONS: [Region; 24] = [
    // Greater Tunis
    region("Tunis", 36.8065, 10.1815, 0.3),
    region("Ariana", 36.8601, 10.1934, 0.2),
    region("Ben Arous", 36.7531, 10.2189, 0.2),
    region("Manouba", 36.8081, 10.0972, 0.2),
    // Northeast
    region("Nabeul", 36.4561, 10.7376, 0.2),
    region("Zaghouan", 36.4029, 10.1429, 0.15),
    region("Bizerte", 37.2744, 9.8739, 0.2),
    // Northwest
    region("Béja", 36.7256, 9.1814, 0.15),
    region("Jendouba", 36.5000, 8.7800, 0.15),
    region("Kef", 36.1822, 8.7147, 0.15),
    region("Siliana", 36.0847, 9.3708, 0.15),
    // Center
    region("Kairouan", 35.6711, 10.1008, 0.15),
    region("Kasserine", 35.1676, 8.8361, 0.15),
    region("Sidi Bouzid", 35.0381, 9.4847, 0.15),
    // East coast
    region("Sousse", 35.8254, 10.6360, 0.2),
    region("Monastir", 35.7784, 10.8262, 0.15),
    region("Mahdia", 35.5047, 11.0622, 0.15),
    // Southeast
    region("Sfax", 34.7406, 10.7600, 0.2),
    region("Gabes", 33.8815, 10.0982, 0.2),
    region("Medenine", 33.3547, 10.5053, 0.15),
    region("Tataouine", 32.9297, 10.4511, 0.15),
    // Southwest
    region("Gafsa", 34.4250, 8.7842, 0.2),
    region("Tozeur", 33.9197, 8.1331, 0.15),
    region("Kebili", 33.7044, 8.9694, 0.15),
];

/// Lowercase spellings (accented and unaccented) mapped to region names.
///
/// Scanned in this order for partial matches.
const ALIASES: &[(&str, &str)] = &[
    ("tunis", "Tunis"),
    ("tunisia", "Tunis"),
    ("ariana", "Ariana"),
    ("ben arous", "Ben Arous"),
    ("manouba", "Manouba"),
    ("nabeul", "Nabeul"),
    ("zaghouan", "Zaghouan"),
    ("bizerte", "Bizerte"),
    ("beja", "Béja"),
    ("béja", "Béja"),
    ("jendouba", "Jendouba"),
    ("kef", "Kef"),
    ("siliana", "Siliana"),
    ("kairouan", "Kairouan"),
    ("kasserine", "Kasserine"),
    ("sidi bouzid", "Sidi Bouzid"),
    ("sousse", "Sousse"),
    ("monastir", "Monastir"),
    ("mahdia", "Mahdia"),
    ("sfax", "Sfax"),
    ("gabes", "Gabes"),
    ("gabès", "Gabes"),
    ("medenine", "Medenine"),
    ("médénine", "Medenine"),
    ("tataouine", "Tataouine"),
    ("gafsa", "Gafsa"),
    ("tozeur", "Tozeur"),
    ("kebili", "Kebili"),
    ("kébili", "Kebili"),
];

static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Look up a region by its canonical name.
pub fn find_region(name: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.name == name)
}

/// Map a free-text place name to a region name.
///
/// The text is trimmed and lowercased, then matched exactly against the
/// alias table, then by substring containment in either direction.
///
/// Short aliases can match inside unrelated names ("kef" in "Le Kef" is
/// intended, but containment is not word-bounded).
pub fn match_alias(place: &str) -> Option<&'static str> {
    let normalized = place.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(name) = ALIAS_INDEX.get(normalized.as_str()).copied() {
        return Some(name);
    }

    ALIASES
        .iter()
        .find(|(alias, _)| normalized.contains(alias) || alias.contains(normalized.as_str()))
        .map(|(_, name)| *name)
}

/// Find the region for `point` by distance to region centers.
///
/// Returns the first region (in slice order) whose radius contains the
/// point; otherwise the region with the smallest center distance, earlier
/// entries winning ties. Returns `None` only for an empty slice.
pub fn nearest_region(point: Coordinate, regions: &[Region]) -> Option<&Region> {
    let mut closest: Option<(&Region, f64)> = None;

    for region in regions {
        let distance = great_circle_distance_km(point, region.center);

        if distance <= region.radius_km {
            return Some(region);
        }

        if closest.is_none_or(|(_, min)| distance < min) {
            closest = Some((region, distance));
        }
    }

    closest.map(|(region, _)| region)
}
