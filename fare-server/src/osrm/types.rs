//! OSRM `route` service response types.

use serde::Deserialize;

/// Top-level response of `/route/v1/{profile}/{coordinates}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    /// Human-readable detail for error codes.
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// A single route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    /// Distance in metres.
    pub distance: f64,

    /// Duration in seconds.
    pub duration: f64,

    #[serde(default)]
    pub geometry: Option<OsrmGeometry>,
}

/// Route geometry in whichever format was requested.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OsrmGeometry {
    /// `geometries=polyline`
    Encoded(String),
    /// `geometries=geojson`
    GeoJson(OsrmLineString),
}

/// GeoJSON LineString; coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmLineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}
