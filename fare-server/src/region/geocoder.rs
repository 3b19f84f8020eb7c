//! Contract for the external reverse-geocoding collaborator.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Coordinate;

/// Structured address returned by reverse geocoding.
///
/// Which fields are populated varies by country and by how rural the point
/// is, so callers pick the first non-empty one in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    /// Top-level administrative area (governorate).
    #[serde(default)]
    pub state: Option<String>,
}

impl Address {
    /// The most specific non-blank place name, in priority order:
    /// city, town, village, municipality, county, state.
    pub fn place_name(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.municipality,
            &self.county,
            &self.state,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|name| !name.trim().is_empty())
    }
}

/// Errors that can occur during reverse geocoding.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// The service returned an error status
    #[error("geocoding request failed: HTTP {status}")]
    RequestFailed { status: u16 },

    /// Failed to parse the response
    #[error("geocoding parse error: {0}")]
    ParseError(String),

    /// No address exists for the point (e.g. open sea)
    #[error("no address found for {0}")]
    NotFound(Coordinate),

    /// Rate limit exceeded
    #[error("geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("geocoding request timed out")]
    Timeout,
}

/// A reverse-geocoding service.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the address at `point`.
    async fn reverse(&self, point: Coordinate) -> Result<Address, GeocodingError>;
}
