//! Contract for the external routing collaborator.

use async_trait::async_trait;

use crate::domain::Coordinate;

/// Path geometry as reported by a routing service.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteGeometry {
    /// GeoJSON-style `[longitude, latitude]` pairs.
    LngLat(Vec<[f64; 2]>),
    /// Encoded polyline with 5-decimal precision.
    Encoded(String),
}

/// A successful route in the service's native units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    /// Distance in metres.
    pub distance_m: f64,
    /// Duration in seconds.
    pub duration_s: f64,
    /// Path geometry, if the service returned one.
    pub geometry: Option<RouteGeometry>,
}

/// Errors reported by a routing collaborator.
///
/// `RateLimited` and `Unreachable` are kept distinct from every other
/// failure because they are the only ones that trigger the straight-line
/// fallback.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The service answered, but no route connects the two points.
    #[error("no route found: {message}")]
    NoRoute { message: String },

    /// The service rejected the request with HTTP 429.
    #[error("rate limited by routing service")]
    RateLimited,

    /// The service could not be reached (connection refused, DNS, 503).
    #[error("routing service unreachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("routing request timed out")]
    Timeout,

    /// Other transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The service returned an error status or error code.
    #[error("routing API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be parsed.
    #[error("JSON parse error: {message}")]
    Json { message: String, body: Option<String> },
}

impl RoutingError {
    /// Classify a transport error from `reqwest`.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            RoutingError::Unreachable(err.to_string())
        } else if err.is_timeout() {
            RoutingError::Timeout
        } else {
            RoutingError::Http(err)
        }
    }

    /// Whether this failure should be absorbed by estimating the route
    /// geometrically instead of surfacing it.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(self, RoutingError::RateLimited | RoutingError::Unreachable(_))
    }
}

/// A road-network routing service.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Request a driving route from `start` to `end`, with full geometry.
    async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RawRoute, RoutingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_triggers() {
        assert!(RoutingError::RateLimited.is_fallback_trigger());
        assert!(RoutingError::Unreachable("refused".into()).is_fallback_trigger());

        assert!(!RoutingError::Timeout.is_fallback_trigger());
        assert!(
            !RoutingError::NoRoute {
                message: "Impossible route".into()
            }
            .is_fallback_trigger()
        );
        assert!(
            !RoutingError::Api {
                status: 500,
                message: "boom".into()
            }
            .is_fallback_trigger()
        );
        assert!(
            !RoutingError::Json {
                message: "expected value".into(),
                body: None
            }
            .is_fallback_trigger()
        );
    }

    #[test]
    fn error_display() {
        let err = RoutingError::Api {
            status: 400,
            message: "InvalidQuery".into(),
        };
        assert_eq!(err.to_string(), "routing API error 400: InvalidQuery");
        assert_eq!(
            RoutingError::RateLimited.to_string(),
            "rate limited by routing service"
        );
    }
}
