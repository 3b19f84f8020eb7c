//! Route resolution with a straight-line fallback.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::{Coordinate, RouteInfo};
use crate::geo::{DecodeError, decode_polyline, great_circle_distance_km};

use super::provider::{RawRoute, RouteGeometry, RouteProvider, RoutingError};

/// Assumed average city driving speed for straight-line estimates.
pub const FALLBACK_SPEED_KMH: f64 = 30.0;

/// Errors from route resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// The routing service found no route between the points.
    #[error("no route found between the given coordinates: {0}")]
    NoRoute(String),

    /// The routing service failed in a way that does not allow a fallback.
    #[error("failed to get route information: {0}")]
    Resolution(String),

    /// The returned geometry could not be decoded.
    #[error("invalid route geometry: {0}")]
    Decode(#[from] DecodeError),
}

/// Resolves driving distance and duration between two points.
///
/// Prefers the live routing service. When the service is rate limited or
/// unreachable, substitutes a great-circle estimate at
/// [`FALLBACK_SPEED_KMH`]; every other failure is surfaced unchanged.
#[derive(Clone)]
pub struct RouteResolver {
    provider: Arc<dyn RouteProvider>,
    fallback_speed_kmh: f64,
}

impl RouteResolver {
    /// Create a resolver backed by the given routing service.
    pub fn new(provider: Arc<dyn RouteProvider>) -> Self {
        Self {
            provider,
            fallback_speed_kmh: FALLBACK_SPEED_KMH,
        }
    }

    /// Resolve the route from `start` to `end`.
    #[instrument(skip_all, fields(start = %start, end = %end))]
    pub async fn resolve_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteInfo, RouteError> {
        match self.provider.route(start, end).await {
            Ok(raw) => {
                let route = convert_route(raw)?;
                debug!(
                    distance_km = route.distance_km,
                    duration_min = route.duration_min,
                    "route resolved"
                );
                Ok(route)
            }
            Err(RoutingError::NoRoute { message }) => Err(RouteError::NoRoute(message)),
            Err(e) if e.is_fallback_trigger() => {
                warn!(error = %e, "routing service unavailable, using straight-line estimate");
                Ok(self.straight_line(start, end))
            }
            Err(e) => Err(RouteError::Resolution(e.to_string())),
        }
    }

    /// Great-circle estimate with no geometry.
    pub fn straight_line(&self, start: Coordinate, end: Coordinate) -> RouteInfo {
        RouteInfo::straight_line(great_circle_distance_km(start, end), self.fallback_speed_kmh)
    }
}

fn convert_route(raw: RawRoute) -> Result<RouteInfo, RouteError> {
    if !raw.distance_m.is_finite() || raw.distance_m < 0.0 {
        return Err(RouteError::Resolution(format!(
            "invalid route distance: {}",
            raw.distance_m
        )));
    }
    if !raw.duration_s.is_finite() || raw.duration_s < 0.0 {
        return Err(RouteError::Resolution(format!(
            "invalid route duration: {}",
            raw.duration_s
        )));
    }

    let geometry = raw.geometry.map(convert_geometry).transpose()?;
    Ok(RouteInfo::routed(raw.distance_m, raw.duration_s, geometry))
}

fn convert_geometry(geometry: RouteGeometry) -> Result<Vec<Coordinate>, DecodeError> {
    match geometry {
        RouteGeometry::Encoded(encoded) => decode_polyline(&encoded),
        RouteGeometry::LngLat(pairs) => pairs
            .into_iter()
            .enumerate()
            .map(|(index, [lng, lat])| {
                Coordinate::new(lat, lng).map_err(|_| DecodeError::InvalidPoint { index })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteSource;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    /// Provider that replays a fixed outcome and counts calls.
    struct StubProvider {
        outcome: Box<dyn Fn() -> Result<RawRoute, RoutingError> + Send + Sync>,
        calls: Mutex<usize>,
    }

    impl StubProvider {
        fn new(outcome: impl Fn() -> Result<RawRoute, RoutingError> + Send + Sync + 'static) -> Self {
            Self {
                outcome: Box::new(outcome),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl RouteProvider for StubProvider {
        async fn route(&self, _start: Coordinate, _end: Coordinate) -> Result<RawRoute, RoutingError> {
            *self.calls.lock().unwrap() += 1;
            (self.outcome)()
        }
    }

    fn build(provider: StubProvider) -> (RouteResolver, Arc<StubProvider>) {
        let provider = Arc::new(provider);
        (RouteResolver::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn converts_routed_units_and_geometry() {
        let (resolver, _) = build(StubProvider::new(|| {
            Ok(RawRoute {
                distance_m: 5234.0,
                duration_s: 663.0,
                geometry: Some(RouteGeometry::LngLat(vec![[10.18, 36.80], [10.19, 36.81]])),
            })
        }));

        let route = resolver
            .resolve_route(coord(36.80, 10.18), coord(36.81, 10.19))
            .await
            .unwrap();

        assert_eq!(route.distance_km, 5.23);
        assert_eq!(route.duration_min, 11.1);
        assert_eq!(route.source, RouteSource::Routed);
        assert_eq!(
            route.geometry,
            Some(vec![coord(36.80, 10.18), coord(36.81, 10.19)])
        );
    }

    #[tokio::test]
    async fn decodes_encoded_geometry() {
        let (resolver, _) = build(StubProvider::new(|| {
            Ok(RawRoute {
                distance_m: 1000.0,
                duration_s: 60.0,
                geometry: Some(RouteGeometry::Encoded("_p~iF~ps|U_ulLnnqC".to_string())),
            })
        }));

        let route = resolver
            .resolve_route(coord(38.5, -120.2), coord(40.7, -120.95))
            .await
            .unwrap();
        assert_eq!(
            route.geometry,
            Some(vec![coord(38.5, -120.2), coord(40.7, -120.95)])
        );
    }

    #[tokio::test]
    async fn malformed_encoded_geometry_is_decode_error() {
        let (resolver, _) = build(StubProvider::new(|| {
            Ok(RawRoute {
                distance_m: 1000.0,
                duration_s: 60.0,
                geometry: Some(RouteGeometry::Encoded("_p~iF".to_string())),
            })
        }));

        let err = resolver
            .resolve_route(coord(38.5, -120.2), coord(40.7, -120.95))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Decode(_)));
    }

    #[tokio::test]
    async fn rate_limited_falls_back_to_straight_line() {
        let (resolver, provider) = build(StubProvider::new(|| Err(RoutingError::RateLimited)));
        let start = coord(36.80, 10.18);
        let end = coord(36.81, 10.19);

        let route = resolver.resolve_route(start, end).await.unwrap();

        let expected_km = great_circle_distance_km(start, end);
        assert_eq!(route.distance_km, (expected_km * 100.0).round() / 100.0);
        assert_eq!(
            route.duration_min,
            (expected_km / 30.0 * 60.0 * 10.0).round() / 10.0
        );
        assert!(route.geometry.is_none());
        assert_eq!(route.source, RouteSource::StraightLine);
        assert_eq!(*provider.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn unreachable_falls_back_to_straight_line() {
        let (resolver, _) = build(StubProvider::new(|| {
            Err(RoutingError::Unreachable("connection refused".into()))
        }));

        let route = resolver
            .resolve_route(coord(36.80, 10.18), coord(36.81, 10.19))
            .await
            .unwrap();
        assert!(route.geometry.is_none());
        assert_eq!(route.distance_km, 1.42);
        assert_eq!(route.duration_min, 2.8);
    }

    #[tokio::test]
    async fn no_route_is_surfaced() {
        let (resolver, provider) = build(StubProvider::new(|| {
            Err(RoutingError::NoRoute {
                message: "Impossible route between points".into(),
            })
        }));

        let err = resolver
            .resolve_route(coord(36.80, 10.18), coord(37.0, 10.0))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::NoRoute("Impossible route between points".into())
        );
        assert_eq!(*provider.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn timeout_does_not_fall_back() {
        let (resolver, _) = build(StubProvider::new(|| Err(RoutingError::Timeout)));

        let err = resolver
            .resolve_route(coord(36.80, 10.18), coord(36.81, 10.19))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Resolution(_)));
    }

    #[tokio::test]
    async fn server_error_does_not_fall_back() {
        let (resolver, _) = build(StubProvider::new(|| {
            Err(RoutingError::Api {
                status: 500,
                message: "Internal Server Error".into(),
            })
        }));

        let err = resolver
            .resolve_route(coord(36.80, 10.18), coord(36.81, 10.19))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to get route information: routing API error 500: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn negative_distance_is_rejected() {
        let (resolver, _) = build(StubProvider::new(|| {
            Ok(RawRoute {
                distance_m: -1.0,
                duration_s: 60.0,
                geometry: None,
            })
        }));

        let err = resolver
            .resolve_route(coord(36.80, 10.18), coord(36.81, 10.19))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Resolution(_)));
    }
}
