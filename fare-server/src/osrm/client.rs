//! OSRM HTTP client.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::Coordinate;
use crate::routing::{RawRoute, RouteGeometry, RouteProvider, RoutingError};

use super::types::{OsrmGeometry, RouteResponse};

/// Default base URL (the public OSRM demo server).
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "driving";

/// How much of an unparseable body to keep in error messages.
const BODY_SNIPPET_LEN: usize = 500;

/// Geometry encoding requested from OSRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryFormat {
    /// GeoJSON LineString of `[lng, lat]` pairs.
    #[default]
    GeoJson,
    /// Encoded polyline, 5-decimal precision.
    Polyline,
}

impl GeometryFormat {
    fn as_query(&self) -> &'static str {
        match self {
            GeometryFormat::GeoJson => "geojson",
            GeometryFormat::Polyline => "polyline",
        }
    }
}

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Routing profile (e.g. "driving")
    pub profile: String,
    /// Geometry encoding to request
    pub geometry: GeometryFormat,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config pointing at the public OSRM server.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            geometry: GeometryFormat::default(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted server, or a mock in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the geometry encoding.
    pub fn with_geometry(mut self, geometry: GeometryFormat) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// OSRM route service client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
    geometry: GeometryFormat,
}

impl OsrmClient {
    /// Create a new OSRM client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RoutingError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            geometry: config.geometry,
        })
    }

    /// Build the route URL. OSRM expects `lng,lat;lng,lat`.
    fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            start.lng(),
            start.lat(),
            end.lng(),
            end.lat()
        )
    }

    /// Fetch the best driving route between two points.
    #[instrument(skip(self))]
    pub async fn get_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RawRoute, RoutingError> {
        let url = self.route_url(start, end);

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", self.geometry.as_query())])
            .send()
            .await
            .map_err(RoutingError::from_transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited);
        }

        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(RoutingError::Unreachable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(RoutingError::from_transport)?;

        // OSRM reports NoRoute with a 400 status, so try to parse the body
        // before treating a non-success status as an API error.
        let parsed: RouteResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(RoutingError::Json {
                    message: e.to_string(),
                    body: Some(body.chars().take(BODY_SNIPPET_LEN).collect()),
                });
            }
            Err(_) => {
                return Err(RoutingError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(BODY_SNIPPET_LEN).collect(),
                });
            }
        };

        match parsed.code.as_str() {
            "Ok" if status.is_success() => {}
            "NoRoute" | "NoSegment" => {
                return Err(RoutingError::NoRoute {
                    message: parsed.message.unwrap_or(parsed.code),
                });
            }
            _ => {
                return Err(RoutingError::Api {
                    status: status.as_u16(),
                    message: parsed.message.unwrap_or(parsed.code),
                });
            }
        }

        let Some(route) = parsed.routes.into_iter().next() else {
            return Err(RoutingError::NoRoute {
                message: "routing service returned no routes".to_string(),
            });
        };

        debug!(
            distance_m = route.distance,
            duration_s = route.duration,
            "OSRM route received"
        );

        let geometry = route.geometry.map(|g| match g {
            OsrmGeometry::Encoded(encoded) => RouteGeometry::Encoded(encoded),
            OsrmGeometry::GeoJson(line) => RouteGeometry::LngLat(line.coordinates),
        });

        Ok(RawRoute {
            distance_m: route.distance,
            duration_s: route.duration,
            geometry,
        })
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RawRoute, RoutingError> {
        self.get_route(start, end).await
    }
}
