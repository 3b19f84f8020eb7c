//! Nominatim HTTP client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::Coordinate;
use crate::region::{Address, GeocodingError, ReverseGeocoder};

/// Default base URL for the public Nominatim server.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default `User-Agent`.
const DEFAULT_USER_AGENT: &str = "Taxi-Price-Predictor/1.0";

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Identifying user agent, required by Nominatim
    pub user_agent: String,
    /// Preferred language for place names. French names match the alias
    /// table; the server default for Tunisia is Arabic.
    pub accept_language: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config pointing at the public Nominatim server.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "fr".to_string(),
            timeout_secs: 5,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw `/reverse` response. Nominatim reports misses as `{"error": ...}`
/// with a 200 status.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<String>,
}

/// Nominatim reverse-geocoding client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    accept_language: String,
}

impl NominatimClient {
    /// Create a new Nominatim client.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            accept_language: config.accept_language,
        })
    }

    /// Look up the structured address for a point.
    #[instrument(skip(self))]
    pub async fn reverse_address(&self, point: Coordinate) -> Result<Address, GeocodingError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.lat().to_string()),
                ("lon", point.lng().to_string()),
                ("addressdetails", "1".to_string()),
                ("accept-language", self.accept_language.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GeocodingError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if let Some(error) = body.error {
            debug!(%error, "Nominatim returned no address");
            return Err(GeocodingError::NotFound(point));
        }

        body.address.ok_or(GeocodingError::NotFound(point))
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, point: Coordinate) -> Result<Address, GeocodingError> {
        self.reverse_address(point).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn point() -> Coordinate {
        Coordinate::new(36.8, 10.18).unwrap()
    }

    fn client_for(server: &MockServer) -> NominatimClient {
        NominatimClient::new(NominatimConfig::new().with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, "Taxi-Price-Predictor/1.0");
        assert_eq!(config.accept_language, "fr");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_builder() {
        let config = NominatimConfig::new()
            .with_base_url("http://localhost:8080")
            .with_user_agent("test-agent")
            .with_timeout(1);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout_secs, 1);
    }

    #[tokio::test]
    async fn reverse_returns_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "36.8"))
            .and(query_param("lon", "10.18"))
            .and(query_param("addressdetails", "1"))
            .and(header("user-agent", "Taxi-Price-Predictor/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"place_id": 1, "display_name": "Tunis, Tunisie",
                    "address": {"city": "Tunis", "state": "Gouvernorat Tunis", "country": "Tunisie"}}"#,
            ))
            .mount(&server)
            .await;

        let address = client_for(&server).reverse_address(point()).await.unwrap();
        assert_eq!(address.city.as_deref(), Some("Tunis"));
        assert_eq!(address.state.as_deref(), Some("Gouvernorat Tunis"));
    }

    #[tokio::test]
    async fn error_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#))
            .mount(&server)
            .await;

        let err = client_for(&server).reverse_address(point()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::NotFound(_)));
    }

    #[tokio::test]
    async fn rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).reverse_address(point()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server).reverse_address(point()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::RequestFailed { status: 502 }));
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).reverse_address(point()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::ParseError(_)));
    }

    #[tokio::test]
    async fn detector_uses_nominatim_answer() {
        use crate::region::RegionDetector;
        use std::sync::Arc;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"address": {"town": "Gabès", "country": "Tunisie"}}"#,
            ))
            .mount(&server)
            .await;

        let detector = RegionDetector::new(Arc::new(client_for(&server)));
        assert_eq!(detector.detect_region(point()).await, "Gabes");
    }
}
