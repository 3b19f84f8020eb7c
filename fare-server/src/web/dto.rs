//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, TimeBucket, TripRecord};
use crate::pipeline::{PointInput, TripRequest};

/// Body of `POST /api/predict`.
///
/// Every field is optional at this layer so that missing values are
/// reported by trip validation rather than as a JSON shape error.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub start: Option<PointInput>,
    #[serde(default)]
    pub end: Option<PointInput>,
    #[serde(default)]
    pub time_of_day: Option<String>,
    /// Region to price in. Absent or null means detect from `start`.
    #[serde(default)]
    pub city: Option<String>,
}

impl From<PredictRequest> for TripRequest {
    fn from(req: PredictRequest) -> Self {
        TripRequest {
            start: req.start.unwrap_or_default(),
            end: req.end.unwrap_or_default(),
            time_bucket: req.time_of_day.unwrap_or_default(),
            region_override: req.city,
        }
    }
}

/// Response to a successful prediction.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: u64,
    pub distance_km: f64,
    pub duration_min: f64,
    pub predicted_price: f64,
    pub city: String,
    pub time_of_day: TimeBucket,
    pub start: Coordinate,
    pub end: Coordinate,
    /// Route path as `{lat, lng}` points. Absent for straight-line estimates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<Coordinate>>,
    /// `true` when the routing service was unavailable and the distance is
    /// a straight-line estimate.
    pub approximate: bool,
}

impl From<&TripRecord> for PredictResponse {
    fn from(record: &TripRecord) -> Self {
        Self {
            id: record.id.get(),
            distance_km: record.route.distance_km,
            duration_min: record.route.duration_min,
            predicted_price: record.predicted_price,
            city: record.region.clone(),
            time_of_day: record.time_bucket,
            start: record.start,
            end: record.end,
            geometry: record.route.geometry.clone(),
            approximate: record.route.source == crate::domain::RouteSource::StraightLine,
        }
    }
}

/// Query string of `GET /api/history`.
///
/// Kept as raw strings: unparseable values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
    pub skip: Option<String>,
}

/// One stored prediction in the history listing.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub distance_km: f64,
    pub duration_min: f64,
    pub predicted_price: f64,
    pub city: String,
    pub time_of_day: TimeBucket,
    pub datetime: DateTime<Utc>,
}

impl From<TripRecord> for HistoryEntry {
    fn from(record: TripRecord) -> Self {
        Self {
            id: record.id.get(),
            start_lat: record.start.lat(),
            start_lng: record.start.lng(),
            end_lat: record.end.lat(),
            end_lng: record.end.lng(),
            distance_km: record.route.distance_km,
            duration_min: record.route.duration_min,
            predicted_price: record.predicted_price,
            city: record.region,
            time_of_day: record.time_bucket,
            datetime: record.created_at,
        }
    }
}

/// Response to `GET /api/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub predictions: Vec<HistoryEntry>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

/// Response to `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,
    /// Details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
