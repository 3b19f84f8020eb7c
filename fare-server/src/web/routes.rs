//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::pipeline::{PipelineError, TripRequest};
use crate::routing::RouteError;
use crate::scoring::EstimationError;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Default page size for the history listing.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Largest page the history listing will return.
const MAX_HISTORY_LIMIT: usize = 500;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .route("/api/history", get(history))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Taxi Price Predictor API is running",
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Predict the fare for a trip and record it.
async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    // Parse JSON manually so the body shows up in the log on failure
    let req: PredictRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid predict body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let record = state.pipeline.resolve_trip(&TripRequest::from(req)).await?;
    let response = PredictResponse::from(&record);
    state.store.save(record).await?;

    Ok(Json(response).into_response())
}

/// List stored predictions, newest first.
async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = parse_count(query.limit.as_deref())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let skip = parse_count(query.skip.as_deref()).unwrap_or(0);

    let records = state.store.list(limit, skip).await?;
    let total = state.store.count().await?;

    Ok(Json(HistoryResponse {
        predictions: records.into_iter().map(HistoryEntry::from).collect(),
        total,
        limit,
        skip,
    }))
}

fn parse_count(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NoRoute { message: String },
    NotFound,
    BadGateway { error: &'static str, message: String },
    Unavailable { message: String },
    Internal { error: &'static str, message: String },
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Validation(e) => AppError::BadRequest {
                message: e.to_string(),
            },
            PipelineError::Route(RouteError::NoRoute(message)) => AppError::NoRoute { message },
            PipelineError::Route(e) => AppError::BadGateway {
                error: "Route resolution failed",
                message: e.to_string(),
            },
            PipelineError::Estimation(EstimationError::Unavailable(message)) => {
                AppError::Unavailable { message }
            }
            PipelineError::Estimation(e @ EstimationError::Failure { .. }) => AppError::BadGateway {
                error: "Fare estimation failed",
                message: e.to_string(),
            },
            PipelineError::Estimation(e @ EstimationError::Invalid(_)) => AppError::Internal {
                error: "Failed to predict fare",
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            error: "Storage error",
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "Invalid request", Some(message))
            }
            AppError::NoRoute { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "No route found", Some(message))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Route not found", None),
            AppError::BadGateway { error, message } => {
                (StatusCode::BAD_GATEWAY, error, Some(message))
            }
            AppError::Unavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Fare estimator unavailable",
                Some(message),
            ),
            AppError::Internal { error, message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error, Some(message))
            }
        };

        if status.is_server_error() {
            error!(%status, error, message = message.as_deref().unwrap_or(""), "request failed");
        }

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });
        (status, body).into_response()
    }
}
