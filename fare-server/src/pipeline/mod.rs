//! Trip resolution: validate, route, detect region, score.
//!
//! The pipeline composes the route resolver, region detector, and fare
//! scorer into a single operation producing a [`TripRecord`]. It holds no
//! mutable state, so one instance can serve any number of concurrent
//! requests.

mod request;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::TripRecord;
use crate::region::RegionDetector;
use crate::routing::{RouteError, RouteResolver};
use crate::scoring::{EstimationError, Scorer};

pub use request::{PointInput, TripRequest, ValidTrip, ValidationError};

/// Errors from resolving a trip. Exactly one stage failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Estimation(#[from] EstimationError),
}

pub struct TripResolutionPipeline {
    resolver: RouteResolver,
    detector: RegionDetector,
    scorer: Arc<dyn Scorer>,
}

impl TripResolutionPipeline {
    pub fn new(resolver: RouteResolver, detector: RegionDetector, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            resolver,
            detector,
            scorer,
        }
    }

    /// Turn a raw request into a priced trip.
    ///
    /// Validation happens before any external call. The region is taken
    /// from the request's override when present, otherwise detected from
    /// the start point. The returned record is not persisted.
    #[instrument(skip_all, fields(time_bucket = %request.time_bucket))]
    pub async fn resolve_trip(&self, request: &TripRequest) -> Result<TripRecord, PipelineError> {
        let trip = request.validate()?;

        let route = self.resolver.resolve_route(trip.start, trip.end).await?;

        let region = match trip.region_override {
            Some(region) => {
                debug!(%region, "using region override");
                region
            }
            None => self.detector.detect_region(trip.start).await.to_string(),
        };

        let price = self
            .scorer
            .estimate(route.distance_km, route.duration_min, &region, trip.time_bucket)
            .await?;

        info!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            source = ?route.source,
            %region,
            price,
            "trip resolved"
        );

        Ok(TripRecord::new(
            trip.start,
            trip.end,
            route,
            region,
            trip.time_bucket,
            price,
        ))
    }
}
