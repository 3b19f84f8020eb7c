//! Completed trip estimates.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, RouteInfo, TimeBucket};

static NEXT_TRIP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for a trip record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(u64);

impl TripId {
    /// Allocate the next identifier. Identifiers increase monotonically.
    pub fn next() -> Self {
        Self(NEXT_TRIP_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully resolved fare estimate.
///
/// Only built once routing, region detection, and scoring have all
/// succeeded; there is no way to construct a partially populated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: TripId,
    pub start: Coordinate,
    pub end: Coordinate,
    pub route: RouteInfo,
    /// Region name used for pricing (detected or overridden).
    pub region: String,
    pub time_bucket: TimeBucket,
    pub predicted_price: f64,
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    /// Assemble a record stamped with the current time.
    pub fn new(
        start: Coordinate,
        end: Coordinate,
        route: RouteInfo,
        region: String,
        time_bucket: TimeBucket,
        predicted_price: f64,
    ) -> Self {
        Self {
            id: TripId::next(),
            start,
            end,
            route,
            region,
            time_bucket,
            predicted_price,
            created_at: Utc::now(),
        }
    }
}
