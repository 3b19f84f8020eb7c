//! OSRM (Open Source Routing Machine) client.
//!
//! Queries the OSRM `route` service for driving distance, duration, and
//! full route geometry between two points.
//!
//! Key characteristics of OSRM:
//! - Coordinates in the URL are `longitude,latitude`, not the other way round
//! - Unroutable pairs come back as HTTP 400 with `code = "NoRoute"`; that is
//!   an answer, not a failure
//! - The public demo server rate limits aggressively (HTTP 429)

mod client;
mod types;

pub use client::{GeometryFormat, OsrmClient, OsrmConfig};
pub use types::{OsrmGeometry, OsrmLineString, OsrmRoute, RouteResponse};
