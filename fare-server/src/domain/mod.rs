//! Domain types for the fare estimator.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod coordinate;
mod region;
mod route;
mod time_bucket;
mod trip;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use region::Region;
pub use route::{RouteInfo, RouteSource, round_to};
pub use time_bucket::{InvalidTimeBucket, TimeBucket};
pub use trip::{TripId, TripRecord};
