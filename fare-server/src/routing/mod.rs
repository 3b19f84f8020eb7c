//! Route acquisition.
//!
//! A [`RouteResolver`] asks a [`RouteProvider`] (the live routing service)
//! for the driving route and falls back to a great-circle estimate only
//! when the provider is rate limited or unreachable.

mod provider;
mod resolver;

pub use provider::{RawRoute, RouteGeometry, RouteProvider, RoutingError};
pub use resolver::{FALLBACK_SPEED_KMH, RouteError, RouteResolver};
