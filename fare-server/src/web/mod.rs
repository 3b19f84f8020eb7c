//! Web layer for the fare predictor.
//!
//! Exposes fare prediction and prediction history as a JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
