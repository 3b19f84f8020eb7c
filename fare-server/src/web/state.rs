//! Application state for the web layer.

use std::sync::Arc;

use crate::pipeline::TripResolutionPipeline;
use crate::store::TripStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Trip resolution pipeline
    pub pipeline: Arc<TripResolutionPipeline>,

    /// Where completed predictions are recorded
    pub store: Arc<dyn TripStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(pipeline: TripResolutionPipeline, store: Arc<dyn TripStore>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store,
        }
    }
}
