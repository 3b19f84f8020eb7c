//! Fare scoring.
//!
//! The fare model is an external collaborator. [`Scorer`] is the narrow
//! seam the pipeline depends on; [`ProcessScorer`] implements it by
//! running the model's command-line entry point once per estimate.

mod output;
mod process;

use async_trait::async_trait;

use crate::domain::TimeBucket;

pub use output::parse_scorer_output;
pub use process::{ProcessScorer, ProcessScorerConfig};

/// Errors from fare estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// The scorer ran but reported an error or returned an unusable price.
    #[error("fare estimation error: {0}")]
    Invalid(String),

    /// The scorer crashed, exited non-zero, or timed out.
    #[error("fare scorer failed ({reason}): {stderr}")]
    Failure { reason: String, stderr: String },

    /// The scorer could not be started at all. This is a configuration
    /// problem and is never retried.
    #[error("fare scorer unavailable: {0}")]
    Unavailable(String),
}

/// Maps trip features to a predicted price.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Predict the fare for a trip. The returned price is finite and
    /// non-negative.
    async fn estimate(
        &self,
        distance_km: f64,
        duration_min: f64,
        region: &str,
        time_bucket: TimeBucket,
    ) -> Result<f64, EstimationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EstimationError::Invalid("model not loaded".into());
        assert_eq!(err.to_string(), "fare estimation error: model not loaded");

        let err = EstimationError::Failure {
            reason: "exit status 1".into(),
            stderr: "Traceback".into(),
        };
        assert_eq!(err.to_string(), "fare scorer failed (exit status 1): Traceback");

        let err = EstimationError::Unavailable("python not found".into());
        assert!(err.to_string().contains("python not found"));
    }
}
