//! Scorer output parsing.

use serde::Deserialize;

use super::EstimationError;

/// The single JSON object a scorer writes to its output channel.
#[derive(Debug, Deserialize)]
struct ScorerOutput {
    #[serde(default)]
    predicted_price: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract the predicted price from scorer output.
///
/// The output must be one JSON object carrying either `predicted_price`
/// (a non-negative number) or `error` (a message). Extra fields are
/// ignored.
///
/// # Examples
///
/// ```
/// use fare_server::scoring::{EstimationError, parse_scorer_output};
///
/// assert_eq!(parse_scorer_output(r#"{"predicted_price": 8.4}"#), Ok(8.4));
/// assert_eq!(
///     parse_scorer_output(r#"{"error": "model not loaded"}"#),
///     Err(EstimationError::Invalid("model not loaded".to_string()))
/// );
/// ```
pub fn parse_scorer_output(stdout: &str) -> Result<f64, EstimationError> {
    let output: ScorerOutput = serde_json::from_str(stdout.trim()).map_err(|e| {
        EstimationError::Invalid(format!("failed to parse scorer output: {e}"))
    })?;

    if let Some(error) = output.error {
        return Err(EstimationError::Invalid(error));
    }

    let price = match output.predicted_price {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(other) => {
            return Err(EstimationError::Invalid(format!(
                "predicted_price is not a number: {other}"
            )));
        }
        None => {
            return Err(EstimationError::Invalid(
                "scorer output has no predicted_price".to_string(),
            ));
        }
    };

    match price {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        Some(p) => Err(EstimationError::Invalid(format!(
            "predicted_price must be non-negative, got {p}"
        ))),
        None => Err(EstimationError::Invalid(
            "predicted_price is out of range".to_string(),
        )),
    }
}
