//! JSON report generation

use crate::error::EvalResult;
use crate::runner::EvaluationResponse;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generate a pretty-printed JSON report
    pub fn generate(response: &EvaluationResponse) -> EvalResult<String> {
        Ok(serde_json::to_string_pretty(response)?)
    }

    /// Generate a compact JSON report (no pretty printing)
    pub fn generate_compact(response: &EvaluationResponse) -> EvalResult<String> {
        Ok(serde_json::to_string(response)?)
    }
}
