//! Evaluation response

use serde::{Deserialize, Serialize};

use crate::metrics::{AccuracyResult, ConfusionMatrixResult, MetricResult};

/// Result of one evaluation: its name and one result per requested metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub evaluation_name: String,
    /// Results in request order
    pub metrics: Vec<MetricResult>,
}

impl EvaluationResponse {
    pub fn new(evaluation_name: impl Into<String>, metrics: Vec<MetricResult>) -> Self {
        Self {
            evaluation_name: evaluation_name.into(),
            metrics,
        }
    }

    pub fn accuracy(&self) -> Option<&AccuracyResult> {
        self.metrics.iter().find_map(MetricResult::as_accuracy)
    }

    pub fn confusion_matrix(&self) -> Option<&ConfusionMatrixResult> {
        self.metrics.iter().find_map(MetricResult::as_confusion_matrix)
    }

    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(MetricResult::metric_name).collect()
    }
}
