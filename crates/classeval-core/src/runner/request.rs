//! Evaluation requests
//!
//! ```json
//! {
//!   "source": "animals.jsonl",
//!   "evaluation": {
//!     "classification": {
//!       "actual_field": "animal_name",
//!       "predicted_field": "animal_name_prediction",
//!       "metrics": [{"name": "accuracy"}, {"name": "multiclass_confusion_matrix", "size": 3}]
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};
use crate::metrics::{MetricRequest, MetricSpec};
use crate::record::FieldPair;

/// Classification evaluation over an actual and a predicted field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub actual_field: String,
    pub predicted_field: String,
    /// Metrics in response order; `None` selects the configured defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricRequest>>,
}

impl Classification {
    pub const NAME: &'static str = "classification";

    pub fn new(actual_field: impl Into<String>, predicted_field: impl Into<String>) -> Self {
        Self {
            actual_field: actual_field.into(),
            predicted_field: predicted_field.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Vec<MetricRequest>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn fields(&self) -> FieldPair {
        FieldPair::new(&self.actual_field, &self.predicted_field)
    }
}

/// Evaluation kinds; only classification is handled by this engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Classification(Classification),
}

impl Evaluation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classification(_) => Classification::NAME,
        }
    }
}

/// A complete evaluation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRequest {
    /// Identifier of the record source, if the caller resolves it by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub evaluation: Evaluation,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassificationDocument {
    actual_field: String,
    predicted_field: String,
    #[serde(default)]
    metrics: Option<Vec<MetricSpec>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum EvaluationDocument {
    Classification(ClassificationDocument),
}

#[derive(Deserialize)]
struct RequestDocument {
    #[serde(default)]
    source: Option<String>,
    evaluation: EvaluationDocument,
}

impl EvaluationRequest {
    pub fn classification(classification: Classification) -> Self {
        Self {
            source: None,
            evaluation: Evaluation::Classification(classification),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Parse a JSON request, reporting metric problems as typed errors
    pub fn from_json(json: &str) -> EvalResult<Self> {
        let document: RequestDocument = serde_json::from_str(json)
            .map_err(|e| EvalError::invalid_request(format!("malformed request: {}", e)))?;

        let evaluation = match document.evaluation {
            EvaluationDocument::Classification(doc) => {
                let metrics = doc
                    .metrics
                    .map(|specs| {
                        specs
                            .into_iter()
                            .map(MetricRequest::try_from)
                            .collect::<EvalResult<Vec<_>>>()
                    })
                    .transpose()?;
                Evaluation::Classification(Classification {
                    actual_field: doc.actual_field,
                    predicted_field: doc.predicted_field,
                    metrics,
                })
            }
        };

        Ok(Self {
            source: document.source,
            evaluation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_request() {
        let request = EvaluationRequest::from_json(
            r#"{
                "source": "animals",
                "evaluation": {
                    "classification": {
                        "actual_field": "animal_name",
                        "predicted_field": "animal_name_prediction",
                        "metrics": [
                            {"name": "Accuracy"},
                            {"name": "multiclass_confusion_matrix", "size": 3}
                        ]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(request.source.as_deref(), Some("animals"));
        let Evaluation::Classification(classification) = &request.evaluation;
        assert_eq!(classification.fields(), FieldPair::new("animal_name", "animal_name_prediction"));
        assert_eq!(
            classification.metrics,
            Some(vec![
                MetricRequest::Accuracy,
                MetricRequest::confusion_matrix(3).unwrap()
            ])
        );
    }

    #[test]
    fn test_parse_defaults_metrics() {
        let request = EvaluationRequest::from_json(
            r#"{"evaluation": {"classification": {"actual_field": "a", "predicted_field": "p"}}}"#,
        )
        .unwrap();
        assert_eq!(request.evaluation.name(), "classification");
        let Evaluation::Classification(classification) = request.evaluation;
        assert!(classification.metrics.is_none());
    }

    #[test]
    fn test_parse_errors_are_typed() {
        let unknown = EvaluationRequest::from_json(
            r#"{"evaluation": {"classification": {"actual_field": "a", "predicted_field": "p",
                "metrics": [{"name": "mean_squared_error"}]}}}"#,
        )
        .unwrap_err();
        assert!(matches!(unknown, EvalError::UnknownMetric { .. }));

        let negative = EvaluationRequest::from_json(
            r#"{"evaluation": {"classification": {"actual_field": "a", "predicted_field": "p",
                "metrics": [{"name": "multiclass_confusion_matrix", "size": -1}]}}}"#,
        )
        .unwrap_err();
        assert!(matches!(negative, EvalError::InvalidSize { size: -1, .. }));

        let missing = EvaluationRequest::from_json(
            r#"{"evaluation": {"classification": {"actual_field": "a"}}}"#,
        )
        .unwrap_err();
        assert!(missing.is_configuration_error());

        let other_kind = EvaluationRequest::from_json(
            r#"{"evaluation": {"regression": {"actual_field": "a", "predicted_field": "p"}}}"#,
        )
        .unwrap_err();
        assert!(other_kind.is_configuration_error());
    }
}
