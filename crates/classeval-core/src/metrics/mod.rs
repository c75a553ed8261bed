//! Classification metrics
//!
//! A [`MetricRequest`] names a metric and its parameters as they arrive in an
//! evaluation request. Resolving it against the engine configuration yields a
//! [`Metric`], which owns the aggregator and produces a [`MetricResult`].

mod accuracy;
mod confusion;
mod frequency;

pub use accuracy::{Accuracy, AccuracyResult, ClassStat};
pub use confusion::{
    ActualClass, ConfusionMatrixResult, DEFAULT_SIZE, MulticlassConfusionMatrix, PredictedClass,
};
pub use frequency::{LabelFrequencies, collect};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EvalError, EvalResult};
use crate::record::LabeledRecord;

/// Wire form of a metric entry: a name plus free-form parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// A requested metric with its parameters checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case", try_from = "MetricSpec")]
pub enum MetricRequest {
    Accuracy,
    MulticlassConfusionMatrix {
        /// Falls back to the configured default when unset
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<usize>,
    },
}

impl MetricRequest {
    /// Confusion matrix bounded to `size` classes
    pub fn confusion_matrix(size: usize) -> EvalResult<Self> {
        if size == 0 {
            return Err(EvalError::invalid_size(MulticlassConfusionMatrix::NAME, 0));
        }
        Ok(Self::MulticlassConfusionMatrix { size: Some(size) })
    }

    /// Confusion matrix at the configured default size
    pub fn default_confusion_matrix() -> Self {
        Self::MulticlassConfusionMatrix { size: None }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Accuracy => Accuracy::NAME,
            Self::MulticlassConfusionMatrix { .. } => MulticlassConfusionMatrix::NAME,
        }
    }

    /// Turn the request into a runnable metric
    pub fn resolve(&self, default_size: usize) -> EvalResult<Metric> {
        match *self {
            Self::Accuracy => Ok(Metric::Accuracy(Accuracy)),
            Self::MulticlassConfusionMatrix { size } => Ok(Metric::MulticlassConfusionMatrix(
                MulticlassConfusionMatrix::new(size.unwrap_or(default_size))?,
            )),
        }
    }
}

impl TryFrom<MetricSpec> for MetricRequest {
    type Error = EvalError;

    fn try_from(spec: MetricSpec) -> EvalResult<Self> {
        let mut params = spec.params;
        let request = match spec.name.as_str() {
            "accuracy" | "Accuracy" => Self::Accuracy,
            "multiclass_confusion_matrix" | "MulticlassConfusionMatrix" => {
                let size = match params.remove("size") {
                    None | Some(Value::Null) => None,
                    Some(value) => Some(parse_size(&value)?),
                };
                Self::MulticlassConfusionMatrix { size }
            }
            other => return Err(EvalError::unknown_metric(other)),
        };

        if let Some(param) = params.keys().next() {
            return Err(EvalError::invalid_request(format!(
                "[{}] does not support parameter [{}]",
                request.name(),
                param
            )));
        }
        Ok(request)
    }
}

fn parse_size(value: &Value) -> EvalResult<usize> {
    match value.as_i64() {
        Some(size) if size > 0 => usize::try_from(size)
            .map_err(|_| EvalError::invalid_size(MulticlassConfusionMatrix::NAME, size)),
        Some(size) => Err(EvalError::invalid_size(MulticlassConfusionMatrix::NAME, size)),
        None => Err(EvalError::invalid_request(format!(
            "[size] must be an integer, got {}",
            value
        ))),
    }
}

/// A metric ready to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Accuracy(Accuracy),
    MulticlassConfusionMatrix(MulticlassConfusionMatrix),
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accuracy(_) => Accuracy::NAME,
            Self::MulticlassConfusionMatrix(_) => MulticlassConfusionMatrix::NAME,
        }
    }

    /// Run the metric's own pass over `records`
    pub fn compute<I>(&self, records: I) -> EvalResult<MetricResult>
    where
        I: IntoIterator<Item = EvalResult<LabeledRecord>>,
    {
        match self {
            Self::Accuracy(metric) => metric.compute(records).map(MetricResult::Accuracy),
            Self::MulticlassConfusionMatrix(metric) => metric
                .compute(records)
                .map(MetricResult::MulticlassConfusionMatrix),
        }
    }
}

/// Named result of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric_name", rename_all = "snake_case")]
pub enum MetricResult {
    Accuracy(AccuracyResult),
    MulticlassConfusionMatrix(ConfusionMatrixResult),
}

impl MetricResult {
    pub fn metric_name(&self) -> &'static str {
        match self {
            Self::Accuracy(_) => Accuracy::NAME,
            Self::MulticlassConfusionMatrix(_) => MulticlassConfusionMatrix::NAME,
        }
    }

    pub fn as_accuracy(&self) -> Option<&AccuracyResult> {
        match self {
            Self::Accuracy(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_confusion_matrix(&self) -> Option<&ConfusionMatrixResult> {
        match self {
            Self::MulticlassConfusionMatrix(result) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> EvalResult<MetricRequest> {
        let spec: MetricSpec = serde_json::from_value(value).unwrap();
        MetricRequest::try_from(spec)
    }

    #[test]
    fn test_parse_metric_names() {
        assert_eq!(parse(json!({"name": "accuracy"})).unwrap(), MetricRequest::Accuracy);
        assert_eq!(parse(json!({"name": "Accuracy"})).unwrap(), MetricRequest::Accuracy);
        assert_eq!(
            parse(json!({"name": "MulticlassConfusionMatrix", "size": 3})).unwrap(),
            MetricRequest::MulticlassConfusionMatrix { size: Some(3) }
        );
        assert_eq!(
            parse(json!({"name": "multiclass_confusion_matrix"})).unwrap(),
            MetricRequest::default_confusion_matrix()
        );
    }

    #[test]
    fn test_parse_rejects_bad_metrics() {
        assert!(matches!(
            parse(json!({"name": "auc_roc"})),
            Err(EvalError::UnknownMetric { .. })
        ));
        assert!(matches!(
            parse(json!({"name": "multiclass_confusion_matrix", "size": 0})),
            Err(EvalError::InvalidSize { size: 0, .. })
        ));
        assert!(matches!(
            parse(json!({"name": "multiclass_confusion_matrix", "size": -4})),
            Err(EvalError::InvalidSize { size: -4, .. })
        ));
        assert!(parse(json!({"name": "multiclass_confusion_matrix", "size": "big"})).is_err());
        assert!(parse(json!({"name": "accuracy", "size": 3})).is_err());
    }

    #[test]
    fn test_request_serde_roundtrip_through_try_from() {
        let request: MetricRequest =
            serde_json::from_value(json!({"name": "multiclass_confusion_matrix", "size": 7})).unwrap();
        assert_eq!(request, MetricRequest::confusion_matrix(7).unwrap());

        let value = serde_json::to_value(MetricRequest::Accuracy).unwrap();
        assert_eq!(value, json!({"name": "accuracy"}));

        let err = serde_json::from_value::<MetricRequest>(json!({"name": "recall"})).unwrap_err();
        assert!(err.to_string().contains("Unknown metric: recall"));
    }

    #[test]
    fn test_resolve_uses_default_size() {
        let metric = MetricRequest::default_confusion_matrix().resolve(10).unwrap();
        assert_eq!(
            metric,
            Metric::MulticlassConfusionMatrix(MulticlassConfusionMatrix::new(10).unwrap())
        );
        assert!(MetricRequest::default_confusion_matrix().resolve(0).is_err());
        assert!(MetricRequest::confusion_matrix(0).is_err());
    }

    #[test]
    fn test_result_tagging() {
        let result = MetricResult::Accuracy(AccuracyResult {
            actual_classes: vec![ClassStat::new("cat", 2, 0.5)],
            overall_accuracy: 0.5,
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["metric_name"], "accuracy");
        assert_eq!(value["actual_classes"][0]["actual_class"], "cat");
        assert_eq!(result.metric_name(), "accuracy");
        assert!(result.as_confusion_matrix().is_none());
    }
}
