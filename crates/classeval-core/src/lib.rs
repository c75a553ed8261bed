//! Classification evaluation engine
//!
//! Computes accuracy and size-bounded multiclass confusion matrices over a
//! stream of records carrying an actual and a predicted class label.
//!
//! # Features
//!
//! - **Label normalization**: keyword, integer and boolean fields compared as
//!   canonical strings
//! - **Accuracy**: per actual class and overall
//! - **Multiclass confusion matrix**: top-`size` actual and predicted classes,
//!   with counts for what falls outside the bound
//! - **Coordinator**: runs requested metrics serially or on parallel workers,
//!   preserving request order
//! - **Report Generation**: JSON, Markdown and table output
//!
//! # Example
//!
//! ```rust,ignore
//! use classeval_core::{Classification, EvaluationRequest, Evaluator, MemorySource, MetricRequest};
//!
//! let request = EvaluationRequest::classification(
//!     Classification::new("animal", "animal_prediction")
//!         .with_metrics(vec![MetricRequest::Accuracy, MetricRequest::confusion_matrix(3)?]),
//! );
//! let response = Evaluator::default().evaluate(&source, &request)?;
//! ```

pub mod error;
pub mod metrics;
pub mod record;
pub mod report;
pub mod runner;

// Re-exports for convenience
pub use error::{EvalError, EvalResult};
pub use metrics::{
    Accuracy, AccuracyResult, ActualClass, ClassStat, ConfusionMatrixResult, Metric,
    MetricRequest, MetricResult, MulticlassConfusionMatrix, PredictedClass,
};
pub use record::{
    CachedSource, FieldPair, JsonLinesSource, LabeledRecord, MemorySource, RawRecord,
    RecordSource,
};
pub use report::{ReportFormat, generate_report};
pub use runner::{Classification, EngineConfig, Evaluation, EvaluationRequest, EvaluationResponse, Evaluator};
