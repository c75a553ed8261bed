//! `classeval evaluate`: evaluate a record file from command-line options

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use classeval_core::{
    CachedSource, Classification, EngineConfig, EvalError, EvaluationRequest, JsonLinesSource,
    MetricRequest, RecordSource,
};

use crate::args::MetricArg;

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    pub records: PathBuf,
    pub actual_field: String,
    pub predicted_field: String,
    pub metrics: Vec<MetricArg>,
    pub size: Option<i64>,
    pub cache: bool,
}

/// Validate a size given on the command line
fn parse_size(size: i64) -> Result<usize, EvalError> {
    if size <= 0 {
        return Err(EvalError::invalid_size("multiclass_confusion_matrix", size));
    }
    Ok(size as usize)
}

/// Build the metric list; `None` means the configured defaults
///
/// A size with only non-matrix metrics selected would have no effect and is
/// rejected.
fn metric_requests(
    metrics: &[MetricArg],
    size: Option<usize>,
) -> Result<Option<Vec<MetricRequest>>, EvalError> {
    if metrics.is_empty() {
        return Ok(None);
    }
    if size.is_some() && !metrics.contains(&MetricArg::ConfusionMatrix) {
        return Err(EvalError::invalid_request(
            "--size requires --metric confusion-matrix",
        ));
    }
    Ok(Some(
        metrics
            .iter()
            .map(|metric| match metric {
                MetricArg::Accuracy => MetricRequest::Accuracy,
                MetricArg::ConfusionMatrix => MetricRequest::MulticlassConfusionMatrix { size },
            })
            .collect(),
    ))
}

/// Run an evaluation described by command-line options
pub async fn run(config: EngineConfig, options: EvaluateOptions, format: &str) -> Result<()> {
    let size = options.size.map(parse_size).transpose()?;
    let config = match size {
        Some(size) if options.metrics.is_empty() => config.with_default_size(size),
        _ => config,
    };

    let mut classification = Classification::new(&options.actual_field, &options.predicted_field);
    classification.metrics = metric_requests(&options.metrics, size)?;
    let request = EvaluationRequest::classification(classification)
        .with_source(options.records.display().to_string());

    let source: Arc<dyn RecordSource> = if options.cache {
        Arc::new(CachedSource::new(JsonLinesSource::new(&options.records)))
    } else {
        Arc::new(JsonLinesSource::new(&options.records))
    };

    tracing::debug!(records = %options.records.display(), "evaluating record file");
    let response = super::execute(config, source, &request).await?;
    super::print_response(&response, format)
}
