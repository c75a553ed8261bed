//! Evaluation coordinator
//!
//! Resolves the requested metrics, runs each one over its own scan of the
//! record source and returns the results in request order. Either every
//! metric completes or the whole evaluation fails with a single error.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::{Classification, EngineConfig, Evaluation, EvaluationRequest, EvaluationResponse};
use crate::error::{EvalError, EvalResult};
use crate::metrics::{Metric, MetricResult};
use crate::record::{FieldPair, RecordSource, labeled};

/// Runs classification evaluations against record sources
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EngineConfig,
}

impl Evaluator {
    /// Create an evaluator, rejecting an invalid configuration
    pub fn new(config: EngineConfig) -> EvalResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a classification and resolve its metrics, without scanning
    pub fn plan(&self, classification: &Classification) -> EvalResult<Vec<Metric>> {
        classification.fields().validate()?;

        let requests = match &classification.metrics {
            Some(metrics) if metrics.is_empty() => {
                return Err(EvalError::invalid_request("[metrics] must not be empty"));
            }
            Some(metrics) => metrics.as_slice(),
            None => self.config.default_metrics.as_slice(),
        };

        requests
            .iter()
            .map(|request| request.resolve(self.config.default_confusion_matrix_size))
            .collect()
    }

    /// Run every metric serially on the calling thread
    pub fn evaluate(
        &self,
        source: &dyn RecordSource,
        request: &EvaluationRequest,
    ) -> EvalResult<EvaluationResponse> {
        self.evaluate_with_cancel(source, request, &CancellationToken::new())
    }

    /// Serial evaluation that aborts once `cancel` fires
    pub fn evaluate_with_cancel(
        &self,
        source: &dyn RecordSource,
        request: &EvaluationRequest,
        cancel: &CancellationToken,
    ) -> EvalResult<EvaluationResponse> {
        let Evaluation::Classification(classification) = &request.evaluation;
        let metrics = self.plan(classification)?;
        let fields = classification.fields();
        let start = Instant::now();

        tracing::info!(
            evaluation = request.evaluation.name(),
            source = source.name(),
            metrics = metrics.len(),
            "starting evaluation"
        );

        let results = run_serial(&metrics, source, &fields, cancel)?;
        Ok(finish(request, results, start))
    }

    /// Run metrics on blocking worker threads, bounded by `max_parallel_metrics`
    ///
    /// The first failing metric cancels the others. A cancellation of
    /// `cancel` by the caller aborts every in-flight scan.
    pub async fn evaluate_concurrent(
        &self,
        source: Arc<dyn RecordSource>,
        request: &EvaluationRequest,
        cancel: CancellationToken,
    ) -> EvalResult<EvaluationResponse> {
        let Evaluation::Classification(classification) = &request.evaluation;
        let metrics = self.plan(classification)?;
        let fields = classification.fields();
        let start = Instant::now();

        tracing::info!(
            evaluation = request.evaluation.name(),
            source = source.name(),
            metrics = metrics.len(),
            parallel = self.config.parallel,
            "starting evaluation"
        );

        if !self.config.parallel || metrics.len() <= 1 {
            let results = tokio::task::spawn_blocking(move || {
                run_serial(&metrics, source.as_ref(), &fields, &cancel)
            })
            .await
            .map_err(|e| EvalError::Worker {
                message: e.to_string(),
            })??;
            return Ok(finish(request, results, start));
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel_metrics));
        let scope = cancel.child_token();

        let tasks = metrics.into_iter().map(|metric| {
            let source = Arc::clone(&source);
            let fields = fields.clone();
            let scope = scope.clone();
            let semaphore = Arc::clone(&semaphore);

            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| EvalError::Cancelled)?;
                if scope.is_cancelled() {
                    return Err(EvalError::Cancelled);
                }

                let worker_scope = scope.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    run_metric(&metric, source.as_ref(), &fields, &worker_scope)
                })
                .await
                .map_err(|e| EvalError::Worker {
                    message: e.to_string(),
                })
                .and_then(|result| result);

                if let Err(e) = &outcome {
                    tracing::debug!(metric = metric.name(), error = %e, "metric failed");
                    scope.cancel();
                }
                outcome
            }
        });

        let outcomes = futures::future::join_all(tasks).await;
        let results = first_failure(outcomes)?;
        Ok(finish(request, results, start))
    }
}

fn run_metric(
    metric: &Metric,
    source: &dyn RecordSource,
    fields: &FieldPair,
    cancel: &CancellationToken,
) -> EvalResult<MetricResult> {
    let stream = source.scan(fields)?;
    let result = metric.compute(labeled(stream, fields, cancel))?;
    tracing::debug!(metric = metric.name(), "metric complete");
    Ok(result)
}

fn run_serial(
    metrics: &[Metric],
    source: &dyn RecordSource,
    fields: &FieldPair,
    cancel: &CancellationToken,
) -> EvalResult<Vec<MetricResult>> {
    metrics
        .iter()
        .map(|metric| run_metric(metric, source, fields, cancel))
        .collect()
}

/// Collapse per-metric outcomes into one result
///
/// A root-cause error wins over the cancellations it triggered in sibling
/// metrics; among root causes the earliest in request order is reported.
fn first_failure(outcomes: Vec<EvalResult<MetricResult>>) -> EvalResult<Vec<MetricResult>> {
    let mut results = Vec::with_capacity(outcomes.len());
    let mut cancelled = false;
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(EvalError::Cancelled) => cancelled = true,
            Err(e) => return Err(e),
        }
    }
    if cancelled {
        return Err(EvalError::Cancelled);
    }
    Ok(results)
}

fn finish(
    request: &EvaluationRequest,
    results: Vec<MetricResult>,
    start: Instant,
) -> EvaluationResponse {
    tracing::info!(
        evaluation = request.evaluation.name(),
        metrics = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "evaluation complete"
    );
    EvaluationResponse::new(request.evaluation.name(), results)
}
