//! CLI command implementations

pub mod evaluate;
pub mod request;

use std::sync::Arc;

use anyhow::{Context, Result};
use classeval_core::{
    EngineConfig, EvaluationRequest, EvaluationResponse, Evaluator, RecordSource, ReportFormat,
    generate_report,
};
use colored::Colorize;
use tokio_util::sync::CancellationToken;

/// Run an evaluation, cancelling it on Ctrl-C
pub(crate) async fn execute(
    config: EngineConfig,
    source: Arc<dyn RecordSource>,
    request: &EvaluationRequest,
) -> Result<EvaluationResponse> {
    let evaluator = Evaluator::new(config)?;
    let cancel = CancellationToken::new();

    let signal_token = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Interrupted, cancelling evaluation...".yellow());
            signal_token.cancel();
        }
    });

    let result = evaluator.evaluate_concurrent(source, request, cancel).await;
    watcher.abort();
    Ok(result?)
}

/// Print a response in the requested format
pub(crate) fn print_response(response: &EvaluationResponse, format: &str) -> Result<()> {
    let format = ReportFormat::from_str(format).unwrap_or(ReportFormat::Table);
    let report = generate_report(response, format).context("Failed to render report")?;
    println!("{}", report);
    Ok(())
}

/// Print the effective engine configuration as JSON
pub fn show_config(config: &EngineConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
