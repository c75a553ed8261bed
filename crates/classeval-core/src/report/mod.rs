//! Report generation for evaluation responses
//!
//! Renders responses as JSON, Markdown or a plain terminal table.

mod json;
mod markdown;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

use std::collections::BTreeSet;

use crate::error::EvalResult;
use crate::metrics::{ActualClass, ConfusionMatrixResult, MetricResult};
use crate::runner::EvaluationResponse;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Table,
}

impl ReportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "table" => Some(ReportFormat::Table),
            _ => None,
        }
    }
}

/// Generate a report in the specified format
pub fn generate_report(response: &EvaluationResponse, format: ReportFormat) -> EvalResult<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(response),
        ReportFormat::Markdown => MarkdownReporter::generate(response),
        ReportFormat::Table => Ok(generate_table(response)),
    }
}

/// Union of predicted labels shown in any row, ascending
fn predicted_columns(result: &ConfusionMatrixResult) -> Vec<String> {
    result
        .confusion_matrix
        .iter()
        .flat_map(|row| row.predicted_classes.iter().map(|p| p.predicted_class.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn cell(row: &ActualClass, predicted: &str) -> u64 {
    row.predicted_classes
        .iter()
        .find(|p| p.predicted_class == predicted)
        .map_or(0, |p| p.count)
}

/// Generate a simple table report for terminal output
fn generate_table(response: &EvaluationResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{:=<70}\n",
        format!("= Evaluation: {} ", response.evaluation_name)
    ));

    for metric in &response.metrics {
        match metric {
            MetricResult::Accuracy(result) => {
                output.push_str("\nACCURACY\n");
                output.push_str(&format!("{:-<70}\n", ""));
                output.push_str(&format!("{:<30} {:>12} {:>12}\n", "Class", "Count", "Accuracy"));
                output.push_str(&format!("{:-<70}\n", ""));
                for class in &result.actual_classes {
                    output.push_str(&format!(
                        "{:<30} {:>12} {:>11.1}%\n",
                        class.actual_class,
                        class.actual_class_doc_count,
                        class.accuracy * 100.0
                    ));
                }
                output.push_str(&format!("{:-<70}\n", ""));
                output.push_str(&format!(
                    "Overall accuracy: {:.1}%\n",
                    result.overall_accuracy * 100.0
                ));
            }
            MetricResult::MulticlassConfusionMatrix(result) => {
                let columns = predicted_columns(result);
                output.push_str("\nCONFUSION MATRIX (rows: actual, columns: predicted)\n");
                output.push_str(&format!("{:-<70}\n", ""));

                output.push_str(&format!("{:<16}", ""));
                for column in &columns {
                    output.push_str(&format!(" {:>10}", column));
                }
                output.push_str(&format!(" {:>10} {:>10}\n", "(other)", "total"));

                for row in &result.confusion_matrix {
                    output.push_str(&format!("{:<16}", row.actual_class));
                    for column in &columns {
                        output.push_str(&format!(" {:>10}", cell(row, column)));
                    }
                    output.push_str(&format!(
                        " {:>10} {:>10}\n",
                        row.other_predicted_class_doc_count, row.actual_class_doc_count
                    ));
                }
                output.push_str(&format!("{:-<70}\n", ""));
                output.push_str(&format!(
                    "Other actual classes: {}\n",
                    result.other_actual_class_count
                ));
            }
        }
    }

    output.push_str(&format!("{:=<70}\n", ""));
    output
}
