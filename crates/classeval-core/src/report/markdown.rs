//! Markdown report generation

use crate::error::EvalResult;
use crate::metrics::{AccuracyResult, ConfusionMatrixResult, MetricResult};
use crate::runner::EvaluationResponse;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report
    pub fn generate(response: &EvaluationResponse) -> EvalResult<String> {
        let mut md = String::new();
        md.push_str(&format!("# Evaluation: {}\n\n", response.evaluation_name));

        for metric in &response.metrics {
            match metric {
                MetricResult::Accuracy(result) => Self::accuracy(&mut md, result),
                MetricResult::MulticlassConfusionMatrix(result) => {
                    Self::confusion_matrix(&mut md, result)
                }
            }
        }

        Ok(md)
    }

    fn accuracy(md: &mut String, result: &AccuracyResult) {
        md.push_str("## Accuracy\n\n");
        md.push_str(&format!(
            "**Overall**: {:.4}\n\n",
            result.overall_accuracy
        ));
        md.push_str("| Class | Count | Accuracy |\n|-------|-------|----------|\n");
        for class in &result.actual_classes {
            md.push_str(&format!(
                "| {} | {} | {:.4} |\n",
                class.actual_class, class.actual_class_doc_count, class.accuracy
            ));
        }
        md.push('\n');
    }

    fn confusion_matrix(md: &mut String, result: &ConfusionMatrixResult) {
        md.push_str("## Multiclass Confusion Matrix\n\n");

        let columns = super::predicted_columns(result);
        md.push_str("| Actual \\ Predicted |");
        for column in &columns {
            md.push_str(&format!(" {} |", column));
        }
        md.push_str(" (other) | Total |\n|---|");
        for _ in &columns {
            md.push_str("---|");
        }
        md.push_str("---|---|\n");

        for row in &result.confusion_matrix {
            md.push_str(&format!("| {} |", row.actual_class));
            for column in &columns {
                md.push_str(&format!(" {} |", super::cell(row, column)));
            }
            md.push_str(&format!(
                " {} | {} |\n",
                row.other_predicted_class_doc_count, row.actual_class_doc_count
            ));
        }

        md.push_str(&format!(
            "\nOther actual classes: {}\n\n",
            result.other_actual_class_count
        ));
    }
}
