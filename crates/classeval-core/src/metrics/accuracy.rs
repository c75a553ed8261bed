//! Accuracy metric
//!
//! Fraction of records whose predicted class equals the actual class, overall
//! and per actual class.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::frequency::LabelFrequencies;
use crate::error::EvalResult;
use crate::record::LabeledRecord;

/// Accuracy for one actual class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStat {
    pub actual_class: String,
    pub actual_class_doc_count: u64,
    pub accuracy: f64,
}

impl ClassStat {
    pub fn new(actual_class: impl Into<String>, actual_class_doc_count: u64, accuracy: f64) -> Self {
        Self {
            actual_class: actual_class.into(),
            actual_class_doc_count,
            accuracy,
        }
    }
}

/// Accuracy result payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyResult {
    /// Per-class accuracy, ascending by class label
    pub actual_classes: Vec<ClassStat>,
    pub overall_accuracy: f64,
}

/// Accuracy aggregator; takes no parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy;

impl Accuracy {
    pub const NAME: &'static str = "accuracy";

    pub fn new() -> Self {
        Self
    }

    /// Compute accuracy in a single pass over `records`
    ///
    /// An empty stream yields no classes and an overall accuracy of 0.
    pub fn compute<I>(&self, records: I) -> EvalResult<AccuracyResult>
    where
        I: IntoIterator<Item = EvalResult<LabeledRecord>>,
    {
        let mut totals = LabelFrequencies::new();
        let mut correct: HashMap<String, u64> = HashMap::new();

        for record in records {
            let record = record?;
            totals.observe(&record.actual);
            if record.is_correct() {
                *correct.entry(record.actual).or_insert(0) += 1;
            }
        }

        let mut actual_classes: Vec<ClassStat> = totals
            .iter()
            .map(|(label, total)| {
                let hits = correct.get(label).copied().unwrap_or(0);
                ClassStat::new(label, total, hits as f64 / total as f64)
            })
            .collect();
        actual_classes.sort_by(|a, b| a.actual_class.cmp(&b.actual_class));

        let total_correct: u64 = correct.values().sum();
        let overall_accuracy = if totals.total() > 0 {
            total_correct as f64 / totals.total() as f64
        } else {
            0.0
        };

        tracing::debug!(
            records = totals.total(),
            classes = actual_classes.len(),
            overall_accuracy,
            "computed accuracy"
        );

        Ok(AccuracyResult {
            actual_classes,
            overall_accuracy,
        })
    }
}
