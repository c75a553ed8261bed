//! Multiclass confusion matrix
//!
//! Cross-tabulates actual against predicted labels, keeping at most `size`
//! actual classes as rows and at most `size` predicted classes as columns.
//! The column set is chosen once from global predicted-label frequencies and
//! shared by every row.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::frequency::LabelFrequencies;
use crate::error::{EvalError, EvalResult};
use crate::record::LabeledRecord;

/// Default bound on materialized actual and predicted classes
pub const DEFAULT_SIZE: usize = 25;

/// Count of one predicted class within a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedClass {
    pub predicted_class: String,
    pub count: u64,
}

impl PredictedClass {
    pub fn new(predicted_class: impl Into<String>, count: u64) -> Self {
        Self {
            predicted_class: predicted_class.into(),
            count,
        }
    }
}

/// One row of the confusion matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualClass {
    pub actual_class: String,
    /// Occurrences of this actual class across the whole stream
    pub actual_class_doc_count: u64,
    /// Non-zero counts for the selected predicted classes, ascending by label
    pub predicted_classes: Vec<PredictedClass>,
    /// Occurrences predicted as a class outside the selected columns
    pub other_predicted_class_doc_count: u64,
}

impl ActualClass {
    pub fn new(
        actual_class: impl Into<String>,
        actual_class_doc_count: u64,
        predicted_classes: Vec<PredictedClass>,
        other_predicted_class_doc_count: u64,
    ) -> Self {
        Self {
            actual_class: actual_class.into(),
            actual_class_doc_count,
            predicted_classes,
            other_predicted_class_doc_count,
        }
    }
}

/// Confusion matrix result payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrixResult {
    /// Rows for the selected actual classes, ascending by label
    pub confusion_matrix: Vec<ActualClass>,
    /// Number of distinct actual classes left out of `confusion_matrix`
    pub other_actual_class_count: u64,
}

/// Confusion matrix aggregator bounded to `size` classes per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulticlassConfusionMatrix {
    size: usize,
}

impl Default for MulticlassConfusionMatrix {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl MulticlassConfusionMatrix {
    pub const NAME: &'static str = "multiclass_confusion_matrix";

    /// Create an aggregator; a zero size is rejected
    pub fn new(size: usize) -> EvalResult<Self> {
        if size == 0 {
            return Err(EvalError::invalid_size(Self::NAME, 0));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Build the bounded matrix in a single pass over `records`
    pub fn compute<I>(&self, records: I) -> EvalResult<ConfusionMatrixResult>
    where
        I: IntoIterator<Item = EvalResult<LabeledRecord>>,
    {
        let mut actual_totals = LabelFrequencies::new();
        let mut predicted_totals = LabelFrequencies::new();
        let mut cells: HashMap<String, LabelFrequencies> = HashMap::new();

        for record in records {
            let record = record?;
            actual_totals.observe(&record.actual);
            predicted_totals.observe(&record.predicted);
            cells
                .entry(record.actual)
                .or_default()
                .observe(&record.predicted);
        }

        let actual_labels = actual_totals.top(self.size);
        let predicted_labels = predicted_totals.top(self.size);
        let other_actual_class_count = (actual_totals.distinct() - actual_labels.len()) as u64;

        if other_actual_class_count > 0 || predicted_labels.len() < predicted_totals.distinct() {
            tracing::warn!(
                size = self.size,
                actual_classes = actual_totals.distinct(),
                predicted_classes = predicted_totals.distinct(),
                "confusion matrix truncated to size bound"
            );
        }

        let confusion_matrix = actual_labels
            .into_iter()
            .map(|actual| {
                let row = cells.get(&actual);
                let predicted_classes: Vec<PredictedClass> = predicted_labels
                    .iter()
                    .filter_map(|predicted| {
                        let count = row.map_or(0, |r| r.count(predicted));
                        (count > 0).then(|| PredictedClass::new(predicted.clone(), count))
                    })
                    .collect();

                let doc_count = actual_totals.count(&actual);
                let shown: u64 = predicted_classes.iter().map(|p| p.count).sum();
                ActualClass::new(actual, doc_count, predicted_classes, doc_count - shown)
            })
            .collect();

        tracing::debug!(
            records = actual_totals.total(),
            actual_classes = actual_totals.distinct(),
            predicted_classes = predicted_totals.distinct(),
            other_actual_class_count,
            "computed confusion matrix"
        );

        Ok(ConfusionMatrixResult {
            confusion_matrix,
            other_actual_class_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat(a: &str, p: &str, n: usize) -> Vec<EvalResult<LabeledRecord>> {
        (0..n).map(|_| Ok(LabeledRecord::new(a, p))).collect()
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = MulticlassConfusionMatrix::new(0).unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(MulticlassConfusionMatrix::default().size(), DEFAULT_SIZE);
    }

    #[test]
    fn test_full_matrix_within_bound() {
        let mut records = repeat("cat", "cat", 3);
        records.extend(repeat("cat", "dog", 1));
        records.extend(repeat("dog", "dog", 2));

        let result = MulticlassConfusionMatrix::default().compute(records).unwrap();
        assert_eq!(result.other_actual_class_count, 0);
        assert_eq!(
            result.confusion_matrix,
            vec![
                ActualClass::new(
                    "cat",
                    4,
                    vec![PredictedClass::new("cat", 3), PredictedClass::new("dog", 1)],
                    0
                ),
                ActualClass::new("dog", 2, vec![PredictedClass::new("dog", 2)], 0),
            ]
        );
    }

    #[test]
    fn test_bound_selects_most_frequent_classes() {
        // actual: a=5, b=3, c=1; predicted: x=4, y=3, z=2
        let mut records = repeat("a", "x", 3);
        records.extend(repeat("a", "z", 2));
        records.extend(repeat("b", "y", 3));
        records.extend(repeat("c", "x", 1));

        let result = MulticlassConfusionMatrix::new(2).unwrap().compute(records).unwrap();
        assert_eq!(result.other_actual_class_count, 1);
        assert_eq!(
            result.confusion_matrix,
            vec![
                ActualClass::new("a", 5, vec![PredictedClass::new("x", 3)], 2),
                ActualClass::new("b", 3, vec![PredictedClass::new("y", 3)], 0),
            ]
        );
    }

    #[test]
    fn test_row_without_selected_predictions() {
        let mut records = repeat("a", "x", 4);
        records.extend(repeat("b", "y", 1));

        let result = MulticlassConfusionMatrix::new(1).unwrap().compute(records).unwrap();
        assert_eq!(result.other_actual_class_count, 1);
        assert_eq!(
            result.confusion_matrix,
            vec![ActualClass::new("a", 4, vec![PredictedClass::new("x", 4)], 0)]
        );

        // actual: a=6, b=5, c=2; predicted: x=7, y=6
        let mut records = repeat("a", "y", 6);
        records.extend(repeat("b", "x", 5));
        records.extend(repeat("c", "x", 2));
        let result = MulticlassConfusionMatrix::new(1).unwrap().compute(records).unwrap();
        // column x is chosen globally, row a has nothing in it
        assert_eq!(result.other_actual_class_count, 2);
        assert_eq!(
            result.confusion_matrix,
            vec![ActualClass::new("a", 6, Vec::new(), 6)]
        );
    }

    #[test]
    fn test_empty_stream() {
        let result = MulticlassConfusionMatrix::default().compute(Vec::new()).unwrap();
        assert!(result.confusion_matrix.is_empty());
        assert_eq!(result.other_actual_class_count, 0);
    }
}
