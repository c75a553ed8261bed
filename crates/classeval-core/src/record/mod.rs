//! Labeled records and the sources that supply them
//!
//! A record source projects each document onto the configured actual and
//! predicted fields. Aggregators normalize the projected values into class
//! label strings as they ingest them.

mod source;
mod value;

pub use source::{CachedSource, JsonLinesSource, MemorySource, RecordSource, RecordStream};
pub use value::normalize_label;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{EvalError, EvalResult};

/// Names of the actual-label and predicted-label fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPair {
    /// Field holding the ground-truth class
    pub actual: String,
    /// Field holding the model-assigned class
    pub predicted: String,
}

impl FieldPair {
    pub fn new(actual: impl Into<String>, predicted: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            predicted: predicted.into(),
        }
    }

    /// Reject empty field names
    pub fn validate(&self) -> EvalResult<()> {
        if self.actual.trim().is_empty() {
            return Err(EvalError::invalid_request("[actual_field] must be set"));
        }
        if self.predicted.trim().is_empty() {
            return Err(EvalError::invalid_request("[predicted_field] must be set"));
        }
        Ok(())
    }
}

/// Which column of a record to key on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelColumn {
    Actual,
    Predicted,
}

/// A document projected onto the two label fields, values not yet normalized
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub actual: Value,
    pub predicted: Value,
}

impl RawRecord {
    pub fn new(actual: impl Into<Value>, predicted: impl Into<Value>) -> Self {
        Self {
            actual: actual.into(),
            predicted: predicted.into(),
        }
    }

    /// Normalize both values into canonical label strings
    pub fn normalize(&self, fields: &FieldPair) -> EvalResult<LabeledRecord> {
        Ok(LabeledRecord {
            actual: normalize_label(&fields.actual, &self.actual)?,
            predicted: normalize_label(&fields.predicted, &self.predicted)?,
        })
    }
}

/// A record whose labels have been normalized to strings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledRecord {
    pub actual: String,
    pub predicted: String,
}

impl LabeledRecord {
    pub fn new(actual: impl Into<String>, predicted: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            predicted: predicted.into(),
        }
    }

    /// Label in the given column
    pub fn label(&self, column: LabelColumn) -> &str {
        match column {
            LabelColumn::Actual => &self.actual,
            LabelColumn::Predicted => &self.predicted,
        }
    }

    /// Whether the prediction matches the actual class
    pub fn is_correct(&self) -> bool {
        self.actual == self.predicted
    }
}

/// Normalize a raw stream, checking for cancellation before every record
///
/// The first source, data or cancellation error ends the iteration.
pub fn labeled<'a, I>(
    records: I,
    fields: &'a FieldPair,
    cancel: &'a CancellationToken,
) -> impl Iterator<Item = EvalResult<LabeledRecord>> + 'a
where
    I: IntoIterator<Item = EvalResult<RawRecord>>,
    I::IntoIter: 'a,
{
    records.into_iter().map(move |record| {
        if cancel.is_cancelled() {
            return Err(EvalError::Cancelled);
        }
        record?.normalize(fields)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_pair_validation() {
        assert!(FieldPair::new("animal", "animal_prediction").validate().is_ok());

        let err = FieldPair::new("", "animal_prediction").validate().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("actual_field"));

        let err = FieldPair::new("animal", "  ").validate().unwrap_err();
        assert!(err.to_string().contains("predicted_field"));
    }

    #[test]
    fn test_raw_record_normalize() {
        let fields = FieldPair::new("predator", "predator_prediction");
        let record = RawRecord::new(json!(true), json!(false));
        let labeled = record.normalize(&fields).unwrap();
        assert_eq!(labeled, LabeledRecord::new("true", "false"));
        assert!(!labeled.is_correct());
        assert_eq!(labeled.label(LabelColumn::Predicted), "false");
    }

    #[test]
    fn test_labeled_stops_on_cancellation() {
        let fields = FieldPair::new("a", "p");
        let cancel = CancellationToken::new();
        let raw = vec![Ok(RawRecord::new("x", "x")), Ok(RawRecord::new("y", "y"))];

        cancel.cancel();
        let first = labeled(raw, &fields, &cancel).next().unwrap();
        assert!(matches!(first, Err(EvalError::Cancelled)));
    }

    #[test]
    fn test_labeled_propagates_source_error() {
        let fields = FieldPair::new("a", "p");
        let cancel = CancellationToken::new();
        let raw = vec![
            Ok(RawRecord::new("x", "x")),
            Err(EvalError::source("connection reset")),
        ];

        let results: Vec<_> = labeled(raw, &fields, &cancel).collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(EvalError::Source { .. })));
    }
}
