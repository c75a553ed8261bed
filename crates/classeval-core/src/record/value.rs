//! Label value normalization

use serde_json::Value;

use crate::error::{EvalError, EvalResult};

/// Convert a keyword, integer or boolean field value into its label string
///
/// Floating point numbers, arrays, objects and nulls have no canonical label
/// form and are rejected.
///
/// The label carries no type tag: integer `9` and keyword `"9"` both become
/// `"9"`, and boolean `true` and keyword `"true"` both become `"true"`. A
/// field mixing types across records compares these as equal labels.
pub fn normalize_label(field: &str, value: &Value) -> EvalResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                Err(EvalError::unsupported_value(field, n))
            }
        }
        other => Err(EvalError::unsupported_value(field, other)),
    }
}
