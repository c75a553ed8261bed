//! Evaluation error types

use thiserror::Error;

/// Result alias used throughout the engine
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while validating or running an evaluation
///
/// Configuration errors are reported before any record is scanned. Data and
/// source errors abort the running scan; no partial result is produced.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Malformed or incomplete evaluation request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Metric name not recognised by the classification evaluation
    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    /// Confusion matrix size bound must be positive
    #[error("Invalid size for metric {metric}: {size} (must be a positive integer)")]
    InvalidSize { metric: String, size: i64 },

    /// A label field holds a value that cannot be normalized to a class label
    #[error("Unsupported value for field [{field}]: {value}")]
    UnsupportedValue { field: String, value: String },

    /// The record source failed mid-scan
    #[error("Record source error: {message}")]
    Source { message: String },

    /// The scan was cancelled before completion
    #[error("Evaluation cancelled")]
    Cancelled,

    /// A worker task could not be joined
    #[error("Worker failed: {message}")]
    Worker { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EvalError {
    /// Create an InvalidRequest error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an UnknownMetric error
    pub fn unknown_metric(name: impl Into<String>) -> Self {
        Self::UnknownMetric { name: name.into() }
    }

    /// Create an InvalidSize error
    pub fn invalid_size(metric: impl Into<String>, size: i64) -> Self {
        Self::InvalidSize {
            metric: metric.into(),
            size,
        }
    }

    /// Create an UnsupportedValue error
    pub fn unsupported_value(field: impl Into<String>, value: impl ToString) -> Self {
        Self::UnsupportedValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a Source error
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Whether the error was raised before any scan started
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::UnknownMetric { .. }
                | Self::InvalidSize { .. }
                | Self::Toml(_)
        )
    }

    /// Whether the error came from a record's contents
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::UnsupportedValue { .. })
    }
}
