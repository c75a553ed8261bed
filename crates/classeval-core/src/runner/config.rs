//! Engine configuration
//!
//! Defaults applied when an evaluation request leaves parameters unset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};
use crate::metrics::{DEFAULT_SIZE, MetricRequest};

/// Configuration for the evaluation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Confusion matrix size when a request does not give one
    #[serde(default = "default_confusion_matrix_size")]
    pub default_confusion_matrix_size: usize,

    /// Metrics computed when a request names none
    #[serde(default = "default_metrics")]
    pub default_metrics: Vec<MetricRequest>,

    /// Whether independent metrics may run on parallel workers
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Maximum number of metrics computed at once
    #[serde(default = "default_max_parallel_metrics")]
    pub max_parallel_metrics: usize,
}

fn default_confusion_matrix_size() -> usize {
    DEFAULT_SIZE
}

fn default_metrics() -> Vec<MetricRequest> {
    vec![
        MetricRequest::Accuracy,
        MetricRequest::default_confusion_matrix(),
    ]
}

fn default_parallel() -> bool {
    true
}

fn default_max_parallel_metrics() -> usize {
    4
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_confusion_matrix_size: default_confusion_matrix_size(),
            default_metrics: default_metrics(),
            parallel: default_parallel(),
            max_parallel_metrics: default_max_parallel_metrics(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(EvalError::invalid_request(format!(
                    "unsupported config file type: {}",
                    path.display()
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the default confusion matrix size
    pub fn with_default_size(mut self, size: usize) -> Self {
        self.default_confusion_matrix_size = size;
        self
    }

    /// Set the metrics used when a request names none
    pub fn with_default_metrics(mut self, metrics: Vec<MetricRequest>) -> Self {
        self.default_metrics = metrics;
        self
    }

    /// Run metrics one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the worker limit
    pub fn with_max_parallel_metrics(mut self, max: usize) -> Self {
        self.max_parallel_metrics = max;
        self
    }

    pub fn validate(&self) -> EvalResult<()> {
        if self.default_confusion_matrix_size == 0 {
            return Err(EvalError::invalid_size("default_confusion_matrix_size", 0));
        }
        if self.default_metrics.is_empty() {
            return Err(EvalError::invalid_request("[default_metrics] must not be empty"));
        }
        if self.max_parallel_metrics == 0 {
            return Err(EvalError::invalid_request(
                "[max_parallel_metrics] must be at least 1",
            ));
        }
        Ok(())
    }
}
