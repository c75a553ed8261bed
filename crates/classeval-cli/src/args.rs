//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classeval")]
#[command(about = "Classification evaluation: accuracy and bounded confusion matrices")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (.toml or .json)
    #[arg(long, global = true, env = "CLASSEVAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: table, json or markdown
    #[arg(long, global = true, default_value = "table")]
    pub format: String,

    /// Run metrics one after another instead of on parallel workers
    #[arg(long, global = true)]
    pub sequential: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a JSON-lines record file
    Evaluate {
        /// Newline-delimited JSON records
        #[arg(long)]
        records: PathBuf,

        /// Field holding the actual class
        #[arg(long)]
        actual_field: String,

        /// Field holding the predicted class
        #[arg(long)]
        predicted_field: String,

        /// Metrics to compute, in output order (defaults from config if omitted)
        #[arg(long = "metric", value_enum)]
        metrics: Vec<MetricArg>,

        /// Confusion matrix size bound
        #[arg(long)]
        size: Option<i64>,

        /// Cache the projected records so metrics share one read of the file
        #[arg(long)]
        cache: bool,
    },

    /// Run a JSON evaluation request document
    Request {
        /// Path to the request document
        request: PathBuf,

        /// Record file; overrides the request's `source`
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// Print the effective engine configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Accuracy,
    #[value(alias = "multiclass-confusion-matrix")]
    ConfusionMatrix,
}
