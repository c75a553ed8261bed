//! Classeval CLI application
//!
//! Runs classification evaluations over newline-delimited JSON records.
//!
//! ```bash
//! classeval evaluate --records animals.jsonl \
//!     --actual-field animal_name --predicted-field animal_name_prediction \
//!     --metric accuracy --metric confusion-matrix --size 3
//!
//! classeval request request.json --records animals.jsonl --format json
//! ```
//!
//! Set `RUST_LOG=debug` for per-metric logging.

mod args;
mod commands;
mod router;

use anyhow::Result;
use clap::Parser;

use args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with environment-based filtering
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    router::route(cli).await
}
