//! Command routing logic for CLI

use anyhow::{Context, Result};
use classeval_core::EngineConfig;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.sequential {
        config = config.sequential();
    }

    match cli.command {
        Commands::Evaluate {
            records,
            actual_field,
            predicted_field,
            metrics,
            size,
            cache,
        } => {
            let options = commands::evaluate::EvaluateOptions {
                records,
                actual_field,
                predicted_field,
                metrics,
                size,
                cache,
            };
            commands::evaluate::run(config, options, &cli.format).await
        }
        Commands::Request { request, records } => {
            commands::request::run(config, request, records, &cli.format).await
        }
        Commands::Config => commands::show_config(&config),
    }
}
