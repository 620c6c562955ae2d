use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use codescope::cli::{Cli, Commands};
use codescope::config::Config;
use codescope::logging::{init_early_logging, init_logging};
use codescope::metrics;

#[tokio::main]
async fn main() -> Result<()> {
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Load configuration (if available, otherwise use defaults)
    let config = Config::load(&project_root).unwrap_or_default();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = match init_logging(&config.logging, &project_root) {
        Ok(guard) => Some(guard),
        Err(e) => {
            init_early_logging();
            tracing::warn!("Falling back to stderr logging: {:#}", e);
            None
        }
    };

    tracing::debug!("Loaded configuration from: {}", project_root.display());

    metrics::register_metrics();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            dirs,
            max_results,
            json,
        } => {
            codescope::commands::search::run(&query, dirs, max_results, json).await?;
        }
        Commands::Symbols { file, json } => {
            codescope::commands::symbols::run(&file, json).await?;
        }
        Commands::Init { force } => {
            codescope::commands::init::run(force).await?;
        }
        Commands::Stats { prometheus } => {
            codescope::commands::stats::run(prometheus).await?;
        }
    }

    Ok(())
}
