use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codescope")]
#[command(author, version, about = "Intent-aware symbol search for Python and Java codebases")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the codebase
    Search {
        /// Search query, e.g. "where is parse_config defined"
        query: String,

        /// Directory to search (repeatable, default: current directory)
        #[arg(short, long = "dir")]
        dirs: Vec<PathBuf>,

        /// Maximum number of results to return (1-100)
        #[arg(short = 'n', long)]
        max_results: Option<i64>,

        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },

    /// List the symbols extracted from a single file
    Symbols {
        /// Source file to extract
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default .codescope/config.toml in the current directory
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show search and index metrics
    Stats {
        /// Output in Prometheus format
        #[arg(long)]
        prometheus: bool,
    },
}
