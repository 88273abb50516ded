use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod format;

#[derive(Parser)]
#[command(
    name = "rulefile",
    version,
    about = "Validate and query analyzer rule-settings documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate settings documents under the given paths.
    Check {
        /// Files or directories to check.
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
        /// Filename globs that identify settings documents.
        #[arg(long = "pattern", value_name = "GLOB")]
        patterns: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Report the effective state of a single rule.
    Query {
        /// Settings document to load.
        file: PathBuf,
        /// Rule identifier to resolve, e.g. PSAvoidLongLines.
        rule_id: String,
        /// Treat rules absent from the document as enabled.
        #[arg(long)]
        default_enabled: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Validate the settings documents staged for commit.
    Hook {
        /// Filename globs that identify settings documents.
        #[arg(long = "pattern", value_name = "GLOB")]
        patterns: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Write a starter settings document.
    Init {
        #[arg(default_value = "ruleset.toml")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}
