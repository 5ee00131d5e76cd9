//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Multi-language code indexer with AI-ready Markdown and JSON output
#[derive(Parser, Debug)]
#[command(name = "codeatlas")]
#[command(about = "Index a repository into AI-consumable Markdown and JSON")]
#[command(version)]
pub struct Cli {
    /// Path to a config file (default: ./.codeatlas.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a single file and print its ParseResult as JSON
    Parse {
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse every supported file under a directory and print JSON
    Scan {
        dir: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate per-directory READMEs bottom-up
    Index { dir: PathBuf },

    /// Generate the project-wide symbol index
    Symbols { dir: PathBuf },

    /// Analyze technical debt across a directory
    Debt {
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: ReportFormat,
    },

    /// Analyze git changes and recommend an update strategy
    Changes {
        /// Starting revision
        #[arg(long, default_value = "HEAD~1")]
        since: String,

        /// Ending revision
        #[arg(long, default_value = "HEAD")]
        until: String,
    },

    /// Write a default .codeatlas.toml
    Init,
}

/// Debt report output format
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}
