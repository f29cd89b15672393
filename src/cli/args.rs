//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// site-audit - Score a site's state against best practices.
#[derive(Debug, Parser)]
#[command(name = "site-audit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .site-audit/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Path to the site snapshot (overrides the configured snapshot)
    #[arg(short, long, global = true, env = "SITE_AUDIT_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every report (default if no command specified)
    #[command(alias = "aa")]
    Reports(ReportsArgs),

    /// Run a single report
    Report(ReportArgs),

    /// List the available checks
    Checks(ChecksArgs),

    /// Print the JSON schema of the snapshot or config file
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON document
    #[default]
    Json,
    /// Human-readable tables
    Table,
}

/// Arguments shared by the report commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RenderArgs {
    /// Hosting vendor, e.g. pantheon
    #[arg(long)]
    pub vendor: Option<String>,

    /// Itemize results where checks support it
    #[arg(long)]
    pub detail: bool,

    /// Render results and actions as HTML
    #[arg(long)]
    pub html: bool,

    /// Output compact JSON
    #[arg(long)]
    pub json: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the `reports` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReportsArgs {
    /// Skip checks by id or name (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Arguments for the `report` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Report id, e.g. best_practices or cache
    #[arg(value_name = "REPORT_ID")]
    pub report: String,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Arguments for the `checks` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ChecksArgs {
    /// Only list the checks of this report
    #[arg(long)]
    pub report: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Which file format `schema` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchemaTarget {
    /// The site snapshot
    #[default]
    Snapshot,
    /// The project config file
    Config,
}

/// Arguments for the `schema` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SchemaArgs {
    /// File format to describe
    #[arg(value_enum, default_value_t = SchemaTarget::Snapshot)]
    pub target: SchemaTarget,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
