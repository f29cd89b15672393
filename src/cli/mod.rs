//! Command-line interface for site-audit.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    ChecksArgs, Cli, Commands, CompletionsArgs, OutputFormat, RenderArgs, ReportArgs, ReportsArgs,
    SchemaArgs, SchemaTarget,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
