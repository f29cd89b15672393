//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use super::checks::ChecksCommand;
use super::completions::CompletionsCommand;
use super::context::Sources;
use super::report::ReportCommand;
use super::reports::ReportsCommand;
use super::schema::SchemaCommand;
use crate::cli::args::{Cli, Commands, ReportsArgs};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let sources = Sources {
            config: cli.config.clone(),
            snapshot: cli.snapshot.clone(),
        };

        match &cli.command {
            Some(Commands::Reports(args)) => {
                let cmd = ReportsCommand::new(&self.project_root, sources, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Report(args)) => {
                let cmd = ReportCommand::new(&self.project_root, sources, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Checks(args)) => ChecksCommand::new(args.clone()).execute(ui),
            Some(Commands::Schema(args)) => SchemaCommand::new(args.clone()).execute(ui),
            Some(Commands::Completions(args)) => {
                CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                // Default to a full audit with config defaults
                let cmd =
                    ReportsCommand::new(&self.project_root, sources, ReportsArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
