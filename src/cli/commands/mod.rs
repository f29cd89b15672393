//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. The audit commands share config
//! and snapshot loading through [`context`] and output through [`display`].

pub mod checks;
pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod display;
pub mod report;
pub mod reports;
pub mod schema;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
