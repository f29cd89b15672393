//! Error types for site audit operations.
//!
//! This module defines [`AuditError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `AuditError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `AuditError::Other`) for unexpected errors
//! - A check that merely lacks data degrades to a FAIL or INFO score; it does
//!   not return an error

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for site audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Checks invoked each other while still being scored.
    #[error("Dependency cycle detected between checks: {cycle}")]
    DependencyCycle { cycle: String },

    /// A check id that is not part of the catalog was invoked.
    #[error("Unknown check: {id}")]
    UnknownCheck { id: String },

    /// Site snapshot file not found at expected location.
    #[error("Site snapshot not found: {path}")]
    SnapshotNotFound { path: PathBuf },

    /// Failed to parse the site snapshot.
    #[error("Failed to parse site snapshot at {path}: {message}")]
    SnapshotParseError { path: PathBuf, message: String },

    /// An explicitly requested config file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The state provider could not answer a query.
    #[error("Site state unavailable for {what}: {message}")]
    StateUnavailable { what: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuditError {
    /// A copy of this error, for reporting it again.
    ///
    /// Wrapped IO and generic errors keep their kind and message but drop
    /// their source chain.
    pub(crate) fn replicate(&self) -> AuditError {
        match self {
            Self::DependencyCycle { cycle } => Self::DependencyCycle {
                cycle: cycle.clone(),
            },
            Self::UnknownCheck { id } => Self::UnknownCheck { id: id.clone() },
            Self::SnapshotNotFound { path } => Self::SnapshotNotFound { path: path.clone() },
            Self::SnapshotParseError { path, message } => Self::SnapshotParseError {
                path: path.clone(),
                message: message.clone(),
            },
            Self::ConfigNotFound { path } => Self::ConfigNotFound { path: path.clone() },
            Self::ConfigParseError { path, message } => Self::ConfigParseError {
                path: path.clone(),
                message: message.clone(),
            },
            Self::StateUnavailable { what, message } => Self::StateUnavailable {
                what: what.clone(),
                message: message.clone(),
            },
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other(e) => Self::Other(anyhow::anyhow!("{:#}", e)),
        }
    }
}

/// Result type alias for site audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
