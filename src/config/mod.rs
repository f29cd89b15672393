//! Project configuration.
//!
//! - Schema in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layer merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use site_audit::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".site-audit");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "vendor: pantheon").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.vendor.as_deref(), Some("pantheon"));
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`.site-audit/config.yml`)
//! 2. Local overrides (`.site-audit/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    find_project_root, load_config, load_config_file, load_merged_config, parse_config,
    ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{AuditConfig, DEFAULT_SNAPSHOT};
