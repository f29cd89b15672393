//! site-audit - Score a site's state against best practices.
//!
//! Checks inspect a description of a site (its settings, extensions,
//! database, users, views and logs), each producing a PASS, WARN, FAIL or
//! INFO score. Checks may depend on data computed by other checks; the
//! engine resolves those dependencies on demand and scores each check once
//! per run. Scores are aggregated into percentage reports.
//!
//! # Modules
//!
//! - [`audit`] - Scores, the check contract, the shared registry and markup
//! - [`checks`] - The built-in check catalog
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Project configuration loading and merging
//! - [`error`] - Error types and result aliases
//! - [`report`] - Report identifiers, aggregation and output structures
//! - [`runner`] - Check instantiation, scoring and dependency resolution
//! - [`site`] - The site state interface and its file-backed snapshot
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use site_audit::audit::AuditOptions;
//! use site_audit::runner::Auditor;
//! use site_audit::site::SiteSnapshot;
//!
//! let snapshot = SiteSnapshot::from_yaml(
//!     "performance:\n  page_max_age: 3600\n  preprocess_css: true\n  preprocess_js: true\n",
//! )
//! .unwrap();
//! let auditor = Auditor::new(Arc::new(snapshot));
//!
//! let report = auditor.report("cache", AuditOptions::default()).unwrap();
//! assert_eq!(report.percent, 100);
//! ```

pub mod audit;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod site;
pub mod ui;

pub use error::{AuditError, Result};
