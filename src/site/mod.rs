//! Access to the state of the audited site.
//!
//! Checks never inspect a system directly. They ask a [`SiteState`]
//! provider, which answers from whatever source it wraps. The crate ships
//! [`SiteSnapshot`], a provider backed by a declarative YAML or JSON file.
//!
//! # Modules
//!
//! - [`model`] - Data types returned by providers
//! - [`snapshot`] - File-backed provider

pub mod model;
pub mod snapshot;

pub use model::{
    CacheBackends, CacheBin, CronStatus, DatabaseSummary, DatabaseTable, Environment, Extension,
    ExtensionKind, FileKind, NumberOne, PerformanceSettings, PhpMessageCounts, Requirement,
    RequirementSeverity, Route, UserSummary, View, ViewCache, ViewCacheKind, ViewDisplay,
    WatchdogSummary,
};
pub use snapshot::SiteSnapshot;

use crate::error::Result;

/// Capability interface checks use to read site state.
///
/// Every query may fail with [`crate::AuditError::StateUnavailable`]; the
/// engine turns that into an informational result for the asking check.
pub trait SiteState: Send + Sync {
    /// Deployment environment.
    fn environment(&self) -> Environment;

    /// Kind of entry at a path relative to the site root, if any.
    fn file(&self, path: &str) -> Result<Option<FileKind>>;

    /// Names of the entries directly inside a directory.
    fn directory_entries(&self, path: &str) -> Result<Vec<String>>;

    /// Page cache and aggregation settings.
    fn performance(&self) -> Result<PerformanceSettings>;

    /// Cache bins and their backends.
    fn cache_backends(&self) -> Result<CacheBackends>;

    /// Cron bookkeeping.
    fn cron(&self) -> Result<CronStatus>;

    /// Database metadata.
    fn database(&self) -> Result<DatabaseSummary>;

    /// Every extension in the codebase, enabled or not.
    fn extensions(&self) -> Result<Vec<Extension>>;

    /// User account statistics.
    fn users(&self) -> Result<UserSummary>;

    /// Configured views.
    fn views(&self) -> Result<Vec<View>>;

    /// Database log statistics.
    fn watchdog(&self) -> Result<WatchdogSummary>;

    /// Registered routes.
    fn routes(&self) -> Result<Vec<Route>>;

    /// Entries of the site's own status report.
    fn requirements(&self) -> Result<Vec<Requirement>>;
}
