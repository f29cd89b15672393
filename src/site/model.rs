//! Data returned by site state providers.
//!
//! These types double as the on-disk snapshot format, so every field has a
//! serde default and a schema description.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What kind of filesystem entry lives at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Symlink,
    Directory,
}

/// Deployment environment of the audited site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    Test,
    #[default]
    Live,
}

impl Environment {
    /// Whether this is a development environment.
    pub fn is_dev(self) -> bool {
        matches!(self, Environment::Dev)
    }
}

/// Page cache and asset aggregation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PerformanceSettings {
    /// Browser and proxy cache maximum age, in seconds.
    pub page_max_age: u64,
    /// Whether CSS files are aggregated.
    pub preprocess_css: bool,
    /// Whether JavaScript files are aggregated.
    pub preprocess_js: bool,
    /// Whether lightweight 404 pages are served for missing files.
    pub fast_404: bool,
}

/// A cache bin and where it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheBin {
    pub name: String,
    /// Backend service; unset means the default backend.
    #[serde(default)]
    pub backend: Option<String>,
    /// Number of cached items.
    #[serde(default)]
    pub items: u64,
}

/// Cache backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CacheBackends {
    /// Backend service used by bins without an override.
    pub default_backend: String,
    pub bins: Vec<CacheBin>,
}

impl Default for CacheBackends {
    fn default() -> Self {
        Self {
            default_backend: "cache.backend.database".to_string(),
            bins: Vec::new(),
        }
    }
}

impl CacheBackends {
    /// Backend a bin is stored in.
    pub fn backend_of<'a>(&'a self, bin: &'a CacheBin) -> &'a str {
        bin.backend.as_deref().unwrap_or(&self.default_backend)
    }
}

/// Cron bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CronStatus {
    /// Unix timestamp of the last completed cron run.
    pub last_run: Option<i64>,
    /// Automated cron interval in seconds; 0 disables automated cron.
    pub interval: Option<u64>,
}

/// A database table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseTable {
    pub name: String,
    #[serde(default)]
    pub rows: u64,
    /// Data plus index size, in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub collation: String,
    #[serde(default)]
    pub engine: String,
    /// Allocated but unused space, in bytes.
    #[serde(default)]
    pub free_bytes: u64,
}

/// Database metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DatabaseSummary {
    pub name: String,
    pub tables: Vec<DatabaseTable>,
}

/// Kind of extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    #[default]
    Module,
    Theme,
    Profile,
}

/// An extension found in the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Extension {
    /// Machine name.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: ExtensionKind,
    #[serde(default)]
    pub enabled: bool,
    /// Path relative to the site root.
    #[serde(default)]
    pub path: String,
}

impl Extension {
    /// Label, falling back to the machine name.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// The user with uid 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NumberOne {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
}

/// User account statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserSummary {
    pub total: u64,
    pub blocked: u64,
    pub number_one: Option<NumberOne>,
    /// Number of accounts holding each role.
    pub roles: BTreeMap<String, u64>,
}

/// Cache strategy of a view display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewCacheKind {
    None,
    Time,
    Tag,
}

/// Cache settings of a view display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewCache {
    #[serde(rename = "type")]
    pub kind: ViewCacheKind,
    /// Output lifespan in seconds; 0 selects the custom lifespan.
    #[serde(default)]
    pub output_lifespan: i64,
    #[serde(default)]
    pub output_lifespan_custom: i64,
    /// Query results lifespan in seconds; 0 selects the custom lifespan.
    #[serde(default)]
    pub results_lifespan: i64,
    #[serde(default)]
    pub results_lifespan_custom: i64,
}

/// A display of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewDisplay {
    /// Display id; `default` is the master display.
    pub name: String,
    /// Unset means enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Unset means the display inherits the master display's cache.
    #[serde(default)]
    pub cache: Option<ViewCache>,
}

/// A configured view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub displays: Vec<ViewDisplay>,
}

fn enabled_by_default() -> bool {
    true
}

/// PHP messages in the log, by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PhpMessageCounts {
    pub notice: u64,
    pub warning: u64,
    pub error: u64,
}

impl PhpMessageCounts {
    /// All PHP messages.
    pub fn total(&self) -> u64 {
        self.notice
            .saturating_add(self.warning)
            .saturating_add(self.error)
    }
}

/// Database log statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WatchdogSummary {
    /// Whether database logging is enabled.
    pub enabled: bool,
    pub entries: u64,
    /// Entries of type "page not found".
    pub not_found: u64,
    pub php: PhpMessageCounts,
    /// Unix timestamp of the oldest entry.
    pub oldest: Option<i64>,
    /// Unix timestamp of the newest entry.
    pub newest: Option<i64>,
}

/// Severity of a system requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSeverity {
    Info,
    #[default]
    Ok,
    Warning,
    Error,
}

/// An entry of the site's status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Requirement {
    pub title: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub severity: RequirementSeverity,
}

/// A registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    pub path: String,
    /// Controller or callback the route dispatches to.
    #[serde(default)]
    pub callback: String,
    /// Access callback guarding the route.
    #[serde(default)]
    pub access_callback: String,
}
