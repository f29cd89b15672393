//! File-backed site state.
//!
//! A snapshot describes the audited site declaratively:
//!
//! ```yaml
//! environment: live
//! files:
//!   sites/default/settings.php: file
//!   sites/default/services.yml: symlink
//! performance:
//!   page_max_age: 3600
//!   preprocess_css: true
//!   preprocess_js: false
//! extensions:
//!   - name: php
//!     label: PHP Filter
//!     enabled: true
//! ```
//!
//! Sections left out of the file are reported as unavailable, so the checks
//! that need them degrade to informational results instead of guessing.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::model::{
    CacheBackends, CronStatus, DatabaseSummary, Environment, Extension, FileKind,
    PerformanceSettings, Requirement, Route, UserSummary, View, WatchdogSummary,
};
use super::SiteState;
use crate::error::{AuditError, Result};

/// Declarative description of a site's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSnapshot {
    /// Deployment environment.
    pub environment: Environment,
    /// Filesystem entries relative to the site root.
    pub files: BTreeMap<String, FileKind>,
    pub performance: Option<PerformanceSettings>,
    pub cache: Option<CacheBackends>,
    pub cron: Option<CronStatus>,
    pub database: Option<DatabaseSummary>,
    pub extensions: Option<Vec<Extension>>,
    pub users: Option<UserSummary>,
    pub views: Option<Vec<View>>,
    pub watchdog: Option<WatchdogSummary>,
    pub routes: Option<Vec<Route>>,
    pub requirements: Option<Vec<Requirement>>,
}

impl SiteSnapshot {
    /// Load a snapshot from a YAML or JSON file.
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuditError::SnapshotNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };

        parsed.map_err(|message| AuditError::SnapshotParseError {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a YAML snapshot.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse a JSON snapshot.
    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    fn section<T: Clone>(section: &Option<T>, what: &str) -> Result<T> {
        section.clone().ok_or_else(|| AuditError::StateUnavailable {
            what: what.to_string(),
            message: "section missing from snapshot".to_string(),
        })
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

impl SiteState for SiteSnapshot {
    fn environment(&self) -> Environment {
        self.environment
    }

    fn file(&self, path: &str) -> Result<Option<FileKind>> {
        let path = normalize(path);
        if let Some(kind) = self.files.get(path) {
            return Ok(Some(*kind));
        }

        // A listed descendant implies the directory exists.
        let prefix = format!("{}/", path);
        let implied = self.files.keys().any(|key| key.starts_with(&prefix));
        Ok(implied.then_some(FileKind::Directory))
    }

    fn directory_entries(&self, path: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", normalize(path));
        let entries: BTreeSet<String> = self
            .files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Ok(entries.into_iter().collect())
    }

    fn performance(&self) -> Result<PerformanceSettings> {
        Self::section(&self.performance, "performance")
    }

    fn cache_backends(&self) -> Result<CacheBackends> {
        Self::section(&self.cache, "cache")
    }

    fn cron(&self) -> Result<CronStatus> {
        Self::section(&self.cron, "cron")
    }

    fn database(&self) -> Result<DatabaseSummary> {
        Self::section(&self.database, "database")
    }

    fn extensions(&self) -> Result<Vec<Extension>> {
        Self::section(&self.extensions, "extensions")
    }

    fn users(&self) -> Result<UserSummary> {
        Self::section(&self.users, "users")
    }

    fn views(&self) -> Result<Vec<View>> {
        Self::section(&self.views, "views")
    }

    fn watchdog(&self) -> Result<WatchdogSummary> {
        Self::section(&self.watchdog, "watchdog")
    }

    fn routes(&self) -> Result<Vec<Route>> {
        Self::section(&self.routes, "routes")
    }

    fn requirements(&self) -> Result<Vec<Requirement>> {
        Self::section(&self.requirements, "requirements")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = r#"
environment: dev
files:
  sites/default/settings.php: file
  sites/default/services.yml: symlink
  sites/example.sites.php: file
performance:
  page_max_age: 900
  preprocess_css: true
"#;

    #[test]
    fn parses_yaml() {
        let snapshot = SiteSnapshot::from_yaml(YAML).unwrap();
        assert_eq!(snapshot.environment, Environment::Dev);
        assert_eq!(snapshot.files.len(), 3);
        let perf = snapshot.performance().unwrap();
        assert_eq!(perf.page_max_age, 900);
        assert!(perf.preprocess_css);
        assert!(!perf.preprocess_js);
    }

    #[test]
    fn rejects_unknown_sections() {
        let err = SiteSnapshot::from_yaml("bogus: 1\n").unwrap_err();
        assert!(err.contains("bogus"));
    }

    #[test]
    fn missing_section_is_unavailable() {
        let snapshot = SiteSnapshot::default();
        let err = snapshot.database().unwrap_err();
        assert!(matches!(err, AuditError::StateUnavailable { ref what, .. } if what == "database"));
    }

    #[test]
    fn parses_cache_and_requirements_sections() {
        let snapshot = SiteSnapshot::from_yaml(
            "cache:\n  default_backend: cache.backend.redis\n  bins:\n    - name: page\n      items: 12\nrequirements:\n  - title: Cron maintenance tasks\n    severity: warning\n",
        )
        .unwrap();
        let cache = snapshot.cache_backends().unwrap();
        assert_eq!(cache.default_backend, "cache.backend.redis");
        assert_eq!(cache.bins[0].items, 12);
        let requirements = snapshot.requirements().unwrap();
        assert_eq!(requirements[0].severity, crate::site::RequirementSeverity::Warning);
    }

    #[test]
    fn file_lookup_reports_kind() {
        let snapshot = SiteSnapshot::from_yaml(YAML).unwrap();
        assert_eq!(
            snapshot.file("sites/default/settings.php").unwrap(),
            Some(FileKind::File)
        );
        assert_eq!(
            snapshot.file("/sites/default/services.yml").unwrap(),
            Some(FileKind::Symlink)
        );
        assert_eq!(snapshot.file("sites/default/missing.php").unwrap(), None);
    }

    #[test]
    fn directories_are_implied_by_descendants() {
        let snapshot = SiteSnapshot::from_yaml(YAML).unwrap();
        assert_eq!(snapshot.file("sites").unwrap(), Some(FileKind::Directory));
        assert_eq!(snapshot.file("sites/all").unwrap(), None);
    }

    #[test]
    fn directory_entries_lists_direct_children() {
        let snapshot = SiteSnapshot::from_yaml(YAML).unwrap();
        assert_eq!(
            snapshot.directory_entries("sites").unwrap(),
            vec!["default".to_string(), "example.sites.php".to_string()]
        );
    }

    #[test]
    fn load_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let err = SiteSnapshot::load(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, AuditError::SnapshotNotFound { .. }));
    }

    #[test]
    fn load_reads_json_by_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, r#"{"environment": "test", "cron": {"last_run": 10}}"#).unwrap();

        let snapshot = SiteSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.environment, Environment::Test);
        assert_eq!(snapshot.cron().unwrap().last_run, Some(10));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.yml");
        fs::write(&path, "environment: [unterminated").unwrap();

        let err = SiteSnapshot::load(&path).unwrap_err();
        match err {
            AuditError::SnapshotParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
