//! Shared setup for the audit commands.
//!
//! Loads the project config and the site snapshot, and folds command line
//! flags over the configured defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audit::AuditOptions;
use crate::cli::args::RenderArgs;
use crate::config::{load_config, AuditConfig};
use crate::error::{AuditError, Result};
use crate::runner::{Auditor, SkipList};
use crate::site::SiteSnapshot;

/// File locations given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// Config file replacing the discovered project config.
    pub config: Option<PathBuf>,
    /// Snapshot replacing the configured one.
    pub snapshot: Option<PathBuf>,
}

/// Exit code for a missing snapshot or config file.
pub const MISSING_INPUT_EXIT: i32 = 2;

/// Whether an error means an input file does not exist.
pub fn is_missing_input(err: &AuditError) -> bool {
    matches!(
        err,
        AuditError::SnapshotNotFound { .. } | AuditError::ConfigNotFound { .. }
    )
}

/// Loaded configuration for one command invocation.
#[derive(Debug)]
pub struct AuditContext {
    project_root: PathBuf,
    config: AuditConfig,
    snapshot_override: Option<PathBuf>,
}

impl AuditContext {
    /// Load the config for a project.
    pub fn load(project_root: &Path, sources: &Sources) -> Result<Self> {
        let config = load_config(project_root, sources.config.as_deref())?;
        tracing::debug!(?config, "loaded configuration");

        Ok(Self {
            project_root: project_root.to_path_buf(),
            config,
            snapshot_override: sources.snapshot.clone(),
        })
    }

    /// The merged project config.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Snapshot to audit. A command line path wins over the config.
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.snapshot_override {
            Some(path) => path.clone(),
            None => self.config.snapshot_path(&self.project_root),
        }
    }

    /// Audit options with flags layered over the config.
    pub fn options(&self, render: &RenderArgs) -> AuditOptions {
        let mut options = self.config.options();
        if let Some(vendor) = &render.vendor {
            options.vendor = vendor.clone();
        }
        options.detail |= render.detail;
        options.html |= render.html;
        options
    }

    /// Configured skip entries plus those given on the command line.
    pub fn skip_list(&self, extra: &[String]) -> SkipList {
        let mut skip = self.config.skip_list();
        skip.extend(&extra.iter().collect());
        skip
    }

    /// An auditor over the snapshot.
    pub fn auditor(&self) -> Result<Auditor> {
        let path = self.snapshot_path();
        let snapshot = SiteSnapshot::load(&path)?;
        tracing::debug!(path = %path.display(), "loaded site snapshot");
        Ok(Auditor::new(Arc::new(snapshot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".site-audit");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn flags_override_config() {
        let temp = project("vendor: acquia\ndetail: false\n");
        let context = AuditContext::load(temp.path(), &Sources::default()).unwrap();

        let options = context.options(&RenderArgs {
            vendor: Some("pantheon".to_string()),
            detail: true,
            ..Default::default()
        });

        assert_eq!(options.vendor, "pantheon");
        assert!(options.detail);
        assert!(!options.html);
    }

    #[test]
    fn config_fills_unset_flags() {
        let temp = project("vendor: pantheon\nhtml: true\n");
        let context = AuditContext::load(temp.path(), &Sources::default()).unwrap();

        let options = context.options(&RenderArgs::default());

        assert_eq!(options.vendor, "pantheon");
        assert!(options.html);
    }

    #[test]
    fn skip_lists_are_combined() {
        let temp = project("skip: [DatabaseSize]\n");
        let context = AuditContext::load(temp.path(), &Sources::default()).unwrap();

        let skip = context.skip_list(&["views_count".to_string(), "DatabaseSize".to_string()]);

        assert_eq!(skip.entries(), &["DatabaseSize", "views_count"]);
    }

    #[test]
    fn snapshot_defaults_to_project_root() {
        let temp = project("");
        let context = AuditContext::load(temp.path(), &Sources::default()).unwrap();
        assert_eq!(context.snapshot_path(), temp.path().join("site-state.yml"));
    }

    #[test]
    fn snapshot_override_wins() {
        let temp = project("snapshot: other.yml\n");
        let sources = Sources {
            snapshot: Some(PathBuf::from("/tmp/state.yml")),
            ..Default::default()
        };
        let context = AuditContext::load(temp.path(), &sources).unwrap();
        assert_eq!(context.snapshot_path(), PathBuf::from("/tmp/state.yml"));
    }

    #[test]
    fn missing_snapshot_is_reported() {
        let temp = project("");
        let context = AuditContext::load(temp.path(), &Sources::default()).unwrap();
        let err = context.auditor().err().unwrap();
        assert!(matches!(err, AuditError::SnapshotNotFound { .. }));
    }

    #[test]
    fn parse_errors_are_not_missing_input() {
        let err = AuditError::ConfigParseError {
            path: PathBuf::from("config.yml"),
            message: "bad".to_string(),
        };
        assert!(!is_missing_input(&err));
    }

    #[test]
    fn missing_config_override_is_reported() {
        let temp = TempDir::new().unwrap();
        let sources = Sources {
            config: Some(temp.path().join("nope.yml")),
            ..Default::default()
        };
        let err = AuditContext::load(temp.path(), &sources).unwrap_err();
        assert!(matches!(err, AuditError::ConfigNotFound { .. }));
        assert!(is_missing_input(&err));
    }
}
