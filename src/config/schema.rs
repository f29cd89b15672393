//! Configuration schema.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audit::AuditOptions;
use crate::runner::SkipList;

/// Default snapshot file, relative to the project root.
pub const DEFAULT_SNAPSHOT: &str = "site-state.yml";

/// Project configuration from `.site-audit/config.yml`.
///
/// Every field is optional; command line flags override what is set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Hosting vendor, e.g. `pantheon`.
    pub vendor: Option<String>,

    /// Itemize results where checks support it.
    pub detail: bool,

    /// Render results as HTML.
    pub html: bool,

    /// Check ids or names left out of full audits.
    pub skip: Vec<String>,

    /// Snapshot file, relative to the project root.
    pub snapshot: Option<PathBuf>,
}

impl AuditConfig {
    /// Options for an audit run.
    pub fn options(&self) -> AuditOptions {
        AuditOptions {
            vendor: self.vendor.clone().unwrap_or_default(),
            detail: self.detail,
            html: self.html,
        }
    }

    /// Configured skip list.
    pub fn skip_list(&self) -> SkipList {
        self.skip.iter().collect()
    }

    /// Snapshot path, resolved against the project root.
    pub fn snapshot_path(&self, project_root: &std::path::Path) -> PathBuf {
        let path = self
            .snapshot
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT));
        if path.is_absolute() {
            path
        } else {
            project_root.join(path)
        }
    }
}
