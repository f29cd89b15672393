//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::merger::merge_layers;
use super::schema::AuditConfig;
use crate::error::{AuditError, Result};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".site-audit";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. Project config (`.site-audit/config.yml`)
/// 2. Local overrides (`.site-audit/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Project config: .site-audit/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .site-audit/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A `.site-audit` directory marks the root; a `.git` directory is the
/// fallback.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_DIR).is_dir() || current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn load_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AuditError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AuditError::Io(e)
        }
    })?;

    // An empty file is an empty mapping.
    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| AuditError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into an [`AuditConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<AuditConfig> {
    if content.trim().is_empty() {
        return Ok(AuditConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| AuditError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<AuditConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AuditError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AuditError::Io(e)
        }
    })?;
    parse_config(&content, path)
}

/// Load and merge the project's config files.
///
/// A project without config files gets the defaults.
pub fn load_merged_config(project_root: &Path) -> Result<AuditConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();
    if existing.is_empty() {
        tracing::debug!(root = %project_root.display(), "no config files, using defaults");
        return Ok(AuditConfig::default());
    }

    let mut layers = Vec::with_capacity(existing.len());
    for path in existing {
        tracing::debug!(path = %path.display(), "loading config layer");
        layers.push(load_value(path)?);
    }

    serde_yaml::from_value(merge_layers(&layers)).map_err(|e| AuditError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with an optional path override.
///
/// An override is loaded on its own, without merging.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<AuditConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}
