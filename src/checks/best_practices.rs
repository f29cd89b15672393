//! Best practices: site layout and configuration files.

use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::FileKind;

/// Lightweight 404 pages for missing files.
pub struct BestPracticesFast404;

impl BestPracticesFast404 {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_fast_404",
        name: "BestPracticesFast404",
        key: "SiteAuditCheckBestPracticesFast404",
        report: ReportId::BestPractices,
        label: "Fast 404 pages",
        description: "Check if enabled.",
    };
}

impl Check for BestPracticesFast404 {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        Ok(if cx.site().performance()?.fast_404 {
            Score::Pass
        } else {
            Score::Warn
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Fast 404 pages are enabled.".to_string())
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("Fast 404 pages are not enabled.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Enable fast_404 in settings.php so missing images and stylesheets don't bootstrap a full page.")
        })
    }
}

/// Directories contributed and custom modules are kept in.
const MODULE_DIRECTORIES: &[&str] = &["modules/contrib", "modules/custom"];

const MISSING_MODULE_DIRECTORIES: Slot<Vec<String>> = Slot::new("missing_module_directories");

/// Contributed and custom modules live in separate directories.
pub struct BestPracticesFolderStructure;

impl BestPracticesFolderStructure {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_folder_structure",
        name: "BestPracticesFolderStructure",
        key: "SiteAuditCheckBestPracticesFolderStructure",
        report: ReportId::BestPractices,
        label: "Folder Structure",
        description: "Checks if modules/contrib and modules/custom directory is present.",
    };
}

impl Check for BestPracticesFolderStructure {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let site = cx.site();
        let mut missing = Vec::new();
        for dir in MODULE_DIRECTORIES {
            if site.file(dir)? != Some(FileKind::Directory) {
                missing.push(dir.to_string());
            }
        }

        let score = if missing.is_empty() {
            Score::Pass
        } else {
            Score::Warn
        };
        cx.set(&MISSING_MODULE_DIRECTORIES, missing);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("modules/contrib and modules/custom directories exist.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let missing = registry.get(&MISSING_MODULE_DIRECTORIES)?;
        Some(format!("Missing directories: {}.", missing.join(", ")))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Put all the contrib modules inside the ./modules/contrib directory and custom modules inside the ./modules/custom directory.")
        })
    }
}

/// Directories in `sites/` that are not site folders.
const SHARED_SITE_DIRECTORIES: &[&str] = &["all", "default"];

const MULTISITES: Slot<Vec<String>> = Slot::new("multisites");

/// Additional site folders in `sites/`.
pub struct BestPracticesMultisite;

impl BestPracticesMultisite {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_multisite",
        name: "BestPracticesMultisite",
        key: "SiteAuditCheckBestPracticesMultisite",
        report: ReportId::BestPractices,
        label: "Multi-site",
        description: "Detect multi-site configurations.",
    };
}

impl Check for BestPracticesMultisite {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let site = cx.site();
        if site.file("sites")?.is_none() {
            return Ok(Score::Info);
        }

        let mut multisites = Vec::new();
        for entry in site.directory_entries("sites")? {
            if SHARED_SITE_DIRECTORIES.contains(&entry.as_str()) {
                continue;
            }
            if site.file(&format!("sites/{}", entry))? == Some(FileKind::Directory) {
                multisites.push(entry);
            }
        }

        let unsupported = !multisites.is_empty() && cx.options().is_vendor("pantheon");
        cx.set(&MULTISITES, multisites);
        Ok(if unsupported { Score::Fail } else { Score::Info })
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        let sites = registry.get(&MULTISITES)?;
        Some(format!(
            "The following multi-site configurations were detected: {}. Pantheon does not support multi-site.",
            sites.join(", ")
        ))
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(sites) = registry.get(&MULTISITES) else {
            return Some("The sites directory was not found.".to_string());
        };
        if sites.is_empty() {
            return Some("No multi-sites detected.".to_string());
        }
        Some(format!(
            "The following multi-site configurations were detected: {}",
            sites.join(", ")
        ))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text("Split each site into its own codebase before moving to Pantheon.")
        })
    }
}

/// `sites/sites.php` is not a symbolic link.
pub struct BestPracticesSites;

impl BestPracticesSites {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_sites",
        name: "BestPracticesSites",
        key: "SiteAuditCheckBestPracticesSites",
        report: ReportId::BestPractices,
        label: "Multi-site settings",
        description: "Check if sites.php exists and is not a symbolic link.",
    };
}

impl Check for BestPracticesSites {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        Ok(match cx.site().file("sites/sites.php")? {
            Some(FileKind::Symlink) => Score::Warn,
            Some(_) => Score::Pass,
            None => Score::Info,
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("sites.php is not a symbolic link.".to_string())
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("sites/sites.php is a symbolic link.".to_string())
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("sites.php does not exist.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Don't rely on symbolic links for core configuration files; copy sites.php where it should be and remove the symbolic link.")
        })
    }
}

/// `sites/default` is a real directory.
pub struct BestPracticesSitesDefault;

impl BestPracticesSitesDefault {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_sites_default",
        name: "BestPracticesSitesDefault",
        key: "SiteAuditCheckBestPracticesSitesDefault",
        report: ReportId::BestPractices,
        label: "sites/default",
        description: "Check if it exists and isn't symbolic",
    };
}

const SITES_DEFAULT_KIND: Slot<Option<FileKind>> = Slot::new("sites_default_kind");

impl Check for BestPracticesSitesDefault {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let kind = cx.site().file("sites/default")?;
        cx.set(&SITES_DEFAULT_KIND, kind);
        Ok(match kind {
            Some(FileKind::Directory) => Score::Pass,
            Some(FileKind::Symlink) => Score::Warn,
            Some(FileKind::File) | None => Score::Fail,
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("sites/default exists.".to_string())
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("sites/default is a symbolic link.".to_string())
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        match registry.get(&SITES_DEFAULT_KIND) {
            Some(Some(FileKind::File)) => Some("sites/default is a file, not a directory!".to_string()),
            _ => Some("sites/default does not exist!".to_string()),
        }
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        match score {
            Score::Warn => Some(Action::text(
                "Don't rely on symbolic links for core configuration files; move sites/default where it should be and remove the symbolic link.",
            )),
            Score::Fail => Some(Action::text(
                "Create sites/default as a directory holding the default site's settings.",
            )),
            _ => None,
        }
    }
}

/// `sites/default/settings.php` exists and is a real file.
pub struct BestPracticesSettings;

impl BestPracticesSettings {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_settings",
        name: "BestPracticesSettings",
        key: "SiteAuditCheckBestPracticesSettings",
        report: ReportId::BestPractices,
        label: "sites/default/settings.php",
        description: "Check if the configuration file exists.",
    };
}

impl Check for BestPracticesSettings {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        Ok(match cx.site().file("sites/default/settings.php")? {
            Some(FileKind::Symlink) => Score::Warn,
            Some(_) => Score::Pass,
            None => Score::Fail,
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("settings.php exists and is not a symbolic link.".to_string())
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("sites/default/settings.php is a symbolic link.".to_string())
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("sites/default/settings.php does not exist.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        match score {
            Score::Warn => Some(Action::text(
                "Don't rely on symbolic links for core configuration files; copy settings.php where it should be and remove the symbolic link.",
            )),
            Score::Fail => Some(Action::text(
                "Even if environment settings are injected, create a stub settings.php file for compatibility.",
            )),
            _ => None,
        }
    }
}

/// `sites/default/services.yml` exists and is a real file.
pub struct BestPracticesServices;

impl BestPracticesServices {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_services",
        name: "BestPracticesServices",
        key: "SiteAuditCheckBestPracticesServices",
        report: ReportId::BestPractices,
        label: "sites/default/services.yml",
        description: "Check if the services file exists.",
    };
}

const SERVICES_MISSING: Slot<bool> = Slot::new("best_practices_services_missing");

impl Check for BestPracticesServices {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let kind = cx.site().file("sites/default/services.yml")?;
        cx.set(&SERVICES_MISSING, kind.is_none());
        Ok(match kind {
            Some(FileKind::Symlink) | None => Score::Warn,
            Some(_) => Score::Pass,
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("services.yml exists and is not a symbolic link.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        if registry.get(&SERVICES_MISSING).copied().unwrap_or(false) {
            Some("services.yml does not exist! Copy default.services.yml to services.yml.".to_string())
        } else {
            Some("sites/default/services.yml is a symbolic link.".to_string())
        }
    }

    fn action(&self, score: Score, registry: &Registry) -> Option<Action> {
        if score != Score::Warn {
            return None;
        }
        if registry.get(&SERVICES_MISSING).copied().unwrap_or(false) {
            Some(Action::text(
                "Create services.yml inside the sites/default directory by copying default.services.yml.",
            ))
        } else {
            Some(Action::text(
                "Don't rely on symbolic links for core configuration files; copy services.yml where it should be and remove the symbolic link.",
            ))
        }
    }
}

/// Files in `sites/` that do not belong there.
pub struct BestPracticesSitesSuperfluous;

impl BestPracticesSitesSuperfluous {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "best_practices_sites_superfluous",
        name: "BestPracticesSitesSuperfluous",
        key: "SiteAuditCheckBestPracticesSitesSuperfluous",
        report: ReportId::BestPractices,
        label: "Superfluous files in /sites",
        description: "Detect unnecessary files.",
    };
}

/// Files core ships or expects in `sites/`.
const EXPECTED_SITES_FILES: &[&str] = &[
    "README.txt",
    "development.services.yml",
    "example.settings.local.php",
    "example.sites.php",
    "sites.php",
];

const SUPERFLUOUS: Slot<Vec<String>> = Slot::new("superfluous");

impl Check for BestPracticesSitesSuperfluous {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let site = cx.site();
        if site.file("sites")?.is_none() {
            return Ok(Score::Info);
        }

        let mut superfluous = Vec::new();
        for entry in site.directory_entries("sites")? {
            // Directories are site folders.
            if site.file(&format!("sites/{}", entry))? == Some(FileKind::Directory) {
                continue;
            }
            if !EXPECTED_SITES_FILES.contains(&entry.as_str()) {
                superfluous.push(entry);
            }
        }

        let score = if superfluous.is_empty() {
            Score::Pass
        } else {
            Score::Warn
        };
        cx.set(&SUPERFLUOUS, superfluous);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No unnecessary files detected.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let files = registry.get(&SUPERFLUOUS)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The following extra files were detected:{}{}",
            markup.linebreak(),
            markup.list(files, false)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("The sites directory was not found.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Unless you have an explicit need for it, don't store anything other than settings here.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOptions;
    use crate::checks::testing::{engine_for, engine_with};
    use crate::site::SiteSnapshot;

    fn snapshot(yaml: &str) -> SiteSnapshot {
        SiteSnapshot::from_yaml(yaml).unwrap()
    }

    #[test]
    fn settings_present_passes() {
        let mut engine = engine_for(snapshot("files:\n  sites/default/settings.php: file\n"));
        assert_eq!(engine.score("best_practices_settings").unwrap(), Score::Pass);
        let result = engine.result("best_practices_settings").unwrap();
        assert!(result.action.is_empty());
    }

    #[test]
    fn settings_symlink_warns() {
        let mut engine = engine_for(snapshot("files:\n  sites/default/settings.php: symlink\n"));
        let result = engine.result("best_practices_settings").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert_eq!(result.result, "sites/default/settings.php is a symbolic link.");
        assert!(result.action.contains("symbolic links"));
    }

    #[test]
    fn settings_missing_fails() {
        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("best_practices_settings").unwrap();
        assert_eq!(result.score, Score::Fail);
        assert!(result.action.contains("stub settings.php"));
    }

    #[test]
    fn services_missing_warns_with_copy_hint() {
        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("best_practices_services").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(result.result.contains("does not exist"));
        assert!(result.action.contains("default.services.yml"));
    }

    #[test]
    fn superfluous_files_are_listed() {
        let mut engine = engine_for(snapshot(
            "files:\n  sites/default/settings.php: file\n  sites/example.sites.php: file\n  sites/backup.sql: file\n  sites/other/settings.php: file\n",
        ));
        let result = engine.result("best_practices_sites_superfluous").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(result.result.contains("- backup.sql"));
        assert!(!result.result.contains("example.sites.php"));
        assert!(!result.result.contains("other"));
    }

    #[test]
    fn fast_404_disabled_warns() {
        let mut engine = engine_for(snapshot("performance:\n  fast_404: false\n"));
        let result = engine.result("best_practices_fast_404").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(result.action.contains("fast_404"));

        let mut engine = engine_for(snapshot("performance:\n  fast_404: true\n"));
        assert_eq!(engine.score("best_practices_fast_404").unwrap(), Score::Pass);
    }

    #[test]
    fn folder_structure_lists_missing_directories() {
        let mut engine = engine_for(snapshot("files:\n  modules/contrib/token/token.info.yml: file\n"));
        let result = engine.result("best_practices_folder_structure").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert_eq!(result.result, "Missing directories: modules/custom.");

        let mut engine = engine_for(snapshot(
            "files:\n  modules/contrib: directory\n  modules/custom: directory\n",
        ));
        assert_eq!(
            engine.score("best_practices_folder_structure").unwrap(),
            Score::Pass
        );
    }

    const MULTISITE: &str = "files:\n  sites/default/settings.php: file\n  sites/all/modules: directory\n  sites/blog/settings.php: file\n  sites/sites.php: file\n";

    #[test]
    fn multisite_folders_are_listed() {
        let mut engine = engine_for(snapshot(MULTISITE));
        let result = engine.result("best_practices_multisite").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(
            result.result,
            "The following multi-site configurations were detected: blog"
        );
    }

    #[test]
    fn multisite_fails_on_pantheon() {
        let options = AuditOptions {
            vendor: "pantheon".to_string(),
            ..AuditOptions::default()
        };
        let mut engine = engine_with(snapshot(MULTISITE), options);
        let result = engine.result("best_practices_multisite").unwrap();
        assert_eq!(result.score, Score::Fail);
        assert!(!result.action.is_empty());
    }

    #[test]
    fn single_site_has_no_multisites() {
        let mut engine = engine_for(snapshot("files:\n  sites/default/settings.php: file\n"));
        let result = engine.result("best_practices_multisite").unwrap();
        assert_eq!(result.result, "No multi-sites detected.");
    }

    #[test]
    fn sites_php_scores() {
        let mut engine = engine_for(snapshot("files:\n  sites/sites.php: symlink\n"));
        assert_eq!(engine.score("best_practices_sites").unwrap(), Score::Warn);

        let mut engine = engine_for(snapshot(MULTISITE));
        assert_eq!(engine.score("best_practices_sites").unwrap(), Score::Pass);

        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("best_practices_sites").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "sites.php does not exist.");
    }

    #[test]
    fn sites_default_must_be_a_directory() {
        let mut engine = engine_for(snapshot("files:\n  sites/default/settings.php: file\n"));
        assert_eq!(engine.score("best_practices_sites_default").unwrap(), Score::Pass);

        let mut engine = engine_for(snapshot("files:\n  sites/default: symlink\n"));
        assert_eq!(engine.score("best_practices_sites_default").unwrap(), Score::Warn);

        let mut engine = engine_for(snapshot("files:\n  sites/default: file\n"));
        let result = engine.result("best_practices_sites_default").unwrap();
        assert_eq!(result.score, Score::Fail);
        assert_eq!(result.result, "sites/default is a file, not a directory!");

        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("best_practices_sites_default").unwrap();
        assert_eq!(result.result, "sites/default does not exist!");
    }

    #[test]
    fn missing_sites_directory_is_info() {
        let mut engine = engine_for(SiteSnapshot::default());
        assert_eq!(
            engine.score("best_practices_sites_superfluous").unwrap(),
            Score::Info
        );
    }
}
