//! Extension checks.

use std::collections::BTreeMap;

use super::slots::{EXTENSIONS, EXTENSION_COUNT};
use crate::audit::{Action, AuditOptions, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::Extension;

/// Enabled extension count above which a site is considered heavy.
const EXTENSION_COUNT_LIMIT: usize = 150;

const UNAVAILABLE: &str = "The extension list is unavailable.";

/// Renders `(name, reason)` rows as a comma list, plus a table in detail mode.
fn describe_extensions(intro: &str, rows: &[(String, String)], registry: &Registry) -> String {
    let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
    let mut text = format!("{}: {}", intro, names.join(", "));
    if registry.options().detail {
        let markup = Markup::new(registry.options().html);
        text.push_str(markup.linebreak());
        text.push_str(&markup.key_value_list("Name", "Reason", rows));
    }
    text
}

/// Number of enabled extensions.
pub struct ExtensionsCount;

impl ExtensionsCount {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "extensions_count",
        name: "ExtensionsCount",
        key: "SiteAuditCheckExtensionsCount",
        report: ReportId::Extensions,
        label: "Count",
        description: "Count the number of enabled extensions (modules and themes) in a site.",
    };
}

impl Check for ExtensionsCount {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let extensions = cx.site().extensions()?;
        let count = extensions.iter().filter(|e| e.enabled).count();

        cx.set(&EXTENSIONS, extensions);
        cx.set(&EXTENSION_COUNT, count);

        Ok(if count > EXTENSION_COUNT_LIMIT {
            Score::Warn
        } else {
            Score::Pass
        })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let count = registry.get(&EXTENSION_COUNT)?;
        Some(format!("There are {} extensions enabled.", count))
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let count = registry.get(&EXTENSION_COUNT)?;
        Some(format!(
            "There are {} extensions enabled; that's higher than the average.",
            count
        ))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| Action::Steps {
            intro: "Consider the following options:".to_string(),
            steps: vec![
                "Disable unneeded or unnecessary extensions.".to_string(),
                "Consolidate functionality if possible, or custom develop a solution specific to your needs.".to_string(),
                "Avoid using modules that serve only one small purpose that is not mission critical.".to_string(),
            ],
        })
    }
}

/// Development extensions and why they don't belong on production.
const DEV_EXTENSIONS: &[(&str, &str)] = &[
    ("devel", "Debugging utility; degrades performance and exposes internals."),
    ("devel_generate", "Generates dummy content; not for production."),
    ("kint", "Debugging output; exposes internals."),
    ("webprofiler", "Collects profiling data on every request."),
    ("field_ui", "Field configuration should be deployed, not edited in production."),
    ("views_ui", "Views configuration should be deployed, not edited in production."),
    ("migrate_tools", "Migration tooling; only needed while migrating."),
    ("migrate_upgrade", "Upgrade tooling; only needed while upgrading."),
    ("stage_file_proxy", "Proxies files from another environment; not for production."),
    ("simpletest", "Testing framework; not for production."),
];

const DEV_ENABLED: Slot<Vec<(String, String)>> = Slot::new("extensions_dev");

/// Development extensions enabled on the site.
pub struct ExtensionsDev;

impl ExtensionsDev {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "extensions_dev",
        name: "ExtensionsDev",
        key: "SiteAuditCheckExtensionsDev",
        report: ReportId::Extensions,
        label: "Development",
        description: "Check for enabled development modules.",
    };
}

impl Check for ExtensionsDev {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let is_dev = cx.site().environment().is_dev();
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };

        let enabled: Vec<(String, String)> = extensions
            .iter()
            .filter(|e| e.enabled)
            .filter_map(|e| {
                DEV_EXTENSIONS
                    .iter()
                    .find(|(name, _)| *name == e.name)
                    .map(|(_, reason)| (e.display_name().to_string(), reason.to_string()))
            })
            .collect();

        let score = match (enabled.is_empty(), is_dev) {
            (true, _) => Score::Pass,
            (false, true) => Score::Info,
            (false, false) => Score::Warn,
        };
        cx.set(&DEV_ENABLED, enabled);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No enabled development extensions were detected; no action required.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let enabled = registry.get(&DEV_ENABLED)?;
        Some(describe_extensions(
            "The following development modules(s) are currently enabled",
            enabled,
            registry,
        ))
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        match registry.get(&DEV_ENABLED) {
            Some(enabled) => {
                let mut text = describe_extensions(
                    "The following development modules(s) are currently enabled",
                    enabled,
                    registry,
                );
                text.push_str(Markup::new(registry.options().html).linebreak());
                text.push_str("This is expected in a development environment.");
                Some(text)
            }
            None => Some(UNAVAILABLE.to_string()),
        }
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Disable development modules for increased stability, security and performance in production.")
        })
    }
}

const DUPLICATES: Slot<Vec<(String, String)>> = Slot::new("extensions_dupe");

/// Extensions present at more than one path.
pub struct ExtensionsDuplicate;

impl ExtensionsDuplicate {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "extensions_duplicate",
        name: "ExtensionsDuplicate",
        key: "SiteAuditCheckExtensionsDuplicate",
        report: ReportId::Extensions,
        label: "Duplicates",
        description: "Check for duplicate extensions in the site codebase.",
    };

    fn duplicates(extensions: &[Extension]) -> Vec<(String, String)> {
        let mut paths: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for extension in extensions {
            paths
                .entry(extension.name.as_str())
                .or_default()
                .push(extension.path.as_str());
        }
        paths
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(name, paths)| (name.to_string(), paths.join(", ")))
            .collect()
    }
}

impl Check for ExtensionsDuplicate {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };

        let duplicates = Self::duplicates(extensions);
        let score = if duplicates.is_empty() {
            Score::Pass
        } else {
            Score::Warn
        };
        cx.set(&DUPLICATES, duplicates);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No duplicate extensions were detected.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let duplicates = registry.get(&DUPLICATES)?;
        let markup = Markup::new(registry.options().html);
        let items: Vec<String> = duplicates
            .iter()
            .map(|(name, paths)| format!("{}: {}", name, paths))
            .collect();
        Some(format!(
            "The following duplicate extensions were found:{}{}",
            markup.linebreak(),
            markup.list(&items, false)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some(UNAVAILABLE.to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Prune your codebase to have only one copy of any given extension.")
        })
    }
}

const PANTHEON_MEMCACHE_REASON: &str = "Pantheon does not provide memcache; instead, redis is provided as a service to all customers; see http://helpdesk.getpantheon.com/customer/portal/articles/401317";

const UNRECOMMENDED: Slot<Vec<(String, String)>> = Slot::new("extensions_unrec");

/// Extensions that should not be in the codebase at all.
pub struct ExtensionsUnrecommended;

impl ExtensionsUnrecommended {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "extensions_unrecommended",
        name: "ExtensionsUnrecommended",
        key: "SiteAuditCheckExtensionsUnrecommended",
        report: ReportId::Extensions,
        label: "Not recommended",
        description: "Check for unrecommended modules.",
    };

    /// Unrecommended machine names and reasons for a run.
    fn unrecommended(options: &AuditOptions) -> Vec<(&'static str, &'static str)> {
        let mut list = vec![
            ("bad_judgement", "Joke module, framework for anarchy."),
            ("php", "Executable code should never be stored in the database."),
        ];
        if options.is_vendor("pantheon") {
            list.push(("memcache", PANTHEON_MEMCACHE_REASON));
            list.push(("memcache_storage", PANTHEON_MEMCACHE_REASON));
        }
        list
    }
}

impl Check for ExtensionsUnrecommended {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let unrecommended = Self::unrecommended(cx.options());
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };

        let found: Vec<(String, String)> = extensions
            .iter()
            .filter_map(|e| {
                unrecommended
                    .iter()
                    .find(|(name, _)| *name == e.name)
                    .map(|(_, reason)| (e.display_name().to_string(), reason.to_string()))
            })
            .collect();

        let score = if found.is_empty() {
            Score::Pass
        } else {
            Score::Fail
        };
        cx.set(&UNRECOMMENDED, found);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No unrecommended extensions were detected; no action required.".to_string())
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        let found = registry.get(&UNRECOMMENDED)?;
        Some(describe_extensions(
            "The following unrecommended modules(s) currently exist in your codebase",
            found,
            registry,
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some(UNAVAILABLE.to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text("Disable and completely remove unrecommended modules from your codebase for increased performance, stability and security in any environment.")
        })
    }
}
