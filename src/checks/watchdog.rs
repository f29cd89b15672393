//! Database log checks.

use chrono::DateTime;

use super::slots::{EXTENSIONS, EXTENSION_COUNT, WATCHDOG};
use crate::audit::{Action, Check, CheckDescriptor, Registry, Score};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::WatchdogSummary;

/// Share of "page not found" entries, in percent, above which the log is noisy.
const NOT_FOUND_PERCENT_LIMIT: u64 = 10;

const NOT_ENABLED: &str = "Database logging (dblog) is not enabled; if the site is using syslog, check there instead.";

/// Log statistics, when database logging is on.
fn enabled_summary(registry: &Registry) -> Option<&WatchdogSummary> {
    registry.get(&WATCHDOG).filter(|summary| summary.enabled)
}

const SUMMARY_UNAVAILABLE: &str = "The log summary is unavailable.";

/// Whether database logging is on.
pub struct WatchdogEnabled;

impl WatchdogEnabled {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_enabled",
        name: "WatchdogEnabled",
        key: "SiteAuditCheckWatchdogEnabled",
        report: ReportId::Watchdog,
        label: "dblog status",
        description: "Check to see if database logging is enabled",
    };
}

impl Check for WatchdogEnabled {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let enabled = cx
            .require(&WATCHDOG, "watchdog_count")?
            .is_some_and(|summary| summary.enabled);
        Ok(if enabled { Score::Pass } else { Score::Info })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Database logging (dblog) is enabled.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        if registry.contains(&WATCHDOG) {
            Some(NOT_ENABLED.to_string())
        } else {
            Some(SUMMARY_UNAVAILABLE.to_string())
        }
    }
}

/// Number of log entries.
pub struct WatchdogCount;

impl WatchdogCount {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_count",
        name: "WatchdogCount",
        key: "SiteAuditCheckWatchdogCount",
        report: ReportId::Watchdog,
        label: "Count",
        description: "Number of dblog entries.",
    };
}

impl Check for WatchdogCount {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let summary = cx.site().watchdog()?;
        cx.set(&WATCHDOG, summary);
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(summary) = enabled_summary(registry) else {
            return Some(NOT_ENABLED.to_string());
        };
        Some(match summary.entries {
            0 => "There are no dblog entries.".to_string(),
            1 => "There is one dblog entry.".to_string(),
            n => format!("There are {} log entries.", n),
        })
    }
}

/// Time span the log covers.
pub struct WatchdogAge;

impl WatchdogAge {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_age",
        name: "WatchdogAge",
        key: "SiteAuditCheckWatchdogAge",
        report: ReportId::Watchdog,
        label: "Date range of log entries",
        description: "Oldest and newest.",
    };
}

impl Check for WatchdogAge {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        cx.require(&WATCHDOG, "watchdog_count")?;
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        if !registry.contains(&WATCHDOG) {
            return Some(SUMMARY_UNAVAILABLE.to_string());
        }
        let Some(summary) = enabled_summary(registry) else {
            return Some(NOT_ENABLED.to_string());
        };
        let Some(oldest) = summary.oldest.and_then(|ts| DateTime::from_timestamp(ts, 0)) else {
            return Some("There are no log entries.".to_string());
        };
        let newest = summary
            .newest
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| registry.started_at());

        let days = (newest - oldest).num_days();
        Some(format!(
            "From {} to {} ({} {}).",
            oldest.format("%Y-%m-%d %H:%M:%S UTC"),
            newest.format("%Y-%m-%d %H:%M:%S UTC"),
            days,
            if days == 1 { "day" } else { "days" }
        ))
    }
}

/// PHP messages in the log.
pub struct WatchdogPhp;

impl WatchdogPhp {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_php",
        name: "WatchdogPhp",
        key: "SiteAuditCheckWatchdogPhp",
        report: ReportId::Watchdog,
        label: "PHP messages",
        description: "Count PHP notices, warnings and errors.",
    };
}

impl Check for WatchdogPhp {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(summary) = cx.require(&WATCHDOG, "watchdog_count")? else {
            return Ok(Score::Info);
        };
        if !summary.enabled {
            return Ok(Score::Info);
        }

        let php = &summary.php;
        Ok(if php.error > 0 {
            Score::Fail
        } else if php.total() > 0 {
            Score::Warn
        } else {
            Score::Pass
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No PHP warnings, notices or errors.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let php = &enabled_summary(registry)?.php;
        Some(format!(
            "PHP messages: {} notices, {} warnings, {} errors.",
            php.notice, php.warning, php.error
        ))
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        self.result_warn(registry)
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some(NOT_ENABLED.to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            Action::text("Every time Drupal logs a PHP notice, warning or error, PHP executes slower and the writing operation locks the database. Fix the code producing them.")
        })
    }
}

/// Share of "page not found" entries.
pub struct Watchdog404;

impl Watchdog404 {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_404",
        name: "Watchdog404",
        key: "SiteAuditCheckWatchdog404",
        report: ReportId::Watchdog,
        label: "Number of 404 entries",
        description: "Count the number of page not found entries.",
    };

    fn percent(summary: &WatchdogSummary) -> u64 {
        if summary.entries == 0 {
            0
        } else {
            let percent = u128::from(summary.not_found) * 100 / u128::from(summary.entries);
            u64::try_from(percent).unwrap_or(u64::MAX)
        }
    }
}

impl Check for Watchdog404 {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(summary) = cx.require(&WATCHDOG, "watchdog_count")? else {
            return Ok(Score::Info);
        };
        if !summary.enabled {
            return Ok(Score::Info);
        }
        Ok(if Self::percent(summary) > NOT_FOUND_PERCENT_LIMIT {
            Score::Warn
        } else {
            Score::Pass
        })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let summary = enabled_summary(registry)?;
        Some(match summary.not_found {
            0 => "No 404 entries.".to_string(),
            n => format!("{} 404 entries.", n),
        })
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let summary = enabled_summary(registry)?;
        Some(format!(
            "{} pages not found ({}% of the log).",
            summary.not_found,
            Self::percent(summary)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some(NOT_ENABLED.to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Review the top 404 paths in the log and fix or redirect the broken links.")
        })
    }
}

/// Whether the syslog module is enabled.
pub struct WatchdogSyslog;

impl WatchdogSyslog {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "watchdog_syslog",
        name: "WatchdogSyslog",
        key: "SiteAuditCheckWatchdogSyslog",
        report: ReportId::Watchdog,
        label: "syslog status",
        description: "Check to see if syslog logging is enabled",
    };
}

impl Check for WatchdogSyslog {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let pantheon = cx.options().is_vendor("pantheon");
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };
        let enabled = extensions.iter().any(|e| e.name == "syslog" && e.enabled);
        Ok(match (enabled, pantheon) {
            (true, true) => Score::Fail,
            (true, false) => Score::Pass,
            (false, _) => Score::Info,
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Syslog logging is enabled.".to_string())
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("Syslog logging is enabled, but Pantheon does not collect it.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        if registry.contains(&EXTENSION_COUNT) {
            Some("Syslog logging is not enabled.".to_string())
        } else {
            Some("The extension list is unavailable.".to_string())
        }
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text("Disable the syslog module; on Pantheon, log through dblog or an external log service instead.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOptions;
    use crate::checks::testing::{engine_for, engine_with};
    use crate::runner::Engine;
    use crate::site::SiteSnapshot;

    fn watchdog(yaml: &str) -> SiteSnapshot {
        SiteSnapshot::from_yaml(&format!("watchdog:\n{}", yaml)).unwrap()
    }

    #[test]
    fn count_reports_entries() {
        let mut engine = engine_for(watchdog("  enabled: true\n  entries: 250\n"));
        let result = engine.result("watchdog_count").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "There are 250 log entries.");
    }

    #[test]
    fn php_errors_fail() {
        let mut engine = engine_for(watchdog(
            "  enabled: true\n  entries: 10\n  php:\n    notice: 2\n    error: 1\n",
        ));
        let result = engine.result("watchdog_php").unwrap();
        assert_eq!(result.score, Score::Fail);
        assert_eq!(result.result, "PHP messages: 2 notices, 0 warnings, 1 errors.");
    }

    #[test]
    fn php_notices_warn() {
        let mut engine = engine_for(watchdog(
            "  enabled: true\n  entries: 10\n  php:\n    notice: 2\n",
        ));
        assert_eq!(engine.score("watchdog_php").unwrap(), Score::Warn);
    }

    #[test]
    fn clean_log_passes() {
        let mut engine = engine_for(watchdog("  enabled: true\n  entries: 10\n"));
        assert_eq!(engine.score("watchdog_php").unwrap(), Score::Pass);
        assert_eq!(engine.score("watchdog_404").unwrap(), Score::Pass);
    }

    #[test]
    fn many_404s_warn() {
        let mut engine = engine_for(watchdog(
            "  enabled: true\n  entries: 100\n  not_found: 25\n",
        ));
        let result = engine.result("watchdog_404").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert_eq!(result.result, "25 pages not found (25% of the log).");
    }

    #[test]
    fn huge_not_found_count_does_not_overflow() {
        let mut engine = engine_for(watchdog(&format!(
            "  enabled: true\n  entries: {max}\n  not_found: {max}\n",
            max = u64::MAX
        )));
        let result = engine.result("watchdog_404").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(result.result.contains("(100% of the log)"));
    }

    #[test]
    fn enabled_logging_passes() {
        let mut engine = engine_for(watchdog("  enabled: true\n"));
        assert_eq!(engine.score("watchdog_enabled").unwrap(), Score::Pass);

        let mut engine = engine_for(watchdog("  enabled: false\n"));
        let result = engine.result("watchdog_enabled").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, NOT_ENABLED);

        let mut engine = engine_for(SiteSnapshot::default());
        assert_eq!(
            engine.result("watchdog_enabled").unwrap().result,
            SUMMARY_UNAVAILABLE
        );
    }

    #[test]
    fn age_spans_oldest_to_newest() {
        let mut engine = engine_for(watchdog(
            "  enabled: true\n  entries: 10\n  oldest: 1699000000\n  newest: 1699864000\n",
        ));
        let result = engine.result("watchdog_age").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(
            result.result,
            "From 2023-11-03 08:26:40 UTC to 2023-11-13 08:26:40 UTC (10 days)."
        );
    }

    #[test]
    fn age_of_an_empty_log() {
        let mut engine = engine_for(watchdog("  enabled: true\n"));
        let result = engine.result("watchdog_age").unwrap();
        assert_eq!(result.result, "There are no log entries.");
    }

    fn syslog(vendor: &str) -> Engine {
        let snapshot = SiteSnapshot::from_yaml(
            "extensions:\n  - name: syslog\n    enabled: true\n",
        )
        .unwrap();
        let options = AuditOptions {
            vendor: vendor.to_string(),
            ..AuditOptions::default()
        };
        engine_with(snapshot, options)
    }

    #[test]
    fn syslog_enabled_passes() {
        let mut engine = syslog("");
        assert_eq!(engine.score("watchdog_syslog").unwrap(), Score::Pass);
    }

    #[test]
    fn syslog_fails_on_pantheon() {
        let mut engine = syslog("pantheon");
        let result = engine.result("watchdog_syslog").unwrap();
        assert_eq!(result.score, Score::Fail);
        assert!(result.action.contains("Disable the syslog module"));
    }

    #[test]
    fn syslog_disabled_is_info() {
        let snapshot = SiteSnapshot::from_yaml("extensions: []\n").unwrap();
        let mut engine = engine_for(snapshot);
        let result = engine.result("watchdog_syslog").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "Syslog logging is not enabled.");
    }

    #[test]
    fn disabled_logging_is_info() {
        let mut engine = engine_for(watchdog("  enabled: false\n"));
        let result = engine.result("watchdog_php").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, NOT_ENABLED);
        assert_eq!(engine.result("watchdog_count").unwrap().result, NOT_ENABLED);
    }
}
