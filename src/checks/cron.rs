//! Cron checks.

use chrono::{DateTime, Duration, Utc};

use super::format::format_interval;
use crate::audit::{Action, Check, CheckDescriptor, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;

const LAST_RUN: Slot<DateTime<Utc>> = Slot::new("cron_last");

const INTERVAL: Slot<u64> = Slot::new("cron_interval");

/// Automated cron frequency.
pub struct CronEnabled;

impl CronEnabled {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cron_enabled",
        name: "CronEnabled",
        key: "SiteAuditCheckCronEnabled",
        report: ReportId::Cron,
        label: "Cron Enabled",
        description: "Check to see if cron is scheduled to run.",
    };
}

impl Check for CronEnabled {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(interval) = cx.site().cron()?.interval else {
            return Ok(Score::Info);
        };
        cx.set(&INTERVAL, interval);

        let max_age = CronLast::max_age();
        if interval > max_age.num_seconds().unsigned_abs() {
            return Ok(Score::Fail);
        }
        if interval > 0 {
            return Ok(Score::Info);
        }

        // Disabled; fine as long as something else runs it.
        let now = cx.now();
        let recent = cx
            .require(&LAST_RUN, "cron_last")?
            .is_some_and(|last_run| now - *last_run <= max_age);
        Ok(if recent { Score::Info } else { Score::Warn })
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("Automated cron is disabled and cron has not run in the past 24 hours.".to_string())
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        let interval = registry.get(&INTERVAL)?;
        Some(format!(
            "Automated cron runs every {}, which is less often than once a day.",
            format_interval(*interval)
        ))
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        Some(match registry.get(&INTERVAL) {
            None => "The automated cron interval is not recorded.".to_string(),
            Some(0) => "Automated cron is disabled, but cron has run in the past 24 hours (either manually or from an external scheduler).".to_string(),
            Some(interval) => format!("Automated cron runs every {}.", format_interval(*interval)),
        })
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            Action::text("Go to /admin/config/system/cron and run cron at least once a day, or schedule it from the system crontab.")
        })
    }
}

/// When cron last completed.
pub struct CronLast;

impl CronLast {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cron_last",
        name: "CronLast",
        key: "SiteAuditCheckCronLast",
        report: ReportId::Cron,
        label: "Last run",
        description: "Time Cron last executed",
    };

    /// Cron older than this is stale.
    fn max_age() -> Duration {
        Duration::hours(24)
    }
}

impl Check for CronLast {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let status = cx.site().cron()?;
        let Some(last_run) = status
            .last_run
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        else {
            return Ok(Score::Fail);
        };

        let stale = cx.now() - last_run > Self::max_age();
        cx.set(&LAST_RUN, last_run);
        Ok(if stale { Score::Warn } else { Score::Pass })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let last_run = registry.get(&LAST_RUN)?;
        Some(format!(
            "Cron last ran at {}.",
            last_run.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let last_run = registry.get(&LAST_RUN)?;
        let hours = (registry.started_at() - *last_run).num_hours();
        Some(format!(
            "Cron last ran at {}, {} hours ago.",
            last_run.format("%Y-%m-%d %H:%M:%S UTC"),
            hours
        ))
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("No record of cron having run.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        match score {
            Score::Warn => Some(Action::text(
                "Cron has not run in the last day; make sure it is scheduled and completing.",
            )),
            Score::Fail => Some(Action::text(
                "Schedule cron to run regularly, at least once a day.",
            )),
            _ => None,
        }
    }
}
