//! Turning scored checks into reports.

use super::ids::ReportId;
use super::types::{AuditRun, Report};
use crate::audit::Score;
use crate::error::Result;
use crate::runner::{Engine, Selection};

/// Percentage of `sum` over `max`, rounded down; 0 when nothing contributed.
pub fn percent(sum: i64, max: i64) -> u32 {
    if max <= 0 {
        return 0;
    }
    (i128::from(sum) * 100 / i128::from(max)).clamp(0, 100) as u32
}

/// Builds reports from the checks of an engine.
pub struct ReportAssembler<'a> {
    engine: &'a mut Engine,
}

impl<'a> ReportAssembler<'a> {
    /// Assemble reports from this engine's checks.
    pub fn new(engine: &'a mut Engine) -> Self {
        Self { engine }
    }

    /// Score the selected checks and aggregate them into one report.
    ///
    /// INFO results are listed but add nothing to the percentage.
    pub fn build_report(&mut self, label: &str, selection: &Selection) -> Result<Report> {
        let mut sum = 0;
        let mut max = 0;
        let mut checks = Vec::with_capacity(selection.len());

        for idx in selection.iter() {
            let result = self.engine.render(idx)?;
            if result.score.contributes() {
                max += Score::max_weight();
                sum += result.score.weight();
            }
            let key = self.engine.descriptor(idx).key.to_string();
            checks.push((key, result));
        }

        Ok(Report {
            percent: percent(sum, max),
            label: label.to_string(),
            checks,
        })
    }

    /// Build every report that has at least one selected check.
    pub fn build_all_reports(&mut self, selection: &Selection) -> Result<AuditRun> {
        let mut reports = Vec::new();

        for report in ReportId::ALL {
            let checks = self.engine.select_for_report(report, selection);
            if checks.is_empty() {
                continue;
            }
            tracing::debug!(report = %report, checks = checks.len(), "building report");
            let built = self.build_report(report.label(), &checks)?;
            reports.push((report.key().to_string(), built));
        }

        Ok(AuditRun {
            time: self.engine.registry().started_at().timestamp(),
            reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent(3, 4), 75);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
    }

    #[test]
    fn percent_of_zero_max_is_zero() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn percent_stays_in_range() {
        assert_eq!(percent(4, 4), 100);
        assert_eq!(percent(0, 4), 0);
    }

    #[test]
    fn percent_of_extreme_sums_does_not_overflow() {
        assert_eq!(percent(i64::MAX, i64::MAX), 100);
        assert_eq!(percent(i64::MAX / 2, i64::MAX), 49);
    }
}
