//! Report output structures.

use serde::{Serialize, Serializer};

use crate::audit::Score;

/// Rendered outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub label: String,
    pub description: String,
    pub result: String,
    pub action: String,
    pub score: Score,
}

/// Scored group of check results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Aggregate score, 0 to 100.
    pub percent: u32,
    pub label: String,
    /// Results keyed by check key, in catalog order.
    #[serde(serialize_with = "ordered_map")]
    pub checks: Vec<(String, CheckResult)>,
}

impl Report {
    /// A report with no checks.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            percent: 0,
            label: label.into(),
            checks: Vec::new(),
        }
    }

    /// Look up a check result by key.
    pub fn check(&self, key: &str) -> Option<&CheckResult> {
        self.checks
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, result)| result)
    }
}

/// Every report of one audit invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRun {
    /// Unix timestamp of the run.
    pub time: i64,
    /// Reports keyed by report key, in report order.
    #[serde(serialize_with = "ordered_map")]
    pub reports: Vec<(String, Report)>,
}

impl AuditRun {
    /// Look up a report by key.
    pub fn report(&self, key: &str) -> Option<&Report> {
        self.reports
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, report)| report)
    }
}

#[allow(clippy::ptr_arg)]
fn ordered_map<S, V>(entries: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}
