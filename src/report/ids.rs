//! Report identifiers.
//!
//! Every report has a snake_case id (used by callers and by checks to
//! declare their grouping), a display label, and a stable output key. The
//! mapping is a fixed table; nothing is derived from strings at runtime.

use std::str::FromStr;

/// Identifier of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportId {
    BestPractices,
    Block,
    Cache,
    Cron,
    Database,
    Extensions,
    FrontEnd,
    Status,
    Security,
    Users,
    Views,
    Watchdog,
}

impl ReportId {
    /// All reports, in output order.
    pub const ALL: [ReportId; 12] = [
        ReportId::BestPractices,
        ReportId::Block,
        ReportId::Cache,
        ReportId::Cron,
        ReportId::Database,
        ReportId::Extensions,
        ReportId::FrontEnd,
        ReportId::Status,
        ReportId::Security,
        ReportId::Users,
        ReportId::Views,
        ReportId::Watchdog,
    ];

    /// The snake_case id.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportId::BestPractices => "best_practices",
            ReportId::Block => "block",
            ReportId::Cache => "cache",
            ReportId::Cron => "cron",
            ReportId::Database => "database",
            ReportId::Extensions => "extensions",
            ReportId::FrontEnd => "front_end",
            ReportId::Status => "status",
            ReportId::Security => "security",
            ReportId::Users => "users",
            ReportId::Views => "views",
            ReportId::Watchdog => "watchdog",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ReportId::BestPractices => "Best practices",
            ReportId::Block => "Block",
            ReportId::Cache => "Drupal's caching settings",
            ReportId::Cron => "Cron",
            ReportId::Database => "Database",
            ReportId::Extensions => "Extensions",
            ReportId::FrontEnd => "Front End",
            ReportId::Status => "Status",
            ReportId::Security => "Security",
            ReportId::Users => "Users",
            ReportId::Views => "Views",
            ReportId::Watchdog => "Watchdog database logs",
        }
    }

    /// Key under which the report appears in an audit run.
    pub fn key(self) -> &'static str {
        match self {
            ReportId::BestPractices => "SiteAuditReportBestPractices",
            ReportId::Block => "SiteAuditReportBlock",
            ReportId::Cache => "SiteAuditReportCache",
            ReportId::Cron => "SiteAuditReportCron",
            ReportId::Database => "SiteAuditReportDatabase",
            ReportId::Extensions => "SiteAuditReportExtensions",
            ReportId::FrontEnd => "SiteAuditReportFrontEnd",
            ReportId::Status => "SiteAuditReportStatus",
            ReportId::Security => "SiteAuditReportSecurity",
            ReportId::Users => "SiteAuditReportUsers",
            ReportId::Views => "SiteAuditReportViews",
            ReportId::Watchdog => "SiteAuditReportWatchdog",
        }
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        ReportId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("unknown report: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_case_ids() {
        assert_eq!("best_practices".parse::<ReportId>(), Ok(ReportId::BestPractices));
        assert_eq!("watchdog".parse::<ReportId>(), Ok(ReportId::Watchdog));
    }

    #[test]
    fn parses_kebab_case_ids() {
        assert_eq!("best-practices".parse::<ReportId>(), Ok(ReportId::BestPractices));
        assert_eq!("front-end".parse::<ReportId>(), Ok(ReportId::FrontEnd));
    }

    #[test]
    fn rejects_unknown_ids() {
        assert!("insights".parse::<ReportId>().is_err());
    }

    #[test]
    fn ids_round_trip_through_display() {
        for id in ReportId::ALL {
            assert_eq!(id.to_string().parse::<ReportId>(), Ok(id));
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = ReportId::ALL.iter().map(|id| id.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), ReportId::ALL.len());
    }

    #[test]
    fn cache_label() {
        assert_eq!(ReportId::Cache.label(), "Drupal's caching settings");
    }
}
