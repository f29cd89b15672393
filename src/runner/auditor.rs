//! Audit requests.
//!
//! [`Auditor`] answers the two request shapes callers use: every report at
//! once, or a single report by id. Each request gets a fresh registry and
//! engine; nothing is cached between requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::engine::Engine;
use super::filter::SkipList;
use crate::audit::{AuditOptions, Check, Registry};
use crate::checks::default_catalog;
use crate::error::Result;
use crate::report::{AuditRun, Report, ReportAssembler, ReportId};
use crate::site::SiteState;

/// Runs audits against one site.
pub struct Auditor {
    catalog: Vec<Arc<dyn Check>>,
    site: Arc<dyn SiteState>,
    started_at: Option<DateTime<Utc>>,
}

impl Auditor {
    /// Audit a site with the built-in check catalog.
    pub fn new(site: Arc<dyn SiteState>) -> Self {
        Self::with_catalog(default_catalog(), site)
    }

    /// Audit a site with a custom catalog.
    pub fn with_catalog(catalog: Vec<Arc<dyn Check>>, site: Arc<dyn SiteState>) -> Self {
        Self {
            catalog,
            site,
            started_at: None,
        }
    }

    /// Pin the run start time instead of reading the clock.
    pub fn at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// A fresh engine for one request.
    pub fn engine(&self, options: AuditOptions) -> Engine {
        let registry = match self.started_at {
            Some(at) => Registry::with_start_time(options, at),
            None => Registry::new(options),
        };
        Engine::instantiate_all(self.catalog.clone(), registry, Arc::clone(&self.site))
    }

    /// Build every report, leaving out skipped checks.
    pub fn all_reports(&self, options: AuditOptions, skip: &SkipList) -> Result<AuditRun> {
        let mut engine = self.engine(options);
        let selection = engine.filter_skipped(&engine.all(), skip);
        ReportAssembler::new(&mut engine).build_all_reports(&selection)
    }

    /// Build one report by id.
    ///
    /// An unknown id yields an empty report labelled with the id.
    pub fn report(&self, report_id: &str, options: AuditOptions) -> Result<Report> {
        let report = match report_id.parse::<ReportId>() {
            Ok(report) => report,
            Err(_) => {
                tracing::warn!(report = report_id, "unknown report requested");
                return Ok(Report::empty(report_id));
            }
        };

        let mut engine = self.engine(options);
        let selection = engine.select_for_report(report, &engine.all());
        ReportAssembler::new(&mut engine).build_report(report.label(), &selection)
    }
}
