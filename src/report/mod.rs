//! Report identifiers, output structures and aggregation.
//!
//! - [`ReportId`] - The fixed set of reports and their labels and keys
//! - [`ReportAssembler`] - Aggregates check scores into percentages
//! - [`Report`], [`AuditRun`], [`CheckResult`] - Serializable output

pub mod assembler;
pub mod ids;
pub mod types;

pub use assembler::{percent, ReportAssembler};
pub use ids::ReportId;
pub use types::{AuditRun, CheckResult, Report};
