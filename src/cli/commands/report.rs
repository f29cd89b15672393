//! Report command implementation.
//!
//! The `site-audit report <REPORT_ID>` command runs a single report.

use std::path::{Path, PathBuf};

use crate::cli::args::ReportArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::{is_missing_input, AuditContext, Sources, MISSING_INPUT_EXIT};
use super::dispatcher::{Command, CommandResult};
use super::display::emit_report;

/// The report command implementation.
pub struct ReportCommand {
    project_root: PathBuf,
    sources: Sources,
    args: ReportArgs,
}

impl ReportCommand {
    /// Create a new report command.
    pub fn new(project_root: &Path, sources: Sources, args: ReportArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            sources,
            args,
        }
    }
}

impl Command for ReportCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = AuditContext::load(&self.project_root, &self.sources)
            .and_then(|context| context.auditor().map(|auditor| (context, auditor)));
        let (context, auditor) = match loaded {
            Ok(loaded) => loaded,
            Err(e) if is_missing_input(&e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(MISSING_INPUT_EXIT));
            }
            Err(e) => return Err(e),
        };

        // The skip list only applies to full runs.
        let report = auditor.report(&self.args.report, context.options(&self.args.render))?;
        if report.checks.is_empty() {
            ui.warning(&format!("Report '{}' has no checks", self.args.report));
        }
        emit_report(ui, &report, &self.args.render)?;

        Ok(CommandResult::success())
    }
}
