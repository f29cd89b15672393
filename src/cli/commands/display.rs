//! Shared rendering for report output.
//!
//! Used by `reports` and `report` so both print the same JSON and table
//! shapes.

use serde::Serialize;

use crate::cli::args::{OutputFormat, RenderArgs};
use crate::error::{AuditError, Result};
use crate::report::{AuditRun, Report};
use crate::ui::{Table, UserInterface};

/// Serialize to JSON, pretty unless `compact`.
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.map_err(|e| AuditError::Other(e.into()))
}

/// Print one report as a header, a result table and its actions.
pub fn show_report(ui: &mut dyn UserInterface, report: &Report) {
    ui.show_header(&format!("{} ({}%)", report.label, report.percent));

    if report.checks.is_empty() {
        ui.message("No checks.");
        return;
    }

    let mut table = Table::new(&["Check", "Score", "Result"]);
    for (_, check) in &report.checks {
        let score = check.score.to_string();
        table.add_row(&[check.label.as_str(), score.as_str(), check.result.as_str()]);
    }
    ui.output(&table.render());

    for (_, check) in &report.checks {
        if !check.action.is_empty() {
            ui.show_score(check.score, &format!("{}: {}", check.label, check.action));
        }
    }
}

/// Print a whole audit run in the requested format.
pub fn emit_run(ui: &mut dyn UserInterface, run: &AuditRun, render: &RenderArgs) -> Result<()> {
    match render.format {
        OutputFormat::Json => ui.output(&to_json(run, render.json)?),
        OutputFormat::Table => {
            for (_, report) in &run.reports {
                show_report(ui, report);
            }
        }
    }
    Ok(())
}

/// Print a single report in the requested format.
pub fn emit_report(ui: &mut dyn UserInterface, report: &Report, render: &RenderArgs) -> Result<()> {
    match render.format {
        OutputFormat::Json => ui.output(&to_json(report, render.json)?),
        OutputFormat::Table => show_report(ui, report),
    }
    Ok(())
}
