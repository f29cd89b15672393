//! Checks command implementation.
//!
//! The `site-audit checks` command lists the check catalog, optionally
//! narrowed to one report.

use serde::Serialize;

use crate::audit::CheckDescriptor;
use crate::checks::default_catalog;
use crate::cli::args::ChecksArgs;
use crate::error::Result;
use crate::report::ReportId;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::display::to_json;

/// One catalog entry as listed.
#[derive(Debug, Serialize)]
struct CheckEntry {
    id: &'static str,
    name: &'static str,
    report: &'static str,
    label: &'static str,
    description: &'static str,
}

impl From<&CheckDescriptor> for CheckEntry {
    fn from(descriptor: &CheckDescriptor) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            report: descriptor.report.as_str(),
            label: descriptor.label,
            description: descriptor.description,
        }
    }
}

/// The checks command implementation.
pub struct ChecksCommand {
    args: ChecksArgs,
}

impl ChecksCommand {
    /// Create a new checks command.
    pub fn new(args: ChecksArgs) -> Self {
        Self { args }
    }
}

impl Command for ChecksCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = match &self.args.report {
            Some(id) => match id.parse::<ReportId>() {
                Ok(report) => Some(report),
                Err(_) => {
                    ui.error(&format!("Unknown report: {}", id));
                    return Ok(CommandResult::failure(1));
                }
            },
            None => None,
        };

        let catalog = default_catalog();
        let entries: Vec<CheckEntry> = catalog
            .iter()
            .map(|check| check.descriptor())
            .filter(|descriptor| report.is_none_or(|r| descriptor.report == r))
            .map(CheckEntry::from)
            .collect();

        if self.args.json {
            ui.output(&to_json(&entries, false)?);
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(&["Id", "Name", "Report", "Label"]);
        for entry in &entries {
            table.add_row(&[entry.id, entry.name, entry.report, entry.label]);
        }
        ui.output(&table.render());
        ui.message(&format!("{} checks", entries.len()));

        Ok(CommandResult::success())
    }
}
