//! Schema command implementation.
//!
//! The `site-audit schema` command prints the JSON Schema of the snapshot
//! or config file format, for editor completion and validation.

use schemars::schema_for;

use crate::cli::args::{SchemaArgs, SchemaTarget};
use crate::config::AuditConfig;
use crate::error::Result;
use crate::site::SiteSnapshot;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::to_json;

/// The schema command implementation.
pub struct SchemaCommand {
    args: SchemaArgs,
}

impl SchemaCommand {
    /// Create a new schema command.
    pub fn new(args: SchemaArgs) -> Self {
        Self { args }
    }

    /// Generate the schema for the requested target.
    pub fn generate(&self) -> serde_json::Value {
        let schema = match self.args.target {
            SchemaTarget::Snapshot => schema_for!(SiteSnapshot),
            SchemaTarget::Config => schema_for!(AuditConfig),
        };
        schema.to_value()
    }
}

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.output(&to_json(&self.generate(), false)?);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn snapshot_schema_lists_sections() {
        let schema = SchemaCommand::new(SchemaArgs::default()).generate();

        assert_eq!(schema["title"], "SiteSnapshot");
        let properties = schema["properties"].as_object().unwrap();
        for section in ["environment", "files", "performance", "views", "routes"] {
            assert!(properties.contains_key(section), "missing {}", section);
        }
    }

    #[test]
    fn config_schema_lists_fields() {
        let schema = SchemaCommand::new(SchemaArgs {
            target: SchemaTarget::Config,
        })
        .generate();

        assert_eq!(schema["title"], "AuditConfig");
        assert!(schema["properties"]["skip"].is_object());
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn execute_prints_json() {
        let mut ui = MockUI::new();
        let result = SchemaCommand::new(SchemaArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let value: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert!(value["$schema"].is_string());
    }
}
