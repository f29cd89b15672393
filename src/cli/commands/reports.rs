//! Reports command implementation.
//!
//! The `site-audit reports` command runs every report against the site
//! snapshot. It is also what runs when no subcommand is given.

use std::path::{Path, PathBuf};

use crate::cli::args::ReportsArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::{is_missing_input, AuditContext, Sources, MISSING_INPUT_EXIT};
use super::dispatcher::{Command, CommandResult};
use super::display::emit_run;

/// The reports command implementation.
pub struct ReportsCommand {
    project_root: PathBuf,
    sources: Sources,
    args: ReportsArgs,
}

impl ReportsCommand {
    /// Create a new reports command.
    pub fn new(project_root: &Path, sources: Sources, args: ReportsArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            sources,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ReportsArgs {
        &self.args
    }
}

impl Command for ReportsCommand {
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

        let skip = context.skip_list(&self.args.skip);
        if !skip.is_empty() {
            tracing::debug!(skip = ?skip.entries(), "skipping checks");
        }

        let run = auditor.all_reports(context.options(&self.args.render), &skip)?;
        emit_run(ui, &run, &self.args.render)?;

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{OutputFormat, RenderArgs};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"
environment: live
files:
  sites/default/settings.php: file
performance:
  page_max_age: 3600
  preprocess_css: true
  preprocess_js: false
cron:
  last_run: 1699990000
"#;

    fn setup_project(snapshot: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("site-state.yml"), snapshot).unwrap();
        temp
    }

    fn run(temp: &TempDir, args: ReportsArgs) -> (CommandResult, MockUI) {
        let cmd = ReportsCommand::new(temp.path(), Sources::default(), args);
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    fn json(ui: &MockUI) -> serde_json::Value {
        serde_json::from_str(&ui.outputs()[0]).unwrap()
    }

    #[test]
    fn reports_prints_every_report() {
        let temp = setup_project(SNAPSHOT);
        let (result, ui) = run(&temp, ReportsArgs::default());

        assert!(result.success);
        let value = json(&ui);
        assert!(value["time"].is_i64());
        assert!(value["reports"]["SiteAuditReportCache"].is_object());
        assert!(value["reports"]["SiteAuditReportWatchdog"].is_object());
        assert!(value["reports"].get("SiteAuditReportFrontEnd").is_none());
        assert_eq!(value["reports"]["SiteAuditReportStatus"]["percent"], 0);
    }

    #[test]
    fn reports_cache_scores() {
        let temp = setup_project(SNAPSHOT);
        let (_, ui) = run(&temp, ReportsArgs::default());

        let cache = &json(&ui)["reports"]["SiteAuditReportCache"];
        // PASS + PASS + FAIL out of three contributing checks.
        assert_eq!(cache["percent"], 66);
        assert_eq!(cache["checks"]["SiteAuditCheckCachePreprocessJS"]["score"], 0);
    }

    #[test]
    fn reports_skip_by_name_and_id() {
        let temp = setup_project(SNAPSHOT);
        let args = ReportsArgs {
            skip: vec!["CachePreprocessJS".to_string(), "cache_page_expire".to_string()],
            ..Default::default()
        };
        let (_, ui) = run(&temp, args);

        let checks = &json(&ui)["reports"]["SiteAuditReportCache"]["checks"];
        assert!(checks.get("SiteAuditCheckCachePreprocessJS").is_none());
        assert!(checks.get("SiteAuditCheckCachePageExpire").is_none());
        assert!(checks.get("SiteAuditCheckCachePreprocessCSS").is_some());
    }

    #[test]
    fn reports_applies_config_skip_list() {
        let temp = setup_project(SNAPSHOT);
        fs::create_dir_all(temp.path().join(".site-audit")).unwrap();
        fs::write(
            temp.path().join(".site-audit/config.yml"),
            "skip:\n  - CronLast\n  - cron_enabled\n",
        )
        .unwrap();

        let (_, ui) = run(&temp, ReportsArgs::default());
        assert!(json(&ui)["reports"].get("SiteAuditReportCron").is_none());
    }

    #[test]
    fn reports_compact_json() {
        let temp = setup_project(SNAPSHOT);
        let args = ReportsArgs {
            render: RenderArgs {
                json: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (_, ui) = run(&temp, args);
        assert!(!ui.outputs()[0].contains('\n'));
    }

    #[test]
    fn reports_table_format() {
        let temp = setup_project(SNAPSHOT);
        let args = ReportsArgs {
            render: RenderArgs {
                format: OutputFormat::Table,
                ..Default::default()
            },
            ..Default::default()
        };
        let (_, ui) = run(&temp, args);

        assert!(ui
            .headers()
            .iter()
            .any(|h| h == "Drupal's caching settings (66%)"));
        assert!(ui
            .outputs()
            .iter()
            .any(|o| o.contains("Aggregate JavaScript files in Drupal")));
    }

    #[test]
    fn reports_missing_snapshot() {
        let temp = TempDir::new().unwrap();
        let (result, ui) = run(&temp, ReportsArgs::default());

        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("Site snapshot not found"));
    }

    #[test]
    fn reports_invalid_snapshot_is_an_error() {
        let temp = setup_project("performance: [not, a, mapping]\n");
        let cmd = ReportsCommand::new(temp.path(), Sources::default(), ReportsArgs::default());
        let mut ui = MockUI::new();
        assert!(cmd.execute(&mut ui).is_err());
    }
}
