//! Status report checks.

use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::{Requirement, RequirementSeverity};

const REQUIREMENTS: Slot<Vec<Requirement>> = Slot::new("requirements");

/// `(title, value)` rows for requirements at or above a severity.
fn rows(requirements: &[Requirement], min: RequirementSeverity) -> Vec<(String, String)> {
    requirements
        .iter()
        .filter(|r| r.severity >= min)
        .map(|r| (r.title.clone(), r.value.clone()))
        .collect()
}

/// Problems the site's own status report flags.
pub struct StatusSystem;

impl StatusSystem {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "status_system",
        name: "StatusSystem",
        key: "SiteAuditCheckStatusSystem",
        report: ReportId::Status,
        label: "System Status",
        description: "Drupal's status report.",
    };
}

impl Check for StatusSystem {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let requirements = cx.site().requirements()?;
        let worst = requirements.iter().map(|r| r.severity).max();
        cx.set(&REQUIREMENTS, requirements);

        Ok(match worst {
            Some(RequirementSeverity::Error) => Score::Fail,
            Some(RequirementSeverity::Warning) => Score::Warn,
            _ => Score::Pass,
        })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let mut text = "No errors or warnings reported.".to_string();
        if registry.options().detail {
            let requirements = registry.get(&REQUIREMENTS)?;
            let markup = Markup::new(registry.options().html);
            text.push_str(markup.linebreak());
            text.push_str(&markup.key_value_list(
                "Title",
                "Value",
                &rows(requirements, RequirementSeverity::Info),
            ));
        }
        Some(text)
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let requirements = registry.get(&REQUIREMENTS)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The status report lists the following problems:{}{}",
            markup.linebreak(),
            markup.key_value_list(
                "Title",
                "Value",
                &rows(requirements, RequirementSeverity::Warning)
            )
        ))
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        self.result_warn(registry)
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            Action::text("Review /admin/reports/status and resolve every error and warning it lists.")
        })
    }
}
