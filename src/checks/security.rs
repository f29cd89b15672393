//! Security checks.

use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::Route;

/// Callbacks that execute arbitrary code.
const RISKY_CALLBACKS: &[&str] = &[
    "php_eval",
    "eval",
    "exec",
    "system",
    "passthru",
    "shell_exec",
    "popen",
    "proc_open",
    "assert",
    "create_function",
];

const RISKY_ROUTES: Slot<Vec<String>> = Slot::new("menu_router");

/// Routes dispatching to code-executing callbacks.
pub struct SecurityMenuRouter;

impl SecurityMenuRouter {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "security_menu_router",
        name: "SecurityMenuRouter",
        key: "SiteAuditCheckSecurityMenuRouter",
        report: ReportId::Security,
        label: "Menu Router",
        description: "Check for potentially malicious entries in the menu router.",
    };

    fn is_risky(callback: &str) -> bool {
        // Match bare function names as well as `Class::method` and `\fn` forms.
        let name = callback
            .rsplit(['\\', ':'])
            .next()
            .unwrap_or(callback)
            .trim();
        RISKY_CALLBACKS
            .iter()
            .any(|risky| name.eq_ignore_ascii_case(risky))
    }

    fn describe(route: &Route) -> Option<String> {
        if Self::is_risky(&route.callback) {
            Some(format!("{} (callback: {})", route.path, route.callback))
        } else if Self::is_risky(&route.access_callback) {
            Some(format!(
                "{} (access callback: {})",
                route.path, route.access_callback
            ))
        } else {
            None
        }
    }
}

impl Check for SecurityMenuRouter {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let risky: Vec<String> = cx
            .site()
            .routes()?
            .iter()
            .filter_map(Self::describe)
            .collect();

        let score = if risky.is_empty() {
            Score::Pass
        } else {
            Score::Fail
        };
        cx.set(&RISKY_ROUTES, risky);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No known potentially malicious entries were detected in the menu router.".to_string())
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        let routes = registry.get(&RISKY_ROUTES)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The following potentially malicious paths have been discovered:{}{}",
            markup.linebreak(),
            markup.list(routes, false)
        ))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| Action::Steps {
            intro: "Your site may be compromised:".to_string(),
            steps: vec![
                "Take the site offline.".to_string(),
                "Find the module registering the listed routes and remove it.".to_string(),
                "Review the codebase and database for other modifications.".to_string(),
            ],
        })
    }
}
