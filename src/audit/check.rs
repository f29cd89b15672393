//! Check definitions.
//!
//! This module provides the core types for defining audit checks:
//!
//! - [`Check`] - The trait that all checks implement
//! - [`CheckDescriptor`] - Static identity of a check variant
//! - [`Action`] - Remediation guidance attached to a result

use super::markup::Markup;
use super::registry::Registry;
use super::score::Score;
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;

/// Static identity of a check variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckDescriptor {
    /// Unique snake_case id, used for dependency invocation and skipping.
    pub id: &'static str,
    /// Short CamelCase name, also accepted in skip lists.
    pub name: &'static str,
    /// Key of the check's entry in a report.
    pub key: &'static str,
    /// Report the check belongs to.
    pub report: ReportId,
    /// Human-readable label.
    pub label: &'static str,
    /// What the check inspects.
    pub description: &'static str,
}

impl CheckDescriptor {
    /// Whether a skip-list entry names this check.
    pub fn matches(&self, entry: &str) -> bool {
        self.id == entry || self.name == entry
    }
}

/// Remediation guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A single paragraph.
    Text(String),
    /// An introduction followed by numbered steps.
    Steps { intro: String, steps: Vec<String> },
}

impl Action {
    /// A single-paragraph action.
    pub fn text(text: impl Into<String>) -> Self {
        Action::Text(text.into())
    }

    /// Render the action for output.
    pub fn render(&self, markup: Markup) -> String {
        match self {
            Action::Text(text) => text.clone(),
            Action::Steps { intro, steps } => {
                format!("{}{}{}", intro, markup.linebreak(), markup.list(steps, true))
            }
        }
    }
}

/// An audit check.
///
/// Checks are stateless: whatever they compute for other checks goes into
/// the [`Registry`], and their score is memoized by the engine. A check that
/// needs data produced by another check calls
/// [`ScoringContext::invoke`] with that check's id when the slot is absent.
pub trait Check: Send + Sync {
    /// Identity of this check.
    fn descriptor(&self) -> &CheckDescriptor;

    /// Compute the score. Runs at most once per audit run.
    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score>;

    /// Result text for [`Score::Pass`].
    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        None
    }

    /// Result text for [`Score::Warn`].
    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        None
    }

    /// Result text for [`Score::Fail`].
    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        None
    }

    /// Result text for [`Score::Info`].
    fn result_info(&self, _registry: &Registry) -> Option<String> {
        None
    }

    /// Remediation guidance for the given score, if any is needed.
    fn action(&self, _score: Score, _registry: &Registry) -> Option<Action> {
        None
    }

    /// Select the result template for a score.
    fn result(&self, score: Score, registry: &Registry) -> String {
        let text = match score {
            Score::Pass => self.result_pass(registry),
            Score::Warn => self.result_warn(registry),
            Score::Fail => self.result_fail(registry),
            Score::Info => self.result_info(registry),
        };
        text.unwrap_or_default()
    }

    /// Rendered action text; empty when no action applies.
    fn render_action(&self, score: Score, registry: &Registry) -> String {
        let markup = Markup::new(registry.options().html);
        self.action(score, registry)
            .map(|action| action.render(markup))
            .unwrap_or_default()
    }

    /// Unique id of this check.
    fn id(&self) -> &'static str {
        self.descriptor().id
    }

    /// Report this check belongs to.
    fn report(&self) -> ReportId {
        self.descriptor().report
    }
}
