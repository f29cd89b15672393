//! Views checks.

use super::slots::{EXTENSIONS, EXTENSION_COUNT, VIEWS};
use crate::audit::{Action, Check, CheckDescriptor, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::{View, ViewCache, ViewCacheKind};

/// Views with these tags serve administration and are not audited.
const IGNORED_TAGS: &[&str] = &["admin", "commerce"];

const MASTER_DISPLAY: &str = "default";

const UNAVAILABLE: &str = "The views list is unavailable.";

/// Whether the views module is enabled.
pub struct ViewsEnabled;

impl ViewsEnabled {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "views_enabled",
        name: "ViewsEnabled",
        key: "SiteAuditCheckViewsEnabled",
        report: ReportId::Views,
        label: "Views status",
        description: "Check to see if enabled",
    };
}

impl Check for ViewsEnabled {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };
        let enabled = extensions.iter().any(|e| e.name == "views" && e.enabled);
        Ok(if enabled { Score::Pass } else { Score::Info })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Views is enabled.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        if registry.contains(&EXTENSION_COUNT) {
            Some("Views is not enabled.".to_string())
        } else {
            Some("The extension list is unavailable.".to_string())
        }
    }
}

/// Number of enabled views.
pub struct ViewsCount;

impl ViewsCount {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "views_count",
        name: "ViewsCount",
        key: "SiteAuditCheckViewsCount",
        report: ReportId::Views,
        label: "Count",
        description: "Number of enabled Views.",
    };
}

impl Check for ViewsCount {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let enabled: Vec<View> = cx
            .site()
            .views()?
            .into_iter()
            .filter(|view| view.enabled)
            .collect();
        let empty = enabled.is_empty();
        cx.set(&VIEWS, enabled);
        Ok(if empty { Score::Info } else { Score::Pass })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let views = registry.get(&VIEWS)?;
        Some(format!("There are {} enabled views.", views.len()))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("There are no enabled views.".to_string())
    }
}

/// What a display cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cached {
    Output,
    Results,
}

impl Cached {
    /// `(lifespan, custom lifespan)` in seconds.
    fn lifespans(self, cache: &ViewCache) -> (i64, i64) {
        match self {
            Cached::Output => (cache.output_lifespan, cache.output_lifespan_custom),
            Cached::Results => (cache.results_lifespan, cache.results_lifespan_custom),
        }
    }
}

/// How long a display caches its output or query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifespan {
    /// Not cached.
    None,
    /// Time-based caching with a positive lifespan.
    Timed,
    /// Tag-based caching.
    Tag,
    /// Uses the master display's settings.
    Inherited,
}

impl Lifespan {
    fn from_cache(cache: &ViewCache, cached: Cached) -> Self {
        match cache.kind {
            ViewCacheKind::None => Lifespan::None,
            ViewCacheKind::Tag => Lifespan::Tag,
            ViewCacheKind::Time => {
                let seconds = match cached.lifespans(cache) {
                    (0, custom) => custom,
                    (lifespan, _) => lifespan,
                };
                if seconds < 1 {
                    Lifespan::None
                } else {
                    Lifespan::Timed
                }
            }
        }
    }
}

/// Lifespans of one view's enabled displays.
#[derive(Debug, Default)]
struct ViewLifespans {
    master: Option<Lifespan>,
    displays: Vec<(String, Lifespan)>,
}

impl ViewLifespans {
    fn collect(view: &View, cached: Cached) -> Self {
        let mut lifespans = Self::default();
        for display in &view.displays {
            if display.enabled == Some(false) {
                continue;
            }
            let is_master = display.name == MASTER_DISPLAY;
            match (&display.cache, is_master) {
                (Some(cache), true) => {
                    lifespans.master = Some(Lifespan::from_cache(cache, cached))
                }
                (Some(cache), false) => lifespans
                    .displays
                    .push((display.name.clone(), Lifespan::from_cache(cache, cached))),
                (None, false) => lifespans
                    .displays
                    .push((display.name.clone(), Lifespan::Inherited)),
                // A master display without cache settings has nothing to inherit from.
                (None, true) => {}
            }
        }
        lifespans
    }

    /// Description of the uncached part of this view, if any.
    fn uncached(&self, view_id: &str) -> Option<String> {
        let master_uncached = self.master == Some(Lifespan::None);

        if self.displays.iter().all(|(_, l)| *l == Lifespan::Inherited) {
            return master_uncached.then(|| view_id.to_string());
        }

        let displays: Vec<&str> = self
            .displays
            .iter()
            .filter(|(_, lifespan)| match lifespan {
                Lifespan::None => true,
                Lifespan::Inherited => master_uncached,
                Lifespan::Timed | Lifespan::Tag => false,
            })
            .map(|(name, _)| name.as_str())
            .collect();

        (!displays.is_empty()).then(|| format!("{} ({})", view_id, displays.join(", ")))
    }
}

const WITHOUT_OUTPUT_CACHING: Slot<Vec<String>> = Slot::new("views_without_output_caching");
const WITHOUT_RESULTS_CACHING: Slot<Vec<String>> = Slot::new("views_without_results_caching");

/// Scores how many enabled views leave `cached` uncached, recording them in `slot`.
fn score_caching(
    cx: &mut ScoringContext<'_>,
    cached: Cached,
    slot: &Slot<Vec<String>>,
) -> Result<Score> {
    let is_dev = cx.site().environment().is_dev();
    let Some(views) = cx.require(&VIEWS, "views_count")? else {
        return Ok(Score::Info);
    };

    let total = views.len();
    let uncached: Vec<String> = views
        .iter()
        .filter(|view| !IGNORED_TAGS.contains(&view.tag.as_str()))
        .filter_map(|view| ViewLifespans::collect(view, cached).uncached(&view.id))
        .collect();

    let score = if uncached.is_empty() {
        Score::Pass
    } else if is_dev {
        Score::Info
    } else if uncached.len() == total {
        Score::Fail
    } else {
        Score::Warn
    };
    cx.set(slot, uncached);
    Ok(score)
}

/// Steps to turn on caching for a display.
fn caching_steps(intro: &str) -> Action {
    Action::Steps {
        intro: intro.to_string(),
        steps: [
            "Go to /admin/structure/views/",
            "Edit the View in question",
            "Select the Display",
            "Click Advanced",
            "Next to Caching, click to edit.",
            "Caching: (something other than None)",
        ]
        .iter()
        .map(|step| step.to_string())
        .collect(),
    }
}

/// Views that don't cache rendered output.
pub struct ViewsCacheOutput;

impl ViewsCacheOutput {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "views_cache_output",
        name: "ViewsCacheOutput",
        key: "SiteAuditCheckViewsCacheOutput",
        report: ReportId::Views,
        label: "Rendered output caching",
        description: "Check to see if raw rendered output is being cached.",
    };
}

impl Check for ViewsCacheOutput {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        score_caching(cx, Cached::Output, &WITHOUT_OUTPUT_CACHING)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Every View is caching rendered output.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let uncached = registry.get(&WITHOUT_OUTPUT_CACHING)?;
        Some(format!(
            "The following Views are not caching rendered output: {}",
            uncached.join(", ")
        ))
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("No View is caching rendered output!".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        self.result_warn(registry)
            .or_else(|| Some(UNAVAILABLE.to_string()))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            caching_steps("Rendered output should be cached for as long as possible (if the query changes, the output will be refreshed).")
        })
    }
}

/// Views that don't cache query results.
pub struct ViewsCacheResults;

impl ViewsCacheResults {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "views_cache_results",
        name: "ViewsCacheResults",
        key: "SiteAuditCheckViewsCacheResults",
        report: ReportId::Views,
        label: "Query results caching",
        description: "Check the length of time raw query results should be cached.",
    };
}

impl Check for ViewsCacheResults {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        score_caching(cx, Cached::Results, &WITHOUT_RESULTS_CACHING)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Every View is caching query results.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let uncached = registry.get(&WITHOUT_RESULTS_CACHING)?;
        Some(format!(
            "The following Views are not caching query results: {}",
            uncached.join(", ")
        ))
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("No View is caching query results!".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        self.result_warn(registry)
            .or_else(|| Some(UNAVAILABLE.to_string()))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            caching_steps("Query results should be cached for at least 1 minute.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::engine_for;
    use crate::site::{SiteSnapshot, ViewDisplay};

    fn cache(kind: ViewCacheKind, lifespan: i64, custom: i64) -> Option<ViewCache> {
        Some(ViewCache {
            kind,
            output_lifespan: lifespan,
            output_lifespan_custom: custom,
            results_lifespan: 0,
            results_lifespan_custom: 0,
        })
    }

    fn display(name: &str, cache: Option<ViewCache>) -> ViewDisplay {
        ViewDisplay {
            name: name.to_string(),
            enabled: None,
            cache,
        }
    }

    fn view(id: &str, displays: Vec<ViewDisplay>) -> View {
        View {
            id: id.to_string(),
            tag: String::new(),
            enabled: true,
            displays,
        }
    }

    #[test]
    fn time_cache_uses_custom_lifespan_when_unset() {
        let c = ViewCache {
            kind: ViewCacheKind::Time,
            output_lifespan: 0,
            output_lifespan_custom: 120,
            results_lifespan: 3600,
            results_lifespan_custom: 0,
        };
        assert_eq!(Lifespan::from_cache(&c, Cached::Output), Lifespan::Timed);
        assert_eq!(Lifespan::from_cache(&c, Cached::Results), Lifespan::Timed);

        let zero = ViewCache {
            output_lifespan_custom: 0,
            results_lifespan: 0,
            ..c
        };
        assert_eq!(Lifespan::from_cache(&zero, Cached::Output), Lifespan::None);
        assert_eq!(Lifespan::from_cache(&zero, Cached::Results), Lifespan::None);
    }

    #[test]
    fn master_only_view_without_cache_is_uncached() {
        let v = view("frontpage", vec![display("default", cache(ViewCacheKind::None, 0, 0))]);
        assert_eq!(
            ViewLifespans::collect(&v, Cached::Output).uncached("frontpage"),
            Some("frontpage".to_string())
        );
    }

    #[test]
    fn inheriting_displays_consolidate_to_the_view() {
        let v = view(
            "archive",
            vec![
                display("default", cache(ViewCacheKind::None, 0, 0)),
                display("page_1", None),
                display("block_1", None),
            ],
        );
        assert_eq!(
            ViewLifespans::collect(&v, Cached::Output).uncached("archive"),
            Some("archive".to_string())
        );
    }

    #[test]
    fn mixed_displays_list_uncached_ones() {
        let v = view(
            "content",
            vec![
                display("default", cache(ViewCacheKind::None, 0, 0)),
                display("page_1", cache(ViewCacheKind::Tag, 0, 0)),
                display("block_1", None),
                display("feed_1", cache(ViewCacheKind::Time, 0, 0)),
            ],
        );
        assert_eq!(
            ViewLifespans::collect(&v, Cached::Output).uncached("content"),
            Some("content (block_1, feed_1)".to_string())
        );
    }

    #[test]
    fn disabled_displays_are_ignored() {
        let mut disabled = display("page_1", cache(ViewCacheKind::None, 0, 0));
        disabled.enabled = Some(false);
        let v = view(
            "glossary",
            vec![display("default", cache(ViewCacheKind::Tag, 0, 0)), disabled],
        );
        assert_eq!(ViewLifespans::collect(&v, Cached::Output).uncached("glossary"), None);
    }

    const VIEWS_YAML: &str = r#"
views:
  - id: frontpage
    displays:
      - name: default
        cache:
          type: none
  - id: content
    tag: admin
    displays:
      - name: default
        cache:
          type: none
  - id: archive
    displays:
      - name: default
        cache:
          type: tag
  - id: old
    enabled: false
"#;

    #[test]
    fn count_only_includes_enabled_views() {
        let mut engine = engine_for(SiteSnapshot::from_yaml(VIEWS_YAML).unwrap());
        let result = engine.result("views_count").unwrap();
        assert_eq!(result.score, Score::Pass);
        assert_eq!(result.result, "There are 3 enabled views.");
    }

    #[test]
    fn some_uncached_views_warn() {
        let mut engine = engine_for(SiteSnapshot::from_yaml(VIEWS_YAML).unwrap());
        let result = engine.result("views_cache_output").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert_eq!(
            result.result,
            "The following Views are not caching rendered output: frontpage"
        );
        assert!(result.action.contains("1. Go to /admin/structure/views/"));
    }

    #[test]
    fn all_uncached_views_fail() {
        let snapshot = SiteSnapshot::from_yaml(
            "views:\n  - id: frontpage\n    displays:\n      - name: default\n        cache:\n          type: none\n",
        )
        .unwrap();
        let mut engine = engine_for(snapshot);
        assert_eq!(engine.score("views_cache_output").unwrap(), Score::Fail);
    }

    #[test]
    fn uncached_views_are_info_on_dev() {
        let mut snapshot = SiteSnapshot::from_yaml(VIEWS_YAML).unwrap();
        snapshot.environment = crate::site::Environment::Dev;
        let mut engine = engine_for(snapshot);
        let result = engine.result("views_cache_output").unwrap();
        assert_eq!(result.score, Score::Info);
        assert!(result.result.ends_with("frontpage"));
        assert!(result.action.is_empty());
    }

    #[test]
    fn results_caching_is_analyzed_separately() {
        let snapshot = SiteSnapshot::from_yaml(
            r#"
views:
  - id: frontpage
    displays:
      - name: default
        cache:
          type: time
          output_lifespan: 3600
          results_lifespan: 0
          results_lifespan_custom: 0
  - id: archive
    displays:
      - name: default
        cache:
          type: time
          output_lifespan: 3600
          results_lifespan: 60
"#,
        )
        .unwrap();
        let mut engine = engine_for(snapshot);
        assert_eq!(engine.score("views_cache_output").unwrap(), Score::Pass);
        let result = engine.result("views_cache_results").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert_eq!(
            result.result,
            "The following Views are not caching query results: frontpage"
        );
        assert!(result.action.starts_with("Query results should be cached"));
    }

    #[test]
    fn views_module_status() {
        let snapshot = SiteSnapshot::from_yaml(
            "extensions:\n  - name: views\n    enabled: true\n",
        )
        .unwrap();
        let mut engine = engine_for(snapshot);
        assert_eq!(engine.score("views_enabled").unwrap(), Score::Pass);

        let mut engine = engine_for(SiteSnapshot::from_yaml("extensions: []\n").unwrap());
        let result = engine.result("views_enabled").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "Views is not enabled.");

        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("views_enabled").unwrap();
        assert_eq!(result.result, "The extension list is unavailable.");
    }

    #[test]
    fn no_views_is_info() {
        let mut engine = engine_for(SiteSnapshot::from_yaml("views: []\n").unwrap());
        assert_eq!(engine.score("views_count").unwrap(), Score::Info);
        assert_eq!(engine.score("views_cache_output").unwrap(), Score::Pass);
        assert_eq!(engine.score("views_cache_results").unwrap(), Score::Pass);
    }
}
