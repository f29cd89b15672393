//! Cache backends, page cache and asset aggregation.

use super::format::format_interval;
use super::slots::CACHE_BACKENDS;
use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;
use crate::site::{CacheBackends, CacheBin};

/// Pages should be cacheable by proxies for at least this long, in seconds.
const MIN_PAGE_MAX_AGE: u64 = 900;

const PAGE_MAX_AGE: Slot<u64> = Slot::new("cache_page_max_age");

const BINS_UNAVAILABLE: &str = "The cache bin list is unavailable.";

/// Bins as `(name, backend)` rows.
fn bin_rows<'a>(
    cache: &'a CacheBackends,
    bins: impl Iterator<Item = &'a CacheBin>,
) -> Vec<(String, String)> {
    bins.map(|bin| (bin.name.clone(), cache.backend_of(bin).to_string()))
        .collect()
}

/// Every cache bin and its backend.
pub struct CacheBinsAll;

impl CacheBinsAll {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_bins_all",
        name: "CacheBinsAll",
        key: "SiteAuditCheckCacheBinsAll",
        report: ReportId::Cache,
        label: "Available cache bins",
        description: "All available cache bins.",
    };
}

impl Check for CacheBinsAll {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let cache = cx.site().cache_backends()?;
        cx.set(&CACHE_BACKENDS, cache);
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let cache = registry.get(&CACHE_BACKENDS)?;
        if cache.bins.is_empty() {
            return Some("No cache bins are defined.".to_string());
        }
        let markup = Markup::new(registry.options().html);
        Some(markup.key_value_list("Bin", "Backend", &bin_rows(cache, cache.bins.iter())))
    }
}

/// Backend used by bins without an override.
pub struct CacheBinsDefault;

impl CacheBinsDefault {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_bins_default",
        name: "CacheBinsDefault",
        key: "SiteAuditCheckCacheBinsDefault",
        report: ReportId::Cache,
        label: "Default cache bins",
        description: "All default cache bins.",
    };
}

impl Check for CacheBinsDefault {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        cx.require(&CACHE_BACKENDS, "cache_bins_all")?;
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(cache) = registry.get(&CACHE_BACKENDS) else {
            return Some(BINS_UNAVAILABLE.to_string());
        };
        let defaulted: Vec<&str> = cache
            .bins
            .iter()
            .filter(|bin| bin.backend.is_none())
            .map(|bin| bin.name.as_str())
            .collect();
        let mut text = format!("Default is {}.", cache.default_backend);
        if !defaulted.is_empty() {
            text.push_str(&format!(" Bins using it: {}.", defaulted.join(", ")));
        }
        Some(text)
    }
}

/// Bins that hold cached items.
pub struct CacheBinsUsed;

impl CacheBinsUsed {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_bins_used",
        name: "CacheBinsUsed",
        key: "SiteAuditCheckCacheBinsUsed",
        report: ReportId::Cache,
        label: "Used cache bins",
        description: "All the cache bins that are currently in use.",
    };
}

impl Check for CacheBinsUsed {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        cx.require(&CACHE_BACKENDS, "cache_bins_all")?;
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(cache) = registry.get(&CACHE_BACKENDS) else {
            return Some(BINS_UNAVAILABLE.to_string());
        };
        let used = bin_rows(cache, cache.bins.iter().filter(|bin| bin.items > 0));
        if used.is_empty() {
            return Some("No cache bins hold any items.".to_string());
        }
        let markup = Markup::new(registry.options().html);
        Some(markup.key_value_list("Bin", "Backend", &used))
    }
}

/// Browser and proxy cache lifetime.
pub struct CachePageExpire;

impl CachePageExpire {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_page_expire",
        name: "CachePageExpire",
        key: "SiteAuditCheckCachePageExpire",
        report: ReportId::Cache,
        label: "Expiration of cached pages",
        description: "Verify that Drupal's cached pages last for at least 15 minutes.",
    };
}

impl Check for CachePageExpire {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let max_age = cx.site().performance()?.page_max_age;
        let is_dev = cx.site().environment().is_dev();
        cx.set(&PAGE_MAX_AGE, max_age);

        Ok(match max_age {
            0 if is_dev => Score::Info,
            0 => Score::Fail,
            age if age < MIN_PAGE_MAX_AGE => Score::Warn,
            _ => Score::Pass,
        })
    }

    fn result_pass(&self, registry: &Registry) -> Option<String> {
        let age = registry.get(&PAGE_MAX_AGE)?;
        Some(format!(
            "Expiration of cached pages is set to {}.",
            format_interval(*age)
        ))
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let age = registry.get(&PAGE_MAX_AGE)?;
        Some(format!(
            "Expiration of cached pages only set to {}.",
            format_interval(*age)
        ))
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("Expiration of cached pages not set!".to_string())
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("Expiration of cached pages not set; this is expected in a development environment.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        matches!(score, Score::Warn | Score::Fail).then(|| {
            Action::text(
                "Go to /admin/config/development/performance and set \"Browser and proxy cache maximum age\" to 15 minutes or more.",
            )
        })
    }
}

fn aggregation_score(enabled: bool, is_dev: bool) -> Score {
    match (enabled, is_dev) {
        (true, _) => Score::Pass,
        (false, true) => Score::Info,
        (false, false) => Score::Fail,
    }
}

/// CSS aggregation.
pub struct CachePreprocessCss;

impl CachePreprocessCss {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_preprocess_css",
        name: "CachePreprocessCSS",
        key: "SiteAuditCheckCachePreprocessCSS",
        report: ReportId::Cache,
        label: "Aggregate and compress CSS files in Drupal",
        description: "Verify that Drupal is aggregating and compressing CSS.",
    };
}

impl Check for CachePreprocessCss {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let site = cx.site();
        Ok(aggregation_score(
            site.performance()?.preprocess_css,
            site.environment().is_dev(),
        ))
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("CSS aggregation and compression is enabled.".to_string())
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("CSS aggregation is not enabled!".to_string())
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("CSS aggregation is not enabled; this is expected in a development environment.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text(
                "Go to /admin/config/development/performance and check \"Aggregate CSS files\".",
            )
        })
    }
}

/// JavaScript aggregation.
pub struct CachePreprocessJs;

impl CachePreprocessJs {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "cache_preprocess_js",
        name: "CachePreprocessJS",
        key: "SiteAuditCheckCachePreprocessJS",
        report: ReportId::Cache,
        label: "Aggregate JavaScript files in Drupal",
        description: "Verify that Drupal is aggregating JavaScript.",
    };
}

impl Check for CachePreprocessJs {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let site = cx.site();
        Ok(aggregation_score(
            site.performance()?.preprocess_js,
            site.environment().is_dev(),
        ))
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("JavaScript aggregation is enabled.".to_string())
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("JavaScript aggregation is not enabled!".to_string())
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("JavaScript aggregation is not enabled; this is expected in a development environment.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text(
                "Go to /admin/config/development/performance and check \"Aggregate JavaScript files\".",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::engine_for;
    use crate::site::SiteSnapshot;

    fn perf(yaml: &str) -> SiteSnapshot {
        SiteSnapshot::from_yaml(yaml).unwrap()
    }

    #[test]
    fn long_page_lifetime_passes() {
        let mut engine = engine_for(perf("performance:\n  page_max_age: 3600\n"));
        let result = engine.result("cache_page_expire").unwrap();
        assert_eq!(result.score, Score::Pass);
        assert_eq!(result.result, "Expiration of cached pages is set to 1 hour.");
    }

    #[test]
    fn short_page_lifetime_warns() {
        let mut engine = engine_for(perf("performance:\n  page_max_age: 300\n"));
        let result = engine.result("cache_page_expire").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(result.result.contains("5 min"));
        assert!(!result.action.is_empty());
    }

    #[test]
    fn unset_page_lifetime_fails_on_live() {
        let mut engine = engine_for(perf("performance:\n  page_max_age: 0\n"));
        assert_eq!(engine.score("cache_page_expire").unwrap(), Score::Fail);
    }

    #[test]
    fn unset_page_lifetime_is_info_on_dev() {
        let mut engine = engine_for(perf("environment: dev\nperformance:\n  page_max_age: 0\n"));
        assert_eq!(engine.score("cache_page_expire").unwrap(), Score::Info);
    }

    #[test]
    fn aggregation_scores() {
        let mut engine = engine_for(perf(
            "performance:\n  preprocess_css: true\n  preprocess_js: false\n",
        ));
        assert_eq!(engine.score("cache_preprocess_css").unwrap(), Score::Pass);
        assert_eq!(engine.score("cache_preprocess_js").unwrap(), Score::Fail);
        let js = engine.result("cache_preprocess_js").unwrap();
        assert!(js.action.contains("Aggregate JavaScript files"));
    }

    const BINS: &str = r#"
cache:
  default_backend: cache.backend.database
  bins:
    - name: render
      items: 40
    - name: page
      backend: cache.backend.memcache
      items: 3
    - name: discovery
"#;

    #[test]
    fn all_bins_are_listed_with_backends() {
        let mut engine = engine_for(perf(BINS));
        let result = engine.result("cache_bins_all").unwrap();
        assert_eq!(result.score, Score::Info);
        assert!(result.result.contains("render: cache.backend.database"));
        assert!(result.result.contains("page: cache.backend.memcache"));
        assert!(result.result.contains("discovery: cache.backend.database"));
    }

    #[test]
    fn default_backend_names_its_bins() {
        let mut engine = engine_for(perf(BINS));
        let result = engine.result("cache_bins_default").unwrap();
        assert_eq!(
            result.result,
            "Default is cache.backend.database. Bins using it: render, discovery."
        );
        assert_eq!(engine.registry().owner(&CACHE_BACKENDS), Some("cache_bins_all"));
    }

    #[test]
    fn used_bins_skip_empty_ones() {
        let mut engine = engine_for(perf(BINS));
        let result = engine.result("cache_bins_used").unwrap();
        assert!(result.result.contains("render: cache.backend.database"));
        assert!(result.result.contains("page: cache.backend.memcache"));
        assert!(!result.result.contains("discovery"));
    }

    #[test]
    fn missing_cache_section_degrades_bin_checks() {
        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("cache_bins_used").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, BINS_UNAVAILABLE);
        assert!(engine.result("cache_bins_all").unwrap().result.contains("cache"));
    }

    #[test]
    fn missing_performance_section_is_info() {
        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("cache_preprocess_css").unwrap();
        assert_eq!(result.score, Score::Info);
        assert!(result.result.contains("performance"));
    }
}
