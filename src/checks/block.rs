//! Block checks.

use super::slots::{EXTENSIONS, EXTENSION_COUNT};
use crate::audit::{Check, CheckDescriptor, Registry, Score};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;

/// Whether the block module is enabled.
pub struct BlockEnabled;

impl BlockEnabled {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "block_enabled",
        name: "BlockEnabled",
        key: "SiteAuditCheckBlockEnabled",
        report: ReportId::Block,
        label: "Block status",
        description: "Check to see if enabled.",
    };
}

impl Check for BlockEnabled {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(extensions) = cx.require(&EXTENSIONS, "extensions_count")? else {
            return Ok(Score::Info);
        };
        let enabled = extensions.iter().any(|e| e.name == "block" && e.enabled);
        Ok(if enabled { Score::Pass } else { Score::Info })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Block is enabled.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        if registry.contains(&EXTENSION_COUNT) {
            Some("Block is not enabled.".to_string())
        } else {
            Some("The extension list is unavailable.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::engine_for;
    use crate::site::SiteSnapshot;

    #[test]
    fn enabled_block_module_passes() {
        let snapshot = SiteSnapshot::from_yaml(
            "extensions:\n  - name: block\n    enabled: true\n",
        )
        .unwrap();
        let mut engine = engine_for(snapshot);
        assert_eq!(engine.score("block_enabled").unwrap(), Score::Pass);
        // The extension list came from its producer.
        assert!(engine.is_scored("extensions_count"));
    }

    #[test]
    fn disabled_block_module_is_info() {
        let snapshot = SiteSnapshot::from_yaml(
            "extensions:\n  - name: block\n    enabled: false\n",
        )
        .unwrap();
        let mut engine = engine_for(snapshot);
        let result = engine.result("block_enabled").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "Block is not enabled.");
    }

    #[test]
    fn missing_extension_list_degrades_to_info() {
        let mut engine = engine_for(SiteSnapshot::default());
        let result = engine.result("block_enabled").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "The extension list is unavailable.");
    }
}
