//! Database checks.

use super::format::format_bytes;
use super::slots::DATABASE_TABLES;
use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score, Slot};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;

const DATABASE_SIZE: Slot<u64> = Slot::new("database_size");
const DATABASE_NAME: Slot<String> = Slot::new("database_name");
const ROWS_BY_TABLE: Slot<Vec<(String, String)>> = Slot::new("rows_by_table");
const COLLATION_TABLES: Slot<Vec<(String, String)>> = Slot::new("collation_tables");
const ENGINE_TABLES: Slot<Vec<(String, String)>> = Slot::new("engine_tables");
const FRAGMENTED_TABLES: Slot<Vec<(String, String)>> = Slot::new("fragmented_tables");

/// Tables above this many rows are listed.
const ROW_COUNT_THRESHOLD: u64 = 1000;

const EXPECTED_COLLATION_PREFIX: &str = "utf8mb4";
const EXPECTED_ENGINE: &str = "InnoDB";

/// Share of unused space, in percent, above which a table is fragmented.
const FRAGMENTATION_PERCENT_LIMIT: u128 = 5;

/// Total size of the database.
pub struct DatabaseSize;

impl DatabaseSize {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "database_size",
        name: "DatabaseSize",
        key: "SiteAuditCheckDatabaseSize",
        report: ReportId::Database,
        label: "Total size",
        description: "Determine the size of the database.",
    };
}

impl Check for DatabaseSize {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let database = cx.site().database()?;
        let size = database
            .tables
            .iter()
            .map(|t| t.size_bytes)
            .fold(0u64, u64::saturating_add);
        let empty = database.tables.is_empty();

        cx.set(&DATABASE_SIZE, size);
        cx.set(&DATABASE_NAME, database.name);
        cx.set(&DATABASE_TABLES, database.tables);

        Ok(if empty { Score::Fail } else { Score::Info })
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("Empty, or unable to determine the size due to a permission error.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let size = registry.get(&DATABASE_SIZE)?;
        let name = registry.get(&DATABASE_NAME)?;
        Some(format!(
            "Total size: {} ({} tables){}",
            format_bytes(*size),
            registry.get(&DATABASE_TABLES).map_or(0, Vec::len),
            if name.is_empty() {
                String::new()
            } else {
                format!(" in database {}", name)
            }
        ))
    }
}

/// Tables with many rows.
pub struct DatabaseRowCount;

impl DatabaseRowCount {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "database_row_count",
        name: "DatabaseRowCount",
        key: "SiteAuditCheckDatabaseRowCount",
        report: ReportId::Database,
        label: "Tables with at least 1000 rows",
        description: "Return list of all tables with at least 1000 rows in the database.",
    };
}

impl Check for DatabaseRowCount {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(tables) = cx.require(&DATABASE_TABLES, "database_size")? else {
            return Ok(Score::Info);
        };

        let mut large: Vec<_> = tables
            .iter()
            .filter(|t| t.rows >= ROW_COUNT_THRESHOLD)
            .map(|t| (t.name.clone(), t.rows))
            .collect();
        large.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let rows = large
            .into_iter()
            .map(|(name, rows)| (name, rows.to_string()))
            .collect();
        cx.set(&ROWS_BY_TABLE, rows);
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(rows) = registry.get(&ROWS_BY_TABLE) else {
            return Some("The table list is unavailable.".to_string());
        };
        if rows.is_empty() {
            return Some(format!(
                "No tables with at least {} rows.",
                ROW_COUNT_THRESHOLD
            ));
        }

        let markup = Markup::new(registry.options().html);
        let mut text = format!(
            "There are {} tables with at least {} rows.",
            rows.len(),
            ROW_COUNT_THRESHOLD
        );
        if registry.options().detail {
            text.push_str(markup.linebreak());
            text.push_str(&markup.key_value_list("Table Name", "Rows", rows));
        }
        Some(text)
    }
}

/// Tables not using the expected collation.
pub struct DatabaseCollation;

impl DatabaseCollation {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "database_collation",
        name: "DatabaseCollation",
        key: "SiteAuditCheckDatabaseCollation",
        report: ReportId::Database,
        label: "Collations",
        description: "Check to see if there are any tables that aren't using UTF-8.",
    };
}

impl Check for DatabaseCollation {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(tables) = cx.require(&DATABASE_TABLES, "database_size")? else {
            return Ok(Score::Info);
        };

        let mismatched: Vec<(String, String)> = tables
            .iter()
            .filter(|t| !t.collation.starts_with(EXPECTED_COLLATION_PREFIX))
            .map(|t| (t.name.clone(), t.collation.clone()))
            .collect();

        let score = if mismatched.is_empty() {
            Score::Pass
        } else {
            Score::Warn
        };
        cx.set(&COLLATION_TABLES, mismatched);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("Every table is using UTF-8.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let tables = registry.get(&COLLATION_TABLES)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The following tables are not using {}:{}{}",
            EXPECTED_COLLATION_PREFIX,
            markup.linebreak(),
            markup.key_value_list("Table Name", "Collation", tables)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("The table list is unavailable.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text(
                "Convert the listed tables to utf8mb4 to store the full range of Unicode characters.",
            )
        })
    }
}

/// Tables not using the expected storage engine.
pub struct DatabaseEngine;

impl DatabaseEngine {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "database_engine",
        name: "DatabaseEngine",
        key: "SiteAuditCheckDatabaseEngine",
        report: ReportId::Database,
        label: "Storage Engines",
        description: "Check to see if there are any tables that aren't using InnoDB.",
    };
}

impl Check for DatabaseEngine {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(tables) = cx.require(&DATABASE_TABLES, "database_size")? else {
            return Ok(Score::Info);
        };

        let mismatched: Vec<(String, String)> = tables
            .iter()
            .filter(|t| !t.engine.eq_ignore_ascii_case(EXPECTED_ENGINE))
            .map(|t| (t.name.clone(), t.engine.clone()))
            .collect();

        let score = if mismatched.is_empty() {
            Score::Pass
        } else {
            Score::Fail
        };
        cx.set(&ENGINE_TABLES, mismatched);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("No tables are using MyISAM or another non-InnoDB engine.".to_string())
    }

    fn result_fail(&self, registry: &Registry) -> Option<String> {
        let tables = registry.get(&ENGINE_TABLES)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The following tables are not using {}:{}{}",
            EXPECTED_ENGINE,
            markup.linebreak(),
            markup.key_value_list("Table Name", "Engine", tables)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("The table list is unavailable.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| Action::Steps {
            intro: "Convert the listed tables to InnoDB:".to_string(),
            steps: vec![
                "Take a backup of the database.".to_string(),
                "Run ALTER TABLE <name> ENGINE = InnoDB; for each listed table.".to_string(),
            ],
        })
    }
}

/// Tables with a large share of allocated but unused space.
pub struct DatabaseFragmentation;

impl DatabaseFragmentation {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "database_fragmentation",
        name: "DatabaseFragmentation",
        key: "SiteAuditCheckDatabaseFragmentation",
        report: ReportId::Database,
        label: "Database Fragmentation",
        description: "Detect table fragmentation which increases storage space and decreases I/O efficiency.",
    };
}

impl Check for DatabaseFragmentation {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(tables) = cx.require(&DATABASE_TABLES, "database_size")? else {
            return Ok(Score::Info);
        };

        let mut fragmented: Vec<(String, u128)> = tables
            .iter()
            .filter(|t| t.size_bytes > 0)
            .map(|t| {
                let percent = u128::from(t.free_bytes) * 100 / u128::from(t.size_bytes);
                (t.name.clone(), percent)
            })
            .filter(|(_, percent)| *percent > FRAGMENTATION_PERCENT_LIMIT)
            .collect();
        fragmented.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let score = if fragmented.is_empty() {
            Score::Pass
        } else {
            Score::Warn
        };
        let rows = fragmented
            .into_iter()
            .map(|(name, percent)| (name, format!("{}%", percent)))
            .collect();
        cx.set(&FRAGMENTED_TABLES, rows);
        Ok(score)
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("There is no table fragmentation.".to_string())
    }

    fn result_warn(&self, registry: &Registry) -> Option<String> {
        let tables = registry.get(&FRAGMENTED_TABLES)?;
        let markup = Markup::new(registry.options().html);
        Some(format!(
            "The following tables have more than {}% fragmentation:{}{}",
            FRAGMENTATION_PERCENT_LIMIT,
            markup.linebreak(),
            markup.key_value_list("Table Name", "Fragmentation", tables)
        ))
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some("The table list is unavailable.".to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Run OPTIMIZE TABLE on the fragmented tables during low traffic to reclaim the unused space.")
        })
    }
}
