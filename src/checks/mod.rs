//! Built-in checks.
//!
//! Each report has a module of check variants. [`default_catalog`] lists
//! them all in evaluation order; the order within a report is the order of
//! the report's entries.
//!
//! Checks share data through the typed slots in [`slots`]. A consumer
//! names the producing check when it reads a slot, so the producer runs
//! first even when the consumer is evaluated earlier or the producer is
//! skipped.
//!
//! # Example
//!
//! ```
//! use site_audit::checks::default_catalog;
//!
//! let catalog = default_catalog();
//! assert!(catalog.iter().any(|check| check.id() == "cache_page_expire"));
//! ```

pub mod best_practices;
pub mod block;
pub mod cache;
pub mod cron;
pub mod database;
pub mod extensions;
pub mod format;
pub mod security;
pub mod slots;
pub mod status;
pub mod users;
pub mod views;
pub mod watchdog;

use std::sync::Arc;

use crate::audit::Check;

pub use best_practices::{
    BestPracticesFast404, BestPracticesFolderStructure, BestPracticesMultisite,
    BestPracticesServices, BestPracticesSettings, BestPracticesSites, BestPracticesSitesDefault,
    BestPracticesSitesSuperfluous,
};
pub use block::BlockEnabled;
pub use cache::{
    CacheBinsAll, CacheBinsDefault, CacheBinsUsed, CachePageExpire, CachePreprocessCss,
    CachePreprocessJs,
};
pub use cron::{CronEnabled, CronLast};
pub use database::{
    DatabaseCollation, DatabaseEngine, DatabaseFragmentation, DatabaseRowCount, DatabaseSize,
};
pub use extensions::{ExtensionsCount, ExtensionsDev, ExtensionsDuplicate, ExtensionsUnrecommended};
pub use security::SecurityMenuRouter;
pub use status::StatusSystem;
pub use users::{
    UsersBlockedNumberOne, UsersCountAll, UsersCountBlocked, UsersRolesList, UsersWhoIsNumberOne,
};
pub use views::{ViewsCacheOutput, ViewsCacheResults, ViewsCount, ViewsEnabled};
pub use watchdog::{
    Watchdog404, WatchdogAge, WatchdogCount, WatchdogEnabled, WatchdogPhp, WatchdogSyslog,
};

/// Every built-in check, in evaluation order.
pub fn default_catalog() -> Vec<Arc<dyn Check>> {
    vec![
        Arc::new(BestPracticesFast404),
        Arc::new(BestPracticesFolderStructure),
        Arc::new(BestPracticesMultisite),
        Arc::new(BestPracticesSettings),
        Arc::new(BestPracticesServices),
        Arc::new(BestPracticesSites),
        Arc::new(BestPracticesSitesDefault),
        Arc::new(BestPracticesSitesSuperfluous),
        Arc::new(BlockEnabled),
        Arc::new(CacheBinsAll),
        Arc::new(CacheBinsDefault),
        Arc::new(CacheBinsUsed),
        Arc::new(CachePageExpire),
        Arc::new(CachePreprocessCss),
        Arc::new(CachePreprocessJs),
        Arc::new(CronEnabled),
        Arc::new(CronLast),
        Arc::new(DatabaseSize),
        Arc::new(DatabaseRowCount),
        Arc::new(DatabaseCollation),
        Arc::new(DatabaseEngine),
        Arc::new(DatabaseFragmentation),
        Arc::new(ExtensionsCount),
        Arc::new(ExtensionsDev),
        Arc::new(ExtensionsDuplicate),
        Arc::new(ExtensionsUnrecommended),
        Arc::new(StatusSystem),
        Arc::new(SecurityMenuRouter),
        Arc::new(UsersCountAll),
        Arc::new(UsersCountBlocked),
        Arc::new(UsersRolesList),
        Arc::new(UsersBlockedNumberOne),
        Arc::new(UsersWhoIsNumberOne),
        Arc::new(ViewsEnabled),
        Arc::new(ViewsCount),
        Arc::new(ViewsCacheOutput),
        Arc::new(ViewsCacheResults),
        Arc::new(WatchdogEnabled),
        Arc::new(WatchdogCount),
        Arc::new(WatchdogAge),
        Arc::new(WatchdogPhp),
        Arc::new(Watchdog404),
        Arc::new(WatchdogSyslog),
    ]
}
