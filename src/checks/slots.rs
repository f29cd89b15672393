//! Registry slots shared between checks.
//!
//! Each slot is populated by one producing check; consumers read it through
//! [`crate::runner::ScoringContext::require`] naming that producer.

use crate::audit::Slot;
use crate::site::{
    CacheBackends, DatabaseTable, Extension, NumberOne, UserSummary, View, WatchdogSummary,
};

/// Cache bins and backends. Produced by `cache_bins_all`.
pub const CACHE_BACKENDS: Slot<CacheBackends> = Slot::new("cache_backends");

/// Every extension in the codebase. Produced by `extensions_count`.
pub const EXTENSIONS: Slot<Vec<Extension>> = Slot::new("extensions");

/// Number of enabled extensions. Produced by `extensions_count`.
pub const EXTENSION_COUNT: Slot<usize> = Slot::new("extension_count");

/// Database tables. Produced by `database_size`.
pub const DATABASE_TABLES: Slot<Vec<DatabaseTable>> = Slot::new("database_tables");

/// Enabled views. Produced by `views_count`.
pub const VIEWS: Slot<Vec<View>> = Slot::new("views");

/// Account statistics. Produced by `users_count_all`.
pub const USERS: Slot<UserSummary> = Slot::new("users");

/// The uid 1 account. Produced by `users_who_is_number_one`.
pub const USER_NUMBER_ONE: Slot<NumberOne> = Slot::new("user_number_one");

/// Database log statistics. Produced by `watchdog_count`.
pub const WATCHDOG: Slot<WatchdogSummary> = Slot::new("watchdog");
