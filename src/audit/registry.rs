//! Run-scoped shared context.
//!
//! The [`Registry`] carries the options an audit was started with and the
//! intermediate data checks compute for each other. Data lives in typed
//! slots: every slot is declared once as a [`Slot<T>`] constant, so readers
//! and writers agree on the value type at compile time.
//!
//! ```
//! use site_audit::audit::{AuditOptions, Registry, Slot};
//!
//! const MODULE_COUNT: Slot<usize> = Slot::new("module_count");
//!
//! let mut registry = Registry::new(AuditOptions::default());
//! assert!(registry.get(&MODULE_COUNT).is_none());
//!
//! registry.insert(&MODULE_COUNT, 42, "extensions_count");
//! assert_eq!(registry.get(&MODULE_COUNT), Some(&42));
//! assert_eq!(registry.owner(&MODULE_COUNT), Some("extensions_count"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};

/// Options recognized by every audit run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditOptions {
    /// Hosting vendor; selects vendor-specific check behavior.
    pub vendor: String,
    /// Render itemized breakdowns in results.
    pub detail: bool,
    /// Render results and actions as HTML instead of plain text.
    pub html: bool,
}

impl AuditOptions {
    /// Whether the run targets the given vendor.
    pub fn is_vendor(&self, vendor: &str) -> bool {
        self.vendor.eq_ignore_ascii_case(vendor)
    }
}

/// A typed name for a registry slot.
#[derive(Debug)]
pub struct Slot<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slot<T> {
    /// Declare a slot.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The slot name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

struct Entry {
    owner: String,
    value: Box<dyn Any + Send + Sync>,
}

/// Shared mutable context for one audit run.
pub struct Registry {
    options: AuditOptions,
    started_at: DateTime<Utc>,
    slots: HashMap<&'static str, Entry>,
}

impl Registry {
    /// Create a registry seeded with options, stamped with the current time.
    pub fn new(options: AuditOptions) -> Self {
        Self::with_start_time(options, Utc::now())
    }

    /// Create a registry with an explicit run start time.
    pub fn with_start_time(options: AuditOptions, started_at: DateTime<Utc>) -> Self {
        Self {
            options,
            started_at,
            slots: HashMap::new(),
        }
    }

    /// Options this run was started with.
    pub fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// When this run started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Look up a slot.
    pub fn get<T: Any>(&self, slot: &Slot<T>) -> Option<&T> {
        self.slots
            .get(slot.name)
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// Whether a slot has been populated.
    pub fn contains<T: Any>(&self, slot: &Slot<T>) -> bool {
        self.get(slot).is_some()
    }

    /// The check that first populated a slot.
    pub fn owner<T>(&self, slot: &Slot<T>) -> Option<&str> {
        self.slots.get(slot.name).map(|entry| entry.owner.as_str())
    }

    /// Populate a slot on behalf of `writer`.
    ///
    /// The first writer owns the slot. A later write from another check
    /// replaces the value but keeps the original owner.
    pub fn insert<T: Any + Send + Sync>(&mut self, slot: &Slot<T>, value: T, writer: &str) {
        match self.slots.get_mut(slot.name) {
            Some(entry) => {
                if entry.owner != writer {
                    tracing::warn!(
                        slot = slot.name,
                        owner = %entry.owner,
                        writer,
                        "registry slot overwritten by a check that does not own it"
                    );
                }
                entry.value = Box::new(value);
            }
            None => {
                self.slots.insert(
                    slot.name,
                    Entry {
                        owner: writer.to_string(),
                        value: Box::new(value),
                    },
                );
            }
        }
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been populated yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.slots.keys().collect();
        names.sort();
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("started_at", &self.started_at)
            .field("slots", &names)
            .finish()
    }
}
