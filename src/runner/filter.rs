//! Choosing which checks take part in a request.

use std::str::FromStr;

use super::engine::Engine;
use crate::report::ReportId;

/// Checks the caller asked to leave out, by id or short name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    entries: Vec<String>,
}

impl SkipList {
    /// An empty skip list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `DatabaseSize,views_count`.
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    /// Entries of the list.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add entries from another list.
    pub fn extend(&mut self, other: &SkipList) {
        for entry in &other.entries {
            if !self.entries.contains(entry) {
                self.entries.push(entry.clone());
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkipList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }
}

impl FromStr for SkipList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// An ordered subset of an engine's checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    /// Number of selected checks.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl Engine {
    /// Every bound check, in catalog order.
    pub fn all(&self) -> Selection {
        Selection {
            indices: self.indices().collect(),
        }
    }

    /// Drop the checks named by the skip list.
    ///
    /// Skipped checks are only left out of reports; they can still be
    /// invoked as dependencies of other checks.
    pub fn filter_skipped(&self, selection: &Selection, skip: &SkipList) -> Selection {
        if skip.is_empty() {
            return selection.clone();
        }

        let indices = selection
            .iter()
            .filter(|&idx| {
                let descriptor = self.descriptor(idx);
                let skipped = skip.entries().iter().any(|e| descriptor.matches(e));
                if skipped {
                    tracing::debug!(check = descriptor.id, "skipping check");
                }
                !skipped
            })
            .collect();
        Selection { indices }
    }

    /// Keep the checks belonging to a report, preserving order.
    pub fn select_for_report(&self, report: ReportId, selection: &Selection) -> Selection {
        let indices = selection
            .iter()
            .filter(|&idx| self.descriptor(idx).report == report)
            .collect();
        Selection { indices }
    }

    /// Ids of the selected checks.
    pub fn ids(&self, selection: &Selection) -> Vec<&'static str> {
        selection
            .iter()
            .map(|idx| self.descriptor(idx).id)
            .collect()
    }
}
