//! Check resolution.
//!
//! The [`Engine`] binds a catalog of checks to one [`Registry`] and one
//! [`SiteState`] provider, and scores checks on demand. Scoring is memoized
//! per check: however a check is reached (directly, or as the dependency of
//! another check), its `calculate_score` runs at most once per engine.
//!
//! Dependencies are resolved depth-first through [`ScoringContext::invoke`].
//! The engine keeps the stack of checks currently being scored; reaching a
//! check that is already on the stack is a [`AuditError::DependencyCycle`].
//! Once a cycle has been seen the engine refuses to score anything else,
//! even if the check that observed the cycle discarded the error.
//!
//! A check whose scoring fails with anything other than unavailable site
//! state is marked failed. Later requests for it return the same error
//! without running it again.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::audit::{AuditOptions, Check, CheckDescriptor, Registry, Score, Slot};
use crate::error::{AuditError, Result};
use crate::report::CheckResult;
use crate::site::SiteState;

#[derive(Debug)]
enum CheckState {
    Unscored,
    Scored(Scored),
    Failed(AuditError),
}

#[derive(Debug)]
struct Scored {
    score: Score,
    /// Set when the site could not answer the check's queries.
    unavailable: Option<String>,
    rendered: Option<CheckResult>,
}

/// Scores the checks of one audit run.
pub struct Engine {
    checks: Vec<Arc<dyn Check>>,
    index: HashMap<&'static str, usize>,
    states: Vec<CheckState>,
    resolving: Vec<usize>,
    cycle: Option<String>,
    registry: Registry,
    site: Arc<dyn SiteState>,
}

impl Engine {
    /// Bind every catalog entry to the registry and site provider.
    ///
    /// Catalog order is the default evaluation order.
    pub fn instantiate_all(
        catalog: Vec<Arc<dyn Check>>,
        registry: Registry,
        site: Arc<dyn SiteState>,
    ) -> Self {
        let mut index = HashMap::with_capacity(catalog.len());
        for (i, check) in catalog.iter().enumerate() {
            if index.insert(check.id(), i).is_some() {
                tracing::warn!(check = check.id(), "duplicate check id in catalog");
            }
        }

        let states = catalog.iter().map(|_| CheckState::Unscored).collect();

        Self {
            checks: catalog,
            index,
            states,
            resolving: Vec::new(),
            cycle: None,
            registry,
            site,
        }
    }

    /// The run's registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of bound checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are bound.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Whether a check id is bound.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether a check has been scored.
    pub fn is_scored(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| matches!(self.states[idx], CheckState::Scored(_)))
    }

    /// Score a check by id, computing it on first access.
    pub fn score(&mut self, id: &str) -> Result<Score> {
        let idx = self.index_of(id)?;
        self.resolve(idx)
    }

    /// Rendered result of a check by id.
    pub fn result(&mut self, id: &str) -> Result<CheckResult> {
        let idx = self.index_of(id)?;
        self.render(idx)
    }

    pub(crate) fn descriptor(&self, idx: usize) -> &CheckDescriptor {
        self.checks[idx].descriptor()
    }

    pub(crate) fn indices(&self) -> std::ops::Range<usize> {
        0..self.checks.len()
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AuditError::UnknownCheck { id: id.to_string() })
    }

    pub(crate) fn resolve(&mut self, idx: usize) -> Result<Score> {
        if let Some(cycle) = &self.cycle {
            return Err(AuditError::DependencyCycle {
                cycle: cycle.clone(),
            });
        }

        match &self.states[idx] {
            CheckState::Scored(scored) => return Ok(scored.score),
            CheckState::Failed(err) => return Err(err.replicate()),
            CheckState::Unscored => {}
        }

        if let Some(pos) = self.resolving.iter().position(|&i| i == idx) {
            let mut path: Vec<&str> = self.resolving[pos..]
                .iter()
                .map(|&i| self.checks[i].id())
                .collect();
            path.push(self.checks[idx].id());
            let cycle = path.join(" -> ");
            self.cycle = Some(cycle.clone());
            return Err(AuditError::DependencyCycle { cycle });
        }

        let check = Arc::clone(&self.checks[idx]);
        let id = check.id();
        tracing::debug!(check = id, depth = self.resolving.len(), "calculating score");

        self.resolving.push(idx);
        let outcome = check.calculate_score(&mut ScoringContext {
            engine: self,
            check_id: id,
        });
        self.resolving.pop();

        if let Some(cycle) = &self.cycle {
            return Err(AuditError::DependencyCycle {
                cycle: cycle.clone(),
            });
        }

        let (score, unavailable) = match outcome {
            Ok(score) => (score, None),
            Err(AuditError::StateUnavailable { what, message }) => {
                tracing::warn!(check = id, what = %what, "site state unavailable: {}", message);
                let text = format!("Unable to audit: {} is unavailable ({}).", what, message);
                (Score::Info, Some(text))
            }
            Err(e) => {
                tracing::debug!(check = id, error = %e, "scoring failed");
                let replay = e.replicate();
                self.states[idx] = CheckState::Failed(e);
                return Err(replay);
            }
        };

        tracing::debug!(check = id, score = %score, "scored");
        self.states[idx] = CheckState::Scored(Scored {
            score,
            unavailable,
            rendered: None,
        });
        Ok(score)
    }

    pub(crate) fn render(&mut self, idx: usize) -> Result<CheckResult> {
        let score = self.resolve(idx)?;

        let unavailable = match &self.states[idx] {
            CheckState::Scored(Scored {
                rendered: Some(rendered),
                ..
            }) => return Ok(rendered.clone()),
            CheckState::Scored(scored) => scored.unavailable.clone(),
            CheckState::Unscored | CheckState::Failed(_) => None,
        };

        let check = &self.checks[idx];
        let descriptor = check.descriptor();
        let (result, action) = match unavailable {
            Some(text) => (text, String::new()),
            None => (
                check.result(score, &self.registry),
                check.render_action(score, &self.registry),
            ),
        };

        let rendered = CheckResult {
            label: descriptor.label.to_string(),
            description: descriptor.description.to_string(),
            result,
            action,
            score,
        };

        if let CheckState::Scored(scored) = &mut self.states[idx] {
            scored.rendered = Some(rendered.clone());
        }
        Ok(rendered)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<_> = self.checks.iter().map(|c| c.id()).collect();
        f.debug_struct("Engine")
            .field("checks", &ids)
            .field("states", &self.states)
            .field("registry", &self.registry)
            .finish()
    }
}

/// What a check sees while its score is being calculated.
pub struct ScoringContext<'a> {
    engine: &'a mut Engine,
    check_id: &'static str,
}

impl ScoringContext<'_> {
    /// Options of the run.
    pub fn options(&self) -> &AuditOptions {
        self.engine.registry.options()
    }

    /// When the run started.
    pub fn now(&self) -> DateTime<Utc> {
        self.engine.registry.started_at()
    }

    /// The run's registry.
    pub fn registry(&self) -> &Registry {
        &self.engine.registry
    }

    /// The site state provider.
    pub fn site(&self) -> Arc<dyn SiteState> {
        Arc::clone(&self.engine.site)
    }

    /// Read a slot.
    pub fn get<T: Any>(&self, slot: &Slot<T>) -> Option<&T> {
        self.engine.registry.get(slot)
    }

    /// Populate a slot, owned by the check being scored.
    pub fn set<T: Any + Send + Sync>(&mut self, slot: &Slot<T>, value: T) {
        self.engine.registry.insert(slot, value, self.check_id);
    }

    /// Score another check now, or return its memoized score.
    pub fn invoke(&mut self, id: &str) -> Result<Score> {
        tracing::debug!(check = self.check_id, dependency = id, "invoking dependency");
        let idx = self.engine.index_of(id)?;
        self.engine.resolve(idx)
    }

    /// Read a slot, invoking its producing check first when it is absent.
    ///
    /// `None` means the producer ran but did not populate the slot.
    pub fn require<T: Any>(&mut self, slot: &Slot<T>, producer: &str) -> Result<Option<&T>> {
        if !self.engine.registry.contains(slot) {
            self.invoke(producer)?;
        }
        Ok(self.engine.registry.get(slot))
    }
}
