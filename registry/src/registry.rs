//! The constraint registry.

use std::collections::HashMap;
use std::sync::Arc;

use autotag_compiler::compile;
use autotag_core::{TagId, TagRef};
use tracing::{debug, warn};

use crate::{Constraint, SourceChange, TagState};

/// Registered constraints, keyed by tag.
///
/// The registry is plain data. Callers share it behind a lock: source
/// edits update it from the reporting thread while the reconciliation
/// worker takes snapshots of the active constraints.
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    constraints: HashMap<TagId, Arc<Constraint>>,
    next_generation: u64,
    /// The download population has been reported.
    initialised: bool,
    /// The first pass of the start-up batch has run.
    initial_assignment_complete: bool,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new constraint source for `tag`.
    ///
    /// An empty or blank source drops the constraint without touching
    /// membership. A source equal to the registered one is ignored. Any
    /// other source is compiled and installed, whether or not compilation
    /// succeeds.
    pub fn set_source(&mut self, tag: &TagRef, source: Option<&str>) -> SourceChange {
        let source = source.map(str::trim).unwrap_or_default();

        if source.is_empty() {
            return match self.constraints.remove(&tag.id) {
                Some(_) => {
                    debug!(tag = %tag.name, "Constraint removed");
                    SourceChange::Removed
                }
                None => SourceChange::Ignored,
            };
        }

        if let Some(existing) = self.constraints.get(&tag.id) {
            if existing.source == source {
                return SourceChange::Unchanged;
            }
        }

        let compiled = compile(source);
        if let Err(e) = &compiled {
            warn!(tag = %tag.name, source, error = %e, "Constraint compilation failed");
        }
        let is_ok = compiled.is_ok();

        self.next_generation += 1;
        let constraint = Constraint {
            tag: tag.clone(),
            source: source.to_string(),
            compiled,
            generation: self.next_generation,
        };
        self.constraints.insert(tag.id, Arc::new(constraint));

        SourceChange::Replaced { compiled: is_ok }
    }

    /// Forget a tag. Returns true if it had a constraint.
    pub fn remove(&mut self, tag: TagId) -> bool {
        self.constraints.remove(&tag).is_some()
    }

    pub fn get(&self, tag: TagId) -> Option<Arc<Constraint>> {
        self.constraints.get(&tag).cloned()
    }

    /// True if `tag` has since been given a constraint newer than `generation`.
    pub fn is_superseded(&self, tag: TagId, generation: u64) -> bool {
        self.constraints.get(&tag).is_some_and(|c| c.generation > generation)
    }

    pub fn state(&self, tag: TagId) -> TagState {
        self.constraints
            .get(&tag)
            .map(|c| c.state())
            .unwrap_or(TagState::Unconstrained)
    }

    /// Snapshot of all constraints that compiled, ordered by tag id.
    pub fn active(&self) -> Vec<Arc<Constraint>> {
        let mut active: Vec<_> = self
            .constraints
            .values()
            .filter(|c| c.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|c| c.tag.id);
        active
    }

    /// Number of constrained tags, including those that failed to compile.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn mark_initialised(&mut self) {
        self.initialised = true;
    }

    pub fn initial_assignment_complete(&self) -> bool {
        self.initial_assignment_complete
    }

    pub fn mark_initial_assignment_complete(&mut self) {
        self.initial_assignment_complete = true;
    }
}
