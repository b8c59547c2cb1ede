//! Reconciliation engine.

use std::ops::AddAssign;
use std::sync::Arc;
use std::time::Duration;

use autotag_core::{Clock, Download, ScriptHost, TagRef, TagSystem};
use autotag_eval::Evaluator;
use autotag_registry::Constraint;
use tracing::debug;

use crate::DebounceHistory;

/// Statistics from a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// (constraint, download) pairs evaluated.
    pub evaluated: usize,
    /// Memberships added.
    pub added: usize,
    /// Memberships removed.
    pub removed: usize,
    /// Additions held back by the cooldown.
    pub suppressed: usize,
}

impl ReconcileStats {
    /// Number of membership transitions.
    pub fn changes(&self) -> usize {
        self.added + self.removed
    }
}

impl AddAssign for ReconcileStats {
    fn add_assign(&mut self, other: Self) {
        self.evaluated += other.evaluated;
        self.added += other.added;
        self.removed += other.removed;
        self.suppressed += other.suppressed;
    }
}

/// Applies constraints and mutates membership through the tag system.
///
/// A reconciler is owned by the single worker that serialises all
/// membership changes, so it holds its debounce history without a lock.
pub struct Reconciler {
    tags: Arc<dyn TagSystem>,
    clock: Arc<dyn Clock>,
    scripts: Option<Arc<dyn ScriptHost>>,
    history: DebounceHistory,
}

impl Reconciler {
    pub fn new(tags: Arc<dyn TagSystem>, clock: Arc<dyn Clock>, cooldown: Duration) -> Self {
        Self {
            tags,
            clock,
            scripts: None,
            history: DebounceHistory::new(cooldown),
        }
    }

    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptHost>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Apply every constraint to one download.
    pub fn apply(&mut self, constraints: &[Arc<Constraint>], download: &dyn Download) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        if !is_eligible(download) {
            return stats;
        }

        let mut pass = self.pass();
        for constraint in constraints {
            pass.apply_one(constraint, download, &mut stats);
        }
        stats
    }

    /// One pass over a batch, constraint by constraint.
    ///
    /// Each constraint sees the membership left by the constraints before
    /// it, so a `hasTag` chain may need another pass to settle.
    pub fn apply_batch(
        &mut self,
        constraints: &[Arc<Constraint>],
        downloads: &[Arc<dyn Download>],
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut pass = self.pass();

        for constraint in constraints {
            for download in downloads {
                if is_eligible(download.as_ref()) {
                    pass.apply_one(constraint, download.as_ref(), &mut stats);
                }
            }
        }
        stats
    }

    /// Clear the debounce history, then run one pass over `downloads`.
    pub fn sweep(
        &mut self,
        constraints: &[Arc<Constraint>],
        downloads: &[Arc<dyn Download>],
    ) -> ReconcileStats {
        self.history.clear();
        let stats = self.apply_batch(constraints, downloads);
        debug!(
            constraints = constraints.len(),
            downloads = downloads.len(),
            evaluated = stats.evaluated,
            added = stats.added,
            removed = stats.removed,
            suppressed = stats.suppressed,
            "Sweep complete"
        );
        stats
    }

    /// Remove every member of `tag`. Returns how many were removed.
    pub fn clear_members(&mut self, tag: &TagRef) -> usize {
        let members = self.tags.members(tag.id);
        for entity in &members {
            self.tags.remove(tag.id, *entity);
        }
        if !members.is_empty() {
            debug!(tag = %tag.name, removed = members.len(), "Cleared constrained tag");
        }
        members.len()
    }

    fn pass(&mut self) -> Pass<'_> {
        let mut evaluator = Evaluator::new(self.clock.as_ref());
        if let Some(scripts) = &self.scripts {
            evaluator = evaluator.with_scripts(scripts.as_ref());
        }
        Pass {
            evaluator,
            tags: self.tags.as_ref(),
            clock: self.clock.as_ref(),
            history: &mut self.history,
        }
    }
}

fn is_eligible(download: &dyn Download) -> bool {
    !download.is_destroyed() && download.is_persistent()
}

/// Borrowed state for one reconciliation pass.
struct Pass<'a> {
    evaluator: Evaluator<'a>,
    tags: &'a dyn TagSystem,
    clock: &'a dyn Clock,
    history: &'a mut DebounceHistory,
}

impl Pass<'_> {
    fn apply_one(&mut self, constraint: &Constraint, download: &dyn Download, stats: &mut ReconcileStats) {
        let Some(expr) = constraint.expr() else {
            return;
        };
        let tag = &constraint.tag;
        let entity = download.id();

        let applied = self.tags.tags_of(entity);
        let is_member = applied.iter().any(|t| t.id == tag.id);
        let should_be_member = self.evaluator.evaluate(expr, download, &applied, tag);
        stats.evaluated += 1;

        if should_be_member && !is_member {
            if self.history.try_acquire(tag.id, entity, self.clock.monotonic()) {
                self.tags.add(tag.id, entity);
                stats.added += 1;
                debug!(tag = %tag.name, download = %entity, "Added to constrained tag");
            } else {
                stats.suppressed += 1;
                debug!(tag = %tag.name, download = %entity, "Addition suppressed by cooldown");
            }
        } else if !should_be_member && is_member {
            self.tags.remove(tag.id, entity);
            stats.removed += 1;
            debug!(tag = %tag.name, download = %entity, "Removed from constrained tag");
        }
    }
}
