//! Work items and the worker that runs them.

use std::sync::Arc;

use autotag_core::{Download, EntitySource, TagRef};
use autotag_reconcile::Reconciler;
use autotag_registry::{Constraint, ConstraintRegistry};
use autotag_scheduler::Worker;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Immutable descriptors queued by producers.
pub(crate) enum WorkItem {
    /// Re-evaluate every constraint for one download.
    Apply(Arc<dyn Download>),
    /// The two-pass start-up batch.
    InitialBatch(Vec<Arc<dyn Download>>),
    /// Empty a tag whose constraint source changed to the one installed
    /// with `generation`.
    ResetMembers { tag: TagRef, generation: u64 },
    /// Re-evaluate everything, with a fresh debounce history.
    Sweep,
}

/// Owns the reconciler. Runs on the scheduler thread.
pub(crate) struct ConstraintWorker {
    registry: Arc<Mutex<ConstraintRegistry>>,
    entities: Arc<dyn EntitySource>,
    reconciler: Reconciler,
}

impl ConstraintWorker {
    pub(crate) fn new(
        registry: Arc<Mutex<ConstraintRegistry>>,
        entities: Arc<dyn EntitySource>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            registry,
            entities,
            reconciler,
        }
    }

    fn active(&self) -> Vec<Arc<Constraint>> {
        self.registry.lock().active()
    }

    fn initial_batch(&mut self, downloads: Vec<Arc<dyn Download>>) {
        let first = self.reconciler.apply_batch(&self.active(), &downloads);
        self.registry.lock().mark_initial_assignment_complete();

        // Settle constraints that read tags assigned in the first pass.
        let second = self.reconciler.apply_batch(&self.active(), &downloads);

        debug!(
            downloads = downloads.len(),
            first_pass_changes = first.changes(),
            second_pass_changes = second.changes(),
            "Initial assignment complete"
        );
    }

    fn sweep(&mut self) {
        if !self.registry.lock().is_initialised() {
            return;
        }
        let active = self.active();
        if active.is_empty() {
            return;
        }
        let downloads = self.entities.downloads();
        self.reconciler.sweep(&active, &downloads);
    }
}

impl Worker for ConstraintWorker {
    type Item = WorkItem;

    fn handle(&mut self, item: WorkItem) {
        match item {
            WorkItem::Apply(download) => {
                let active = self.active();
                self.reconciler.apply(&active, download.as_ref());
            }
            WorkItem::InitialBatch(downloads) => self.initial_batch(downloads),
            WorkItem::ResetMembers { tag, generation } => {
                // A later edit queued its own reset behind this one.
                if self.registry.lock().is_superseded(tag.id, generation) {
                    trace!(tag = %tag.name, generation, "Skipping stale reset");
                    return;
                }
                self.reconciler.clear_members(&tag);
            }
            WorkItem::Sweep => self.sweep(),
        }
    }

    fn tick(&mut self) {
        self.sweep();
    }

    fn timer_cancelled(&mut self) {
        self.reconciler.clear_history();
    }
}
