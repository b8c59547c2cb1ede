//! The constraint handler.

use std::sync::Arc;

use autotag_core::{Clock, Download, EntitySource, ScriptHost, SystemClock, Tag, TagId, TagRef, TagSystem};
use autotag_reconcile::Reconciler;
use autotag_registry::{ConstraintRegistry, SourceChange, TagState};
use autotag_scheduler::Scheduler;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::work::{ConstraintWorker, WorkItem};
use crate::{HandlerConfig, HandlerResult};

/// Builder for a [`ConstraintHandler`].
pub struct HandlerBuilder {
    tags: Arc<dyn TagSystem>,
    entities: Arc<dyn EntitySource>,
    config: HandlerConfig,
    clock: Option<Arc<dyn Clock>>,
    scripts: Option<Arc<dyn ScriptHost>>,
}

impl HandlerBuilder {
    pub fn new(tags: Arc<dyn TagSystem>, entities: Arc<dyn EntitySource>) -> Self {
        Self {
            tags,
            entities,
            config: HandlerConfig::default(),
            clock: None,
            scripts: None,
        }
    }

    pub fn config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Time source for debounce windows and download ages. Defaults to the
    /// system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Host for `javascript(..)` calls. Without one they evaluate to false.
    pub fn scripts(mut self, scripts: Arc<dyn ScriptHost>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    /// Validate the configuration and start the worker thread.
    pub fn build(self) -> HandlerResult<ConstraintHandler> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let mut reconciler = Reconciler::new(self.tags, clock, self.config.debounce_cooldown());
        if let Some(scripts) = self.scripts {
            reconciler = reconciler.with_scripts(scripts);
        }

        let registry = Arc::new(Mutex::new(ConstraintRegistry::new()));
        let worker = ConstraintWorker::new(Arc::clone(&registry), self.entities, reconciler);
        let scheduler = Scheduler::spawn(self.config.worker_name.clone(), worker)?;

        Ok(ConstraintHandler {
            config: self.config,
            registry,
            scheduler,
        })
    }
}

/// Receives tag-system and download notifications and keeps constrained
/// tags' membership in line with their constraints.
///
/// Notification methods return as soon as the work is queued. Registry
/// updates happen on the calling thread under the registry lock, so
/// [`state`](Self::state) reflects an edit immediately. Membership
/// follows once the worker gets to it; [`flush`](Self::flush) waits for
/// that.
pub struct ConstraintHandler {
    config: HandlerConfig,
    registry: Arc<Mutex<ConstraintRegistry>>,
    scheduler: Scheduler<WorkItem>,
}

impl ConstraintHandler {
    pub fn builder(tags: Arc<dyn TagSystem>, entities: Arc<dyn EntitySource>) -> HandlerBuilder {
        HandlerBuilder::new(tags, entities)
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    // ==================== Tag events ====================

    /// A tag appeared. Tags without the constraint capability are ignored.
    pub fn tag_added(&self, tag: &dyn Tag) -> HandlerResult<()> {
        let Some(property) = tag.constraint_property() else {
            trace!(tag = %tag.name(), "Tag has no constraint capability");
            return Ok(());
        };
        let source = property.source();
        self.constraint_changed(&tag.to_ref(), source.as_deref())?;
        Ok(())
    }

    /// A tag's constraint source was edited.
    ///
    /// The new source is compiled before this returns. A new source resets
    /// the tag's membership and triggers a full sweep.
    pub fn constraint_changed(&self, tag: &TagRef, source: Option<&str>) -> HandlerResult<TagState> {
        let mut registry = self.registry.lock();

        if let SourceChange::Replaced { compiled } = registry.set_source(tag, source) {
            debug!(tag = %tag.name, compiled, "Constraint replaced");
            let generation = registry.get(tag.id).map_or(0, |c| c.generation);
            self.scheduler.dispatch(WorkItem::ResetMembers {
                tag: tag.clone(),
                generation,
            })?;
            if registry.is_initialised() {
                self.scheduler.dispatch(WorkItem::Sweep)?;
            }
        }

        self.check_timer(&registry)?;
        Ok(registry.state(tag.id))
    }

    /// A tag was deleted.
    pub fn tag_removed(&self, tag: TagId) -> HandlerResult<()> {
        let mut registry = self.registry.lock();
        if registry.remove(tag) {
            debug!(%tag, "Constrained tag removed");
        }
        self.check_timer(&registry)
    }

    // ==================== Download events ====================

    /// The download population has been loaded. Only the first call counts.
    pub fn initialised(&self, downloads: Vec<Arc<dyn Download>>) -> HandlerResult<()> {
        let mut registry = self.registry.lock();
        if registry.is_initialised() {
            debug!("Population already initialised");
            return Ok(());
        }
        registry.mark_initialised();

        let downloads: Vec<_> = downloads.into_iter().filter(|d| is_eligible(d.as_ref())).collect();
        debug!(downloads = downloads.len(), constraints = registry.len(), "Population initialised");
        self.scheduler.dispatch(WorkItem::InitialBatch(downloads))?;
        Ok(())
    }

    /// A download was added after start-up.
    pub fn taggable_created(&self, download: Arc<dyn Download>) -> HandlerResult<()> {
        let registry = self.registry.lock();
        if !registry.is_initialised() || registry.is_empty() || !is_eligible(download.as_ref()) {
            return Ok(());
        }
        self.scheduler.dispatch(WorkItem::Apply(download))?;
        Ok(())
    }

    /// Some tag gained or lost `download`.
    ///
    /// Ignored until the first pass of the start-up batch has run, since
    /// that batch produces a burst of these.
    pub fn membership_changed(&self, tag: TagId, download: Arc<dyn Download>) -> HandlerResult<()> {
        let registry = self.registry.lock();
        if !registry.initial_assignment_complete() || registry.is_empty() || !is_eligible(download.as_ref()) {
            return Ok(());
        }
        trace!(%tag, download = %download.id(), "Membership changed");
        self.scheduler.dispatch(WorkItem::Apply(download))?;
        Ok(())
    }

    /// Queue a full sweep now, outside the timer schedule.
    pub fn request_sweep(&self) -> HandlerResult<()> {
        self.scheduler.dispatch(WorkItem::Sweep)?;
        Ok(())
    }

    // ==================== Lifecycle ====================

    /// Block until everything queued so far has been processed.
    pub fn flush(&self) -> HandlerResult<()> {
        self.scheduler.flush()?;
        Ok(())
    }

    /// Block until the queue is empty, including work queued by membership
    /// changes the worker made itself.
    pub fn settle(&self) -> HandlerResult<()> {
        self.scheduler.settle()?;
        Ok(())
    }

    /// Stop accepting notifications, finish queued work and join the worker.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    // ==================== Diagnostics ====================

    pub fn state(&self, tag: TagId) -> TagState {
        self.registry.lock().state(tag)
    }

    /// Number of tracked tags, including those whose source failed to compile.
    pub fn constrained_count(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn timer_armed(&self) -> bool {
        self.scheduler.timer_armed()
    }

    fn check_timer(&self, registry: &ConstraintRegistry) -> HandlerResult<()> {
        if registry.is_empty() {
            self.scheduler.cancel_timer()?;
        } else {
            self.scheduler.arm_timer(self.config.sweep_interval())?;
        }
        Ok(())
    }
}

impl Drop for ConstraintHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn is_eligible(download: &dyn Download) -> bool {
    !download.is_destroyed() && download.is_persistent()
}
