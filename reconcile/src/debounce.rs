//! Per-(tag, download) addition cooldown.

use std::collections::HashMap;
use std::time::Duration;

use autotag_core::{EntityId, TagId};

/// Last addition time per (tag, download), on the monotonic clock.
///
/// Entries never expire individually. The whole history is cleared at the
/// start of every sweep and whenever the sweep timer is cancelled.
#[derive(Debug)]
pub struct DebounceHistory {
    cooldown: Duration,
    entries: HashMap<(TagId, EntityId), Duration>,
}

impl DebounceHistory {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            entries: HashMap::new(),
        }
    }

    /// Claim the right to add `entity` to `tag` at `now`.
    ///
    /// Fails while a previous claim for the same pair is younger than the
    /// cooldown. A successful claim restarts the window.
    pub fn try_acquire(&mut self, tag: TagId, entity: EntityId, now: Duration) -> bool {
        if let Some(last) = self.entries.get(&(tag, entity)) {
            if now.saturating_sub(*last) < self.cooldown {
                return false;
            }
        }
        self.entries.insert((tag, entity), now);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
