//! Downloads held by the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};

use autotag_core::{Download, EntityId, Network, ShareRatio};
use parking_lot::RwLock;

/// The mutable attribute surface of a `MemoryDownload`.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadAttrs {
    pub name: String,
    pub persistent: bool,
    pub share_ratio: ShareRatio,
    /// Per-mille, 0..=1000.
    pub percent_complete: u32,
    pub added_time_millis: Option<i64>,
    pub seconds_downloading: u64,
    pub seconds_seeding: u64,
    pub merged_data_bytes: u64,
    pub private: bool,
    pub force_start: bool,
    pub complete: bool,
    pub can_archive: bool,
    pub networks: Vec<Network>,
}

impl DownloadAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for DownloadAttrs {
    fn default() -> Self {
        Self {
            name: String::new(),
            persistent: true,
            share_ratio: ShareRatio::PerMille(0),
            percent_complete: 0,
            added_time_millis: None,
            seconds_downloading: 0,
            seconds_seeding: 0,
            merged_data_bytes: 0,
            private: false,
            force_start: false,
            complete: false,
            can_archive: false,
            networks: vec![Network::Public],
        }
    }
}

/// A download whose attributes can change while constraints read them.
#[derive(Debug)]
pub struct MemoryDownload {
    id: EntityId,
    attrs: RwLock<DownloadAttrs>,
    destroyed: AtomicBool,
}

impl MemoryDownload {
    pub fn new(id: EntityId, attrs: DownloadAttrs) -> Self {
        Self {
            id,
            attrs: RwLock::new(attrs),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Mutate attributes in place.
    pub fn update(&self, f: impl FnOnce(&mut DownloadAttrs)) {
        f(&mut self.attrs.write());
    }

    pub fn attrs(&self) -> DownloadAttrs {
        self.attrs.read().clone()
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

impl Download for MemoryDownload {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> String {
        self.attrs.read().name.clone()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn is_persistent(&self) -> bool {
        self.attrs.read().persistent
    }

    fn share_ratio(&self) -> ShareRatio {
        self.attrs.read().share_ratio
    }

    fn percent_complete(&self) -> u32 {
        self.attrs.read().percent_complete
    }

    fn added_time_millis(&self) -> Option<i64> {
        self.attrs.read().added_time_millis
    }

    fn seconds_downloading(&self) -> u64 {
        self.attrs.read().seconds_downloading
    }

    fn seconds_seeding(&self) -> u64 {
        self.attrs.read().seconds_seeding
    }

    fn merged_data_bytes(&self) -> u64 {
        self.attrs.read().merged_data_bytes
    }

    fn is_private(&self) -> bool {
        self.attrs.read().private
    }

    fn is_force_start(&self) -> bool {
        self.attrs.read().force_start
    }

    fn is_download_complete(&self) -> bool {
        self.attrs.read().complete
    }

    fn can_archive(&self) -> bool {
        self.attrs.read().can_archive
    }

    fn networks(&self) -> Vec<Network> {
        self.attrs.read().networks.clone()
    }
}
