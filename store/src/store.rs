//! In-memory tag system and download population.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Weak};

use autotag_core::{Download, EntityId, EntitySource, Tag, TagId, TagRef, TagSystem};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::index::MembershipIndex;
use crate::{DownloadAttrs, MemoryDownload, MemoryTag, StoreError, StoreResult};

/// Receives membership changes made through `TagSystem`.
///
/// Called after the store has released its locks, so observers may call
/// back into the store.
pub trait MembershipObserver: Send + Sync {
    fn membership_changed(&self, tag: TagId, download: Arc<dyn Download>);
}

/// ID allocator for tags and downloads.
#[derive(Debug)]
struct IdAllocator {
    next_tag_id: u64,
    next_download_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            next_tag_id: 1,
            next_download_id: 1,
        }
    }

    fn alloc_tag_id(&mut self) -> TagId {
        let id = TagId::new(self.next_tag_id);
        self.next_tag_id += 1;
        id
    }

    fn alloc_download_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_download_id);
        self.next_download_id += 1;
        id
    }
}

#[derive(Debug)]
struct Inner {
    tags: BTreeMap<TagId, Arc<MemoryTag>>,
    downloads: BTreeMap<EntityId, Arc<MemoryDownload>>,
    index: MembershipIndex,
    id_alloc: IdAllocator,
}

/// Thread-safe in-memory store.
pub struct MemoryTagStore {
    inner: RwLock<Inner>,
    observer: RwLock<Option<Weak<dyn MembershipObserver>>>,
}

impl Default for MemoryTagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tags: BTreeMap::new(),
                downloads: BTreeMap::new(),
                index: MembershipIndex::new(),
                id_alloc: IdAllocator::new(),
            }),
            observer: RwLock::new(None),
        }
    }

    /// Notify `observer` of membership changes from now on.
    pub fn set_observer(&self, observer: Weak<dyn MembershipObserver>) {
        *self.observer.write() = Some(observer);
    }

    // ==================== Tags ====================

    /// Create a tag without the constraint capability.
    pub fn create_tag(&self, name: impl Into<String>) -> Arc<MemoryTag> {
        self.insert_tag(name.into(), false)
    }

    /// Create a tag that accepts a constraint source.
    pub fn create_constrainable_tag(&self, name: impl Into<String>) -> Arc<MemoryTag> {
        self.insert_tag(name.into(), true)
    }

    fn insert_tag(&self, name: String, constrainable: bool) -> Arc<MemoryTag> {
        let mut inner = self.inner.write();
        let id = inner.id_alloc.alloc_tag_id();
        let tag = Arc::new(MemoryTag::new(id, name, constrainable));
        inner.tags.insert(id, Arc::clone(&tag));
        tag
    }

    pub fn tag(&self, id: TagId) -> Option<Arc<MemoryTag>> {
        self.inner.read().tags.get(&id).cloned()
    }

    /// First tag with this exact name.
    pub fn find_tag(&self, name: &str) -> Option<Arc<MemoryTag>> {
        self.inner
            .read()
            .tags
            .values()
            .find(|t| t.name() == name)
            .cloned()
    }

    /// Store a constraint source on a tag.
    ///
    /// The store only persists the property; whoever edits it tells the
    /// constraint handler.
    pub fn set_constraint(&self, id: TagId, source: Option<&str>) -> StoreResult<Arc<MemoryTag>> {
        let tag = self.tag(id).ok_or(StoreError::TagNotFound(id))?;
        if !tag.set_source(source) {
            return Err(StoreError::NotConstrainable(tag.name()));
        }
        Ok(tag)
    }

    /// Delete a tag and all of its memberships.
    pub fn remove_tag(&self, id: TagId) -> StoreResult<Arc<MemoryTag>> {
        let mut inner = self.inner.write();
        let tag = inner.tags.remove(&id).ok_or(StoreError::TagNotFound(id))?;
        let former = inner.index.remove_tag(id);
        debug!(tag = %tag.name(), members = former.len(), "Tag removed");
        Ok(tag)
    }

    // ==================== Downloads ====================

    pub fn create_download(&self, attrs: DownloadAttrs) -> Arc<MemoryDownload> {
        let mut inner = self.inner.write();
        let id = inner.id_alloc.alloc_download_id();
        let download = Arc::new(MemoryDownload::new(id, attrs));
        inner.downloads.insert(id, Arc::clone(&download));
        download
    }

    pub fn download(&self, id: EntityId) -> Option<Arc<MemoryDownload>> {
        self.inner.read().downloads.get(&id).cloned()
    }

    /// Mark a download destroyed and drop it from the population.
    pub fn destroy_download(&self, id: EntityId) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let download = inner
            .downloads
            .remove(&id)
            .ok_or(StoreError::DownloadNotFound(id))?;
        download.mark_destroyed();
        inner.index.remove_entity(id);
        Ok(())
    }

    pub fn is_member(&self, tag: TagId, entity: EntityId) -> bool {
        self.inner.read().index.contains(tag, entity)
    }

    // ==================== Notifications ====================

    fn notify(&self, tag: TagId, entity: EntityId) {
        let Some(observer) = self.observer.read().as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let Some(download) = self.download(entity) else {
            return;
        };
        observer.membership_changed(tag, download);
    }
}

impl TagSystem for MemoryTagStore {
    fn members(&self, tag: TagId) -> HashSet<EntityId> {
        self.inner.read().index.members(tag)
    }

    fn add(&self, tag: TagId, entity: EntityId) {
        let changed = {
            let mut inner = self.inner.write();
            if !inner.tags.contains_key(&tag) || !inner.downloads.contains_key(&entity) {
                trace!(%tag, %entity, "Ignoring add for unknown tag or download");
                return;
            }
            inner.index.insert(tag, entity)
        };
        if changed {
            self.notify(tag, entity);
        }
    }

    fn remove(&self, tag: TagId, entity: EntityId) {
        let changed = self.inner.write().index.remove(tag, entity);
        if changed {
            self.notify(tag, entity);
        }
    }

    fn tags_of(&self, entity: EntityId) -> Vec<TagRef> {
        let inner = self.inner.read();
        inner
            .index
            .tags_of(entity)
            .iter()
            .filter_map(|id| inner.tags.get(id).map(|t| t.to_ref()))
            .collect()
    }
}

impl EntitySource for MemoryTagStore {
    fn downloads(&self) -> Vec<Arc<dyn Download>> {
        self.inner
            .read()
            .downloads
            .values()
            .map(|d| Arc::clone(d) as Arc<dyn Download>)
            .collect()
    }
}
