//! Membership index.

use autotag_core::{EntityId, TagId};
use std::collections::{HashMap, HashSet};

/// Two-way membership index.
///
/// Tag -> members is a set. Download -> tags keeps insertion order, which
/// is the order `tags_of` reports.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    members: HashMap<TagId, HashSet<EntityId>>,
    tags: HashMap<EntityId, Vec<TagId>>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the download was already a member.
    pub fn insert(&mut self, tag: TagId, entity: EntityId) -> bool {
        if !self.members.entry(tag).or_default().insert(entity) {
            return false;
        }
        self.tags.entry(entity).or_default().push(tag);
        true
    }

    /// Returns false if the download was not a member.
    pub fn remove(&mut self, tag: TagId, entity: EntityId) -> bool {
        let Some(set) = self.members.get_mut(&tag) else {
            return false;
        };
        if !set.remove(&entity) {
            return false;
        }
        if set.is_empty() {
            self.members.remove(&tag);
        }

        if let Some(list) = self.tags.get_mut(&entity) {
            list.retain(|t| *t != tag);
            if list.is_empty() {
                self.tags.remove(&entity);
            }
        }
        true
    }

    pub fn contains(&self, tag: TagId, entity: EntityId) -> bool {
        self.members
            .get(&tag)
            .is_some_and(|set| set.contains(&entity))
    }

    pub fn members(&self, tag: TagId) -> HashSet<EntityId> {
        self.members.get(&tag).cloned().unwrap_or_default()
    }

    pub fn tags_of(&self, entity: EntityId) -> &[TagId] {
        self.tags.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every membership of a tag. Returns the former members.
    pub fn remove_tag(&mut self, tag: TagId) -> HashSet<EntityId> {
        let members = self.members.remove(&tag).unwrap_or_default();
        for entity in &members {
            if let Some(list) = self.tags.get_mut(entity) {
                list.retain(|t| *t != tag);
                if list.is_empty() {
                    self.tags.remove(entity);
                }
            }
        }
        members
    }

    /// Drop every membership of a download. Returns its former tags.
    pub fn remove_entity(&mut self, entity: EntityId) -> Vec<TagId> {
        let tags = self.tags.remove(&entity).unwrap_or_default();
        for tag in &tags {
            if let Some(set) = self.members.get_mut(tag) {
                set.remove(&entity);
                if set.is_empty() {
                    self.members.remove(tag);
                }
            }
        }
        tags
    }
}
