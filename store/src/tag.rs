//! Tags held by the in-memory store.

use autotag_core::{ConstraintProperty, Tag, TagId};
use parking_lot::RwLock;

/// A tag with an optional constraint-source property.
#[derive(Debug)]
pub struct MemoryTag {
    id: TagId,
    name: String,
    /// `None` for tags without the constraint capability.
    constraint: Option<RwLock<Option<String>>>,
}

impl MemoryTag {
    pub(crate) fn new(id: TagId, name: impl Into<String>, constrainable: bool) -> Self {
        Self {
            id,
            name: name.into(),
            constraint: constrainable.then(|| RwLock::new(None)),
        }
    }

    pub fn is_constrainable(&self) -> bool {
        self.constraint.is_some()
    }

    /// Store a new source. Returns false if the tag is not constrainable.
    pub(crate) fn set_source(&self, source: Option<&str>) -> bool {
        match &self.constraint {
            Some(slot) => {
                *slot.write() = source.map(str::to_string);
                true
            }
            None => false,
        }
    }
}

impl Tag for MemoryTag {
    fn id(&self) -> TagId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn constraint_property(&self) -> Option<&dyn ConstraintProperty> {
        self.constraint.as_ref().map(|_| self as &dyn ConstraintProperty)
    }
}

impl ConstraintProperty for MemoryTag {
    fn source(&self) -> Option<String> {
        self.constraint.as_ref().and_then(|slot| slot.read().clone())
    }
}
