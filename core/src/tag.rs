//! Collaborator interfaces consumed by the constraint engine.
//!
//! The tag system, the download population and the script host all live
//! outside autotag. The engine talks to them only through these traits.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Download, EntityId, ScriptResult, TagId, Value};

/// A tag as seen by the engine: identity plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagRef {
    pub id: TagId,
    pub name: String,
}

impl TagRef {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Access to a tag's persisted constraint source.
pub trait ConstraintProperty: Send + Sync {
    /// The current source text, `None` when the property was never set.
    fn source(&self) -> Option<String>;
}

/// A tag reported by the tag system.
///
/// Optional features are exposed as capability accessors. The handler
/// queries them once, when the tag is registered.
pub trait Tag: Send + Sync {
    fn id(&self) -> TagId;

    fn name(&self) -> String;

    /// The constraint capability, if this tag supports automatic membership.
    fn constraint_property(&self) -> Option<&dyn ConstraintProperty> {
        None
    }

    fn to_ref(&self) -> TagRef {
        TagRef::new(self.id(), self.name())
    }
}

/// Membership storage owned by the tag system.
pub trait TagSystem: Send + Sync {
    /// Current members of a tag.
    fn members(&self, tag: TagId) -> HashSet<EntityId>;

    fn add(&self, tag: TagId, entity: EntityId);

    fn remove(&self, tag: TagId, entity: EntityId);

    /// Tags currently applied to an entity, in tag-system order.
    fn tags_of(&self, entity: EntityId) -> Vec<TagRef>;
}

/// The live download population.
pub trait EntitySource: Send + Sync {
    /// Snapshot of every known download.
    fn downloads(&self) -> Vec<Arc<dyn Download>>;
}

/// The external scripting collaborator behind `javascript(..)`.
pub trait ScriptHost: Send + Sync {
    /// Evaluate `script` for `download` on behalf of `tag`.
    fn evaluate(&self, script: &str, download: &dyn Download, tag: &TagRef) -> ScriptResult<Value>;
}
