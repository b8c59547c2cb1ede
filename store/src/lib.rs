//! autotag In-Memory Store
//!
//! A thread-safe, in-memory implementation of the collaborators the
//! constraint engine consumes:
//! - Tags with names and an optional constraint-source property
//! - Membership index: tag -> members, download -> ordered tags
//! - The download population, with mutable attributes
//! - Membership-change notifications

mod download;
mod error;
mod index;
mod store;
mod tag;

pub use download::{DownloadAttrs, MemoryDownload};
pub use error::{StoreError, StoreResult};
pub use store::{MemoryTagStore, MembershipObserver};
pub use tag::MemoryTag;
