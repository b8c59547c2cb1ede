//! autotag Core Types
//!
//! This crate provides the foundational types shared by every autotag crate:
//! - Identity types (TagId, EntityId)
//! - Value type returned by the scripting collaborator
//! - The download attribute surface read by constraints
//! - Collaborator interfaces (tag system, entity source, script host)
//! - Monotonic and wall-clock time sources

mod clock;
mod entity;
mod error;
mod id;
mod network;
mod tag;
mod value;

pub use clock::*;
pub use entity::*;
pub use error::*;
pub use id::*;
pub use network::*;
pub use tag::*;
pub use value::*;
