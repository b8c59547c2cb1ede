//! autotag Handler
//!
//! The event-facing side of the constraint engine.
//!
//! Responsibilities:
//! - Accept tag, constraint-source and download notifications
//! - Compile edited sources and keep the registry current
//! - Turn notifications into work items for the serial worker
//! - Keep the sweep timer armed exactly while some tag is constrained
//! - Expose per-tag state for diagnostics

mod config;
mod error;
mod handler;
mod work;

pub use autotag_registry::TagState;
pub use config::HandlerConfig;
pub use error::{HandlerError, HandlerResult};
pub use handler::{ConstraintHandler, HandlerBuilder};
