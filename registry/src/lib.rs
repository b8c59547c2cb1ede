//! autotag Registry
//!
//! Runtime bookkeeping for constrained tags.
//!
//! Responsibilities:
//! - Own one compiled constraint per constrained tag
//! - Report per-tag state (unconstrained, active, error)
//! - Classify constraint-source edits so callers know what to reset
//! - Track population start-up progress

mod registry;
mod types;

pub use registry::ConstraintRegistry;
pub use types::{Constraint, SourceChange, TagState};
