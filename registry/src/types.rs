//! Constraint definition types.

use std::fmt;

use autotag_compiler::{CompileError, Expr};
use autotag_core::TagRef;

/// A tag's constraint: its source text and the compilation outcome.
///
/// Constraints are immutable once registered. A source edit installs a new
/// `Constraint` with a higher generation instead of mutating this one.
#[derive(Debug)]
pub struct Constraint {
    pub tag: TagRef,
    pub source: String,
    pub compiled: Result<Expr, CompileError>,
    /// Increases with every installed constraint, across all tags.
    pub generation: u64,
}

impl Constraint {
    /// The expression, if compilation succeeded.
    pub fn expr(&self) -> Option<&Expr> {
        self.compiled.as_ref().ok()
    }

    pub fn is_active(&self) -> bool {
        self.compiled.is_ok()
    }

    pub fn state(&self) -> TagState {
        match &self.compiled {
            Ok(_) => TagState::Active,
            Err(e) => TagState::Error(e.to_string()),
        }
    }
}

/// Per-tag constraint state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagState {
    /// No constraint source, or the tag is not tracked.
    Unconstrained,
    /// A compiled constraint drives membership.
    Active,
    /// The source failed to compile. Membership is left as it was.
    Error(String),
}

impl fmt::Display for TagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagState::Unconstrained => write!(f, "unconstrained"),
            TagState::Active => write!(f, "active"),
            TagState::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Outcome of a constraint-source edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChange {
    /// Same source as the registered constraint.
    Unchanged,
    /// The source was cleared and the constraint dropped.
    Removed,
    /// The source was empty and no constraint existed.
    Ignored,
    /// A new constraint was installed. Its tag's membership must be reset.
    Replaced { compiled: bool },
}
