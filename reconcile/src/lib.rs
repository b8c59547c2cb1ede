//! autotag Reconciliation
//!
//! Converge tag membership with constraint results.
//!
//! Responsibilities:
//! - Apply constraints to one download, a batch, or the whole population
//! - Gate additions through a per-(tag, download) cooldown
//! - Clear a tag's membership ahead of a recompiled constraint
//! - Report what each pass did

mod debounce;
mod engine;

pub use debounce::DebounceHistory;
pub use engine::{ReconcileStats, Reconciler};

use std::time::Duration;

/// Default cooldown between two additions of the same (tag, download).
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1_000);
