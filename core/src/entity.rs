//! The download attribute surface.
//!
//! Downloads are created, persisted and destroyed by an external lifecycle.
//! Constraints only ever read them through this trait.

use crate::{EntityId, Network};

/// Share ratio of a download, in per-mille.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareRatio {
    /// Uploaded / downloaded, times 1000.
    PerMille(u32),
    /// Nothing downloaded yet, so the ratio is unbounded.
    Infinite,
}

impl ShareRatio {
    /// Ratio value as seen by numeric comparisons.
    ///
    /// An infinite ratio compares as `i32::MAX`.
    pub fn as_f64(&self) -> f64 {
        match self {
            ShareRatio::PerMille(pm) => f64::from(*pm) / 1000.0,
            ShareRatio::Infinite => f64::from(i32::MAX),
        }
    }
}

/// Read-only view of a download.
///
/// Implementations must be cheap to query: evaluation reads attributes
/// on every reconciliation pass.
pub trait Download: Send + Sync {
    /// Identity of this download.
    fn id(&self) -> EntityId;

    /// Display name, as matched by `contains(name, ..)` / `matches(name, ..)`.
    fn display_name(&self) -> String;

    /// True once the download has been removed from the manager.
    fn is_destroyed(&self) -> bool;

    /// False for transient downloads that are never persisted.
    fn is_persistent(&self) -> bool;

    fn share_ratio(&self) -> ShareRatio;

    /// Completion in per-mille (0..=1000), excluding skipped files.
    fn percent_complete(&self) -> u32;

    /// Wall-clock time the download was added, in milliseconds since the epoch.
    fn added_time_millis(&self) -> Option<i64>;

    fn seconds_downloading(&self) -> u64;

    fn seconds_seeding(&self) -> u64;

    /// Bytes obtained by merging data from other swarms.
    fn merged_data_bytes(&self) -> u64;

    fn is_private(&self) -> bool;

    fn is_force_start(&self) -> bool;

    fn is_download_complete(&self) -> bool;

    fn can_archive(&self) -> bool;

    fn networks(&self) -> Vec<Network>;
}
