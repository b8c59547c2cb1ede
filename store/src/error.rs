//! Store error types.

use autotag_core::{EntityId, TagId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Tag not found: {0}")]
    TagNotFound(TagId),

    #[error("Download not found: {0}")]
    DownloadNotFound(EntityId),

    #[error("Tag '{0}' does not support constraints")]
    NotConstrainable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
