//! Fixture error types.

use autotag_handler::{HandlerError, TagState};
use autotag_store::StoreError;
use thiserror::Error;

/// Errors raised by the fixture or by a failed expectation.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("unknown download: {0}")]
    UnknownDownload(String),

    #[error("tag '{tag}': expected members {expected:?}, found {actual:?}")]
    Members {
        tag: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("tag '{tag}': expected state {expected}, found {actual}")]
    State {
        tag: String,
        expected: TagState,
        actual: TagState,
    },

    #[error("expected timer armed = {expected}")]
    Timer { expected: bool },

    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl FixtureError {
    pub fn unknown_tag(name: impl Into<String>) -> Self {
        Self::UnknownTag(name.into())
    }

    pub fn unknown_download(name: impl Into<String>) -> Self {
        Self::UnknownDownload(name.into())
    }
}

pub type FixtureResult<T> = Result<T, FixtureError>;
