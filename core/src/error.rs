//! Common error types for autotag collaborators.

use thiserror::Error;

/// Errors reported by a scripting collaborator.
///
/// These never escape the evaluator: a failing script makes its call
/// evaluate to `false`.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script ran and failed.
    #[error("Script failed: {0}")]
    Failed(String),
}

impl ScriptError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type for script evaluation.
pub type ScriptResult<T> = Result<T, ScriptError>;
