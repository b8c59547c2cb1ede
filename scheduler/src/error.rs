//! Scheduler error types.

use thiserror::Error;

/// Errors that can occur when talking to the worker.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler was shut down or its thread has exited.
    #[error("Scheduler is closed")]
    Closed,

    /// The worker thread could not be started.
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
