//! Handler error types.

use autotag_scheduler::SchedulerError;
use thiserror::Error;

/// Handler errors.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The worker is gone or refused the item.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Invalid configuration.
    #[error("config error: {message}")]
    Config { message: String },
}

impl HandlerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
