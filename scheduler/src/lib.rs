//! autotag Scheduler
//!
//! A single serial worker with an optional periodic timer.
//!
//! Responsibilities:
//! - Run every work item on one named thread, in submission order
//! - Drive a fixed-interval timer that can be armed and cancelled
//! - Provide a barrier so callers can wait for queued work
//! - Drain queued work on shutdown, then join the thread

mod error;
mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::{Scheduler, Worker};
