//! Error types for the work loop.

use interaction_tracking::{ExecutionId, TrackingError};
use thiserror::Error;

/// Errors that can occur while scheduling or committing deferred work.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchedulerError {
    /// The work loop's queue is at capacity.
    #[error("Work queue is full")]
    QueueFull,

    /// The work loop has shut down.
    #[error("Work loop closed")]
    Closed,

    /// The work loop dropped the response channel (e.g. a job panicked).
    #[error("Work loop dropped response channel")]
    Dropped,

    /// The work loop task failed.
    #[error("Work loop failed: {0}")]
    LoopFailed(String),

    /// A continuation started outside the loop is still installed. The commit
    /// was refused before any queued work ran.
    #[error("Cannot commit while continuation {0} is active")]
    ContinuationActive(ExecutionId),

    /// Continuation bookkeeping failed during a commit.
    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),
}
