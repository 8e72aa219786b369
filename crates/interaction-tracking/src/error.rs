//! # Tracking Errors
//!
//! This module defines the errors surfaced by the propagation engine. They are
//! programming errors (continuations started or stopped out of turn, context
//! required where none exists), so they are returned to the immediate caller
//! and never retried or logged by the engine itself.

use crate::registry::ExecutionId;

/// Errors that can occur while driving the propagation engine.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TrackingError {
    /// A continuation was started while another one was still installed.
    #[error("Cannot start continuation {requested}: continuation {active} is already active")]
    ContinuationAlreadyActive {
        requested: ExecutionId,
        active: ExecutionId,
    },

    /// A continuation was started a second time.
    #[error("Cannot start continuation {0}: it has already run")]
    ContinuationAlreadyRun(ExecutionId),

    /// A continuation was stopped without being the installed one.
    #[error("Cannot stop continuation {0}: it is not the active continuation")]
    ContinuationNotActive(ExecutionId),

    /// An operation that needs a tracked context ran outside of one.
    #[error("No interactions are active outside of a tracked context")]
    NoActiveContext,
}
