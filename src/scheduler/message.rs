//! # Work Loop Messages
//!
//! Requests sent from a [`SchedulerClient`](super::SchedulerClient) to the
//! [`WorkLoop`](super::WorkLoop), plus the report a commit answers with.

use super::error::SchedulerError;
use interaction_tracking::{ExecutionId, InteractionSet};
use serde::Serialize;
use std::fmt;
use tokio::sync::oneshot;

/// Commit-phase work returned by a job. Runs under the batch's continuation.
pub type Effect = Box<dyn FnOnce()>;

/// A queued unit of deferred work. Already bound to its caller's interactions.
pub type Job = Box<dyn FnOnce() -> Option<Effect>>;

/// Priority lane of a job. Lower variants are more urgent; committing a lane
/// flushes it together with every more urgent lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Lane {
    Sync,
    UserBlocking,
    Normal,
    Idle,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lane::Sync => "sync",
            Lane::UserBlocking => "user-blocking",
            Lane::Normal => "normal",
            Lane::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// Outcome of one commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitReport {
    /// 1-based commit counter of the loop.
    pub sequence: u64,
    /// The lane that was committed.
    pub lane: Lane,
    /// Labels of the jobs that ran, in execution order.
    pub jobs: Vec<String>,
    /// Names of the interactions attributed to the batch, ordered by id.
    pub interactions: Vec<String>,
    /// Execution id of the batch continuation, if any interaction was pending.
    pub continuation_id: Option<ExecutionId>,
    /// Number of commit-phase effects that ran.
    pub effects_run: usize,
}

pub(crate) enum SchedulerRequest {
    Schedule {
        lane: Lane,
        label: String,
        interactions: Option<InteractionSet>,
        job: Job,
    },
    Commit {
        lane: Lane,
        respond_to: oneshot::Sender<Result<CommitReport, SchedulerError>>,
    },
}

impl fmt::Debug for SchedulerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerRequest::Schedule {
                lane,
                label,
                interactions,
                ..
            } => f
                .debug_struct("Schedule")
                .field("lane", lane)
                .field("label", label)
                .field("interactions", &interactions.as_ref().map(|set| set.names()))
                .finish_non_exhaustive(),
            SchedulerRequest::Commit { lane, .. } => f
                .debug_struct("Commit")
                .field("lane", lane)
                .finish_non_exhaustive(),
        }
    }
}
