//! # Scheduler Client
//!
//! The caller-facing half of the work loop. Scheduling is synchronous so it can
//! happen from inside a `track` callback; that is the moment the caller's
//! interactions are captured.

use super::error::SchedulerError;
use super::message::{CommitReport, Effect, Lane, SchedulerRequest};
use interaction_tracking::{get_current, wrap};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Cloneable handle for queuing work on a [`WorkLoop`](super::WorkLoop).
#[derive(Clone)]
pub struct SchedulerClient {
    sender: mpsc::Sender<SchedulerRequest>,
}

impl SchedulerClient {
    pub(crate) fn new(sender: mpsc::Sender<SchedulerRequest>) -> Self {
        Self { sender }
    }

    /// Queues `job` on `lane`.
    ///
    /// The job is wrapped, so it later runs under the interactions active
    /// right now, and those interactions are recorded against the lane for the
    /// commit. A returned [`Effect`] runs during the commit phase.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::QueueFull`] when the loop's buffer is at capacity,
    /// [`SchedulerError::Closed`] once the loop has shut down.
    pub fn schedule<F>(
        &self,
        lane: Lane,
        label: impl Into<String>,
        job: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce() -> Option<Effect> + 'static,
    {
        let label = label.into();
        let interactions = get_current();
        let job = wrap(job);
        debug!(%lane, label = %label, tracked = job.is_tracked(), "Scheduling");

        let request = SchedulerRequest::Schedule {
            lane,
            label,
            interactions,
            job: Box::new(move || job.call_once()),
        };
        self.sender.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => SchedulerError::QueueFull,
            TrySendError::Closed(_) => SchedulerError::Closed,
        })
    }

    /// Queues a job without a commit-phase effect.
    pub fn schedule_update<F>(
        &self,
        lane: Lane,
        label: impl Into<String>,
        update: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce() + 'static,
    {
        self.schedule(lane, label, move || {
            update();
            None
        })
    }

    /// Flushes `lane` and every more urgent lane, waiting for the report.
    pub async fn commit(&self, lane: Lane) -> Result<CommitReport, SchedulerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SchedulerRequest::Commit { lane, respond_to })
            .await
            .map_err(|_| SchedulerError::Closed)?;
        response.await.map_err(|_| SchedulerError::Dropped)?
    }
}
