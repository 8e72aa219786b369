//! # Work Loop
//!
//! The `WorkLoop` is the server half of the scheduler. It owns the lane queues
//! and the interactions recorded for them, and processes requests one at a time
//! on the current thread.

use super::client::SchedulerClient;
use super::error::SchedulerError;
use super::message::{CommitReport, Job, Lane, SchedulerRequest};
use interaction_tracking::{
    active_continuation, reserve_continuation, resume_continuation, retrack, Interaction,
    InteractionId, InteractionSet,
};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Work loop configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Capacity of the request channel. Scheduling fails with
    /// [`SchedulerError::QueueFull`] once this many requests are waiting.
    pub buffer_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

struct QueuedJob {
    label: String,
    job: Job,
}

/// Batches deferred jobs per lane and commits them on request.
///
/// # Commit
///
/// Committing a lane takes every queued job of that lane and of all more
/// urgent lanes, then:
///
/// 1. Merges the interactions recorded for those lanes (deduplicated, ordered
///    by interaction id) and reserves a continuation under the merged set.
/// 2. Runs each job. Jobs are wrapped, so each runs under the interactions of
///    the caller that scheduled it.
/// 3. Resumes the continuation and runs the effects the jobs returned. Inside
///    an effect the whole batch's interactions are current, so anything it
///    wraps is attributed to all of them.
///
/// A commit requested while a continuation started elsewhere is still
/// installed fails with [`SchedulerError::ContinuationActive`] and leaves the
/// queues as they were.
///
/// Jobs still queued when the loop shuts down are dropped without running.
pub struct WorkLoop {
    receiver: mpsc::Receiver<SchedulerRequest>,
    queues: BTreeMap<Lane, Vec<QueuedJob>>,
    pending: BTreeMap<Lane, BTreeMap<InteractionId, Interaction>>,
    commits: u64,
}

impl WorkLoop {
    /// Creates a `WorkLoop` and its associated [`SchedulerClient`].
    pub fn new(config: &SchedulerConfig) -> (Self, SchedulerClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        let work_loop = Self {
            receiver,
            queues: BTreeMap::new(),
            pending: BTreeMap::new(),
            commits: 0,
        };
        (work_loop, SchedulerClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        info!("Work loop started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                SchedulerRequest::Schedule {
                    lane,
                    label,
                    interactions,
                    job,
                } => {
                    if let Some(interactions) = interactions {
                        let recorded = self.pending.entry(lane).or_default();
                        for interaction in &interactions {
                            recorded
                                .entry(interaction.id())
                                .or_insert_with(|| interaction.clone());
                        }
                    }
                    let queue = self.queues.entry(lane).or_default();
                    queue.push(QueuedJob { label, job });
                    debug!(%lane, queued = queue.len(), "Queued");
                }
                SchedulerRequest::Commit { lane, respond_to } => {
                    let result = self.commit(lane);
                    match &result {
                        Ok(report) => info!(
                            %lane,
                            sequence = report.sequence,
                            jobs = report.jobs.len(),
                            effects = report.effects_run,
                            interactions = ?report.interactions,
                            "Committed"
                        ),
                        Err(e) => warn!(%lane, error = %e, "Commit failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        let abandoned: usize = self.queues.values().map(Vec::len).sum();
        info!(abandoned, commits = self.commits, "Shutdown");
    }

    fn commit(&mut self, lane: Lane) -> Result<CommitReport, SchedulerError> {
        // Checked before draining, so a refused commit loses nothing.
        if let Some(active) = active_continuation() {
            return Err(SchedulerError::ContinuationActive(active.id()));
        }

        let mut jobs = Vec::new();
        self.queues.retain(|queued_lane, queue| {
            if *queued_lane <= lane {
                jobs.append(queue);
                false
            } else {
                true
            }
        });

        let mut merged = BTreeMap::new();
        self.pending.retain(|recorded_lane, recorded| {
            if *recorded_lane <= lane {
                merged.append(recorded);
                false
            } else {
                true
            }
        });

        let interactions = InteractionSet::from_interactions(merged.into_values().collect());
        let continuation = interactions
            .as_ref()
            .and_then(|set| retrack(set, reserve_continuation));

        let mut labels = Vec::with_capacity(jobs.len());
        let mut effects = Vec::new();
        for QueuedJob { label, job } in jobs {
            debug!(%lane, label = %label, "Running");
            if let Some(effect) = job() {
                effects.push(effect);
            }
            labels.push(label);
        }

        let effects_run = effects.len();
        resume_continuation(continuation.as_ref(), move || {
            for effect in effects {
                effect();
            }
        })?;

        self.commits += 1;
        Ok(CommitReport {
            sequence: self.commits,
            lane,
            jobs: labels,
            interactions: interactions
                .map(|set| set.names().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            continuation_id: continuation.map(|continuation| continuation.id()),
            effects_run,
        })
    }
}
