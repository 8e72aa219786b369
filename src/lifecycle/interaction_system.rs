use crate::profiler::Profiler;
use crate::scheduler::{SchedulerClient, SchedulerConfig, SchedulerError, WorkLoop};
use interaction_tracking::{register_observer, TracingObserver};
use std::rc::Rc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator for a tracked host application.
///
/// `InteractionSystem` is responsible for:
/// - **Observer Wiring**: Registering the [`Profiler`] and the logging observer
/// - **Lifecycle Management**: Starting and stopping the [`WorkLoop`]
///
/// Observers and the active context are per-thread, so the work loop is
/// spawned with [`tokio::task::spawn_local`] and everything runs on one thread.
/// [`InteractionSystem::new`] must be called from inside a
/// [`tokio::task::LocalSet`].
///
/// # Example
///
/// ```ignore
/// let local = tokio::task::LocalSet::new();
/// local.run_until(async {
///     let system = InteractionSystem::new(SchedulerConfig::default());
///
///     track("click", || {
///         system.scheduler.schedule_update(Lane::UserBlocking, "render", || {})
///     })?;
///     system.scheduler.commit(Lane::UserBlocking).await?;
///
///     system.shutdown().await
/// }).await?;
/// ```
pub struct InteractionSystem {
    /// Client for queuing work on the loop
    pub scheduler: SchedulerClient,

    /// Work blocks recorded per interaction
    pub profiler: Rc<Profiler>,

    /// Task handle of the running loop (used for graceful shutdown)
    handle: JoinHandle<()>,
}

impl InteractionSystem {
    /// Registers the observers and spawns the work loop on the current `LocalSet`.
    ///
    /// Observers stay registered for the lifetime of the thread.
    pub fn new(config: SchedulerConfig) -> Self {
        let profiler = Rc::new(Profiler::new());
        register_observer(profiler.clone());
        register_observer(Rc::new(TracingObserver));

        let (work_loop, scheduler) = WorkLoop::new(&config);
        let handle = tokio::task::spawn_local(work_loop.run());

        info!(buffer_size = config.buffer_size, "System started");
        Self {
            scheduler,
            profiler,
            handle,
        }
    }

    /// Gracefully shuts down the work loop.
    ///
    /// Dropping the client closes the channel; the loop drains what is left
    /// and exits. Clones of the client held elsewhere keep the loop alive, so
    /// drop them first.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::LoopFailed`] if the loop task panicked.
    pub async fn shutdown(self) -> Result<(), SchedulerError> {
        info!("Shutting down system...");

        drop(self.scheduler);

        if let Err(e) = self.handle.await {
            error!("Work loop failed: {:?}", e);
            return Err(SchedulerError::LoopFailed(e.to_string()));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
