//! # Interaction Recipe Demo
//!
//! Simulates two user interactions feeding a work loop:
//! 1.  A `click` queues a user-blocking render.
//! 2.  A `keypress` queues a normal-priority update with a commit-phase effect.
//! 3.  An untracked idle job is queued outside any interaction.
//!
//! Committing `UserBlocking` runs only the click's work; committing `Idle`
//! flushes everything left. Finished profiles are drained and printed as JSON
//! at the end.

use interaction_recipe::lifecycle::{setup_tracing, InteractionSystem};
use interaction_recipe::scheduler::{Effect, Lane, SchedulerConfig};
use interaction_tracking::{get_current, track, wrap};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting interaction demo");

    let local = tokio::task::LocalSet::new();
    local.run_until(run()).await
}

async fn run() -> Result<(), String> {
    let system = InteractionSystem::new(SchedulerConfig::default());

    track("click", || {
        system
            .scheduler
            .schedule_update(Lane::UserBlocking, "render-button", || {
                info!(context = ?current_names(), "Rendering button");
            })
    })
    .map_err(|e| e.to_string())?;

    track("keypress", || {
        system.scheduler.schedule(Lane::Normal, "update-input", || {
            info!(context = ?current_names(), "Updating input");
            let effect: Effect = Box::new(|| {
                info!(context = ?current_names(), "Layout effect");
                let deferred = wrap(|| info!(context = ?current_names(), "Deferred from effect"));
                deferred.call();
            });
            Some(effect)
        })
    })
    .map_err(|e| e.to_string())?;

    system
        .scheduler
        .schedule_update(Lane::Idle, "prefetch", || {
            info!(context = ?current_names(), "Prefetching");
        })
        .map_err(|e| e.to_string())?;

    for lane in [Lane::UserBlocking, Lane::Idle] {
        match system.scheduler.commit(lane).await {
            Ok(report) => info!(
                %lane,
                jobs = ?report.jobs,
                interactions = ?report.interactions,
                "Commit finished"
            ),
            Err(e) => warn!(%lane, error = %e, "Commit failed"),
        }
    }

    let finished = system.profiler.take_finished();
    let report = serde_json::to_string_pretty(&finished).map_err(|e| e.to_string())?;
    println!("{report}");
    info!(
        drained = finished.len(),
        unfinished = system.profiler.unfinished().len(),
        "Profiles drained"
    );

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}

fn current_names() -> Vec<String> {
    get_current()
        .map(|set| set.names().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}
