//! # Observability & Logging
//!
//! Structured logging uses the `tracing` crate. [`setup_tracing`] installs a
//! compact `fmt` subscriber filtered through `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run                          # work loop lifecycle
//! RUST_LOG=debug cargo run                         # every lifecycle notification
//! RUST_LOG=interaction_tracking=trace cargo run    # continuation transitions too
//! ```
//!
//! The engine itself only emits `trace` events for continuation transitions
//! and never logs failures; those go back to the caller. To see every
//! scheduled/starting/ended notification, register a [`TracingObserver`]:
//!
//! ```text
//! DEBUG Scheduled execution_id=4 interactions=[click]
//! DEBUG Starting execution_id=4 interactions=[click]
//! DEBUG Ended execution_id=4 interactions=[click]
//! ```

use crate::interaction::InteractionSet;
use crate::observer::InteractionObserver;
use crate::registry::ExecutionId;
use tracing::debug;

/// Initializes the global `tracing` subscriber.
///
/// Panics if a global subscriber is already set; call it once from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Observer that logs every lifecycle notification at `debug` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl InteractionObserver for TracingObserver {
    fn on_scheduled(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        debug!(execution_id, %interactions, "Scheduled");
    }

    fn on_starting(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        debug!(execution_id, %interactions, "Starting");
    }

    fn on_ended(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        debug!(execution_id, %interactions, "Ended");
    }
}
