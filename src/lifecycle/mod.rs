//! # System Lifecycle & Orchestration
//!
//! This module wires the host application together: it registers the
//! observers that consume interaction lifecycle notifications, starts the
//! [`WorkLoop`](crate::scheduler::WorkLoop) and hands out its client.
//!
//! **Key Responsibilities:**
//! 1. **Observer Registration** - The [`Profiler`](crate::profiler::Profiler) and the logging observer
//! 2. **Lifecycle Management** - Spawning the loop on the current `LocalSet`
//! 3. **Graceful Shutdown** - Closing the channel and awaiting the loop
//! 4. **Observability Setup** - Re-exporting [`setup_tracing`]
//!
//! ## Shutdown Sequence
//!
//! ```text
//! 1. drop(SchedulerClient)  → channel closes
//! 2. WorkLoop::run          → recv() returns None, logs abandoned jobs
//! 3. handle.await           → Ok(()) or LoopFailed
//! ```

pub mod interaction_system;

pub use interaction_system::InteractionSystem;
pub use interaction_tracking::logging::setup_tracing;
