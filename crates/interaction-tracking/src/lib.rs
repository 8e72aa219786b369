//! # Interaction Tracking
//!
//! This crate attributes synchronous and deferred work back to the logical
//! event that caused it ("this commit was caused by this click"). Calling code
//! tags a span of work with a named **interaction**, the tag survives across
//! explicitly wrapped callbacks, and registered **observers** are told when
//! tracked work is scheduled, starts and ends.
//!
//! ## Core Concepts
//!
//! ### Interactions and interaction sets
//!
//! [`track`] creates an [`Interaction`] and appends it to the current
//! [`InteractionSet`] for the duration of a callback. Nested calls build
//! `[outer, inner]`; when the inner call exits, `[outer]` is current again.
//! Sets are immutable snapshots, so nothing a child does changes what its
//! parent sees.
//!
//! ### Wrapping deferred work
//!
//! Nothing is intercepted automatically. Work that runs later (a timer, a
//! queued job) must be passed through [`wrap`], which captures the active set
//! and re-installs it around every invocation of the returned [`Wrapped`].
//!
//! ### Continuations
//!
//! A [`Continuation`] is a one-shot capsule for resumable work: reserve it
//! while interactions are active, start it when the work resumes, stop it when
//! the work is done. While installed it masks the current set for
//! [`get_current`] and [`wrap`]. At most one continuation is active at a time.
//!
//! ### Observers
//!
//! [`InteractionObserver`] has three callbacks, fanned out in registration
//! order. Every tracked unit of work has an execution id;
//! `on_scheduled` fires once per id, `on_starting`/`on_ended` in pairs.
//!
//! ```
//! use interaction_tracking::mock::RecordingObserver;
//! use interaction_tracking::{get_current, register_observer, track, wrap};
//! use std::rc::Rc;
//!
//! let recorder = Rc::new(RecordingObserver::new());
//! register_observer(recorder.clone());
//!
//! let later = track("click", || wrap(|| get_current().map(|set| set.len())));
//! assert_eq!(later.call(), Some(1));
//!
//! recorder.verify_paired();
//! ```
//!
//! ## Architecture Notes
//!
//! ### 1. Scoped state
//! The current set and the active continuation live in thread-local cells
//! ([`context`]). Every change is made through a guard whose `Drop` restores
//! the previous state, so a panicking callback cannot corrupt its caller's
//! context. The model is single-threaded and cooperative: each thread tracks
//! its own context and has its own observers. Interaction and execution ids
//! are unique across the whole process.
//!
//! ### 2. Errors
//! Continuation misuse is reported as [`TrackingError`] to the immediate
//! caller. Callback failures are never touched: an `Err` return value is
//! passed back, a panic keeps unwinding after cleanup.
//!
//! ### 3. Profiling gate
//! The `profiling` feature (on by default) enables tracking. Without it every
//! operation is a pass-through, so the calls can stay in production code.
//!
//! ### 4. Observability
//! See [`logging`] for subscriber setup and the [`TracingObserver`].
//!
//! ## Testing
//!
//! The [`mock`] module provides a [`RecordingObserver`](mock::RecordingObserver)
//! that checks the lifecycle protocol and a [`ManualClock`](mock::ManualClock)
//! for deterministic timestamps.

pub mod clock;
pub mod context;
pub mod continuation;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod mock;
pub mod observer;
pub mod registry;
pub mod tracking;

// Re-export core types for convenience
pub use clock::{install_clock, now, reset_clock, Clock, MonotonicClock};
pub use continuation::Continuation;
pub use error::TrackingError;
pub use interaction::{Interaction, InteractionSet};
pub use logging::TracingObserver;
pub use observer::{register_observer, InteractionObserver};
pub use registry::{next_execution_id, next_interaction_id, ExecutionId, InteractionId};
pub use tracking::{
    active_continuation, get_current, require_current, reserve_continuation, resume_continuation,
    retrack, start_continuation, stop_continuation, track, wrap, Wrapped,
};
