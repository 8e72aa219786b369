#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Interaction Recipe
//!
//! > **A Recipe for attributing deferred work to the user interactions that caused it.**
//!
//! This crate is a host application for the [`interaction_tracking`] engine. It
//! shows how a cooperative work loop keeps interaction context alive across
//! queued jobs and commit-phase effects, and how an observer turns the
//! resulting lifecycle notifications into a profile.
//!
//! ## 🏗️ Design Philosophy
//!
//! The engine only knows about *context*: which interactions are current and
//! which unit of work is running. The host decides *when* work runs. Keeping
//! those apart means:
//! - **No plumbing through call sites**: a job captures its caller's context by being wrapped.
//! - **Batching stays honest**: a commit serving many callers is attributed to all of them.
//! - **Observers are pluggable**: profiling and logging are just two registered observers.
//!
//! ## 🚀 Core Concepts
//!
//! ### Lanes
//! Jobs are queued on a [`Lane`](scheduler::Lane). Committing a lane flushes it together with every
//! more urgent lane, the way a renderer flushes synchronous updates before idle ones.
//!
//! ### Continuations
//! A commit reserves a continuation under the merged interactions of its batch and resumes it
//! for the effects phase. See [`interaction_tracking::Continuation`].
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! [`SchedulerError`](scheduler::SchedulerError) covers channel failures and wraps
//! [`TrackingError`](interaction_tracking::TrackingError) via `#[from]`.
//!
//! ### 2. Concurrency Model
//! Interaction context is per-thread. The work loop runs on a `LocalSet` via `spawn_local`,
//! processing requests sequentially on the same thread as its callers.
//!
//! ### 3. Observability
//! `tracing` throughout. The loop logs lifecycle and commits at `info`, queueing at `debug`.
//! See [`lifecycle::setup_tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`interaction_tracking`])
//! - **Role**: Tracks the current interaction set, wraps callbacks, manages continuations.
//! - **Key items**: [`track`](interaction_tracking::track), [`wrap`](interaction_tracking::wrap),
//!   [`reserve_continuation`](interaction_tracking::reserve_continuation).
//!
//! ### 2. The Work Loop ([`scheduler`])
//! - **Role**: Queues jobs per lane and commits them under a batch continuation.
//! - **Key items**: [`WorkLoop`](scheduler::WorkLoop), [`SchedulerClient`](scheduler::SchedulerClient).
//!
//! ### 3. The Profiler ([`profiler`])
//! - **Role**: Records scheduled/started/ended times of every work block per interaction.
//! - **Key items**: [`Profiler`](profiler::Profiler).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: Registers observers, spawns the loop and shuts it down.
//! - **Key items**: [`InteractionSystem`](lifecycle::InteractionSystem).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with commit logs
//! RUST_LOG=info cargo run
//!
//! # Every lifecycle notification
//! RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod lifecycle;
pub mod profiler;
pub mod scheduler;
