//! Cooperative work loop that defers jobs into priority lanes.
//!
//! This is the host side of interaction tracking: it decides *when* deferred
//! work runs, while the tracking crate decides *which interactions* it is
//! attributed to.
//!
//! # Main Components
//!
//! - [`WorkLoop`] - Owns the lane queues and runs commits
//! - [`SchedulerClient`] - Cloneable handle that schedules jobs and requests commits
//! - [`CommitReport`] - What a commit ran and which interactions it served
//! - [`SchedulerError`] - Common error types

pub mod client;
pub mod error;
pub mod message;
pub mod work_loop;

pub use client::SchedulerClient;
pub use error::SchedulerError;
pub use message::{CommitReport, Effect, Job, Lane};
pub use work_loop::{SchedulerConfig, WorkLoop};
