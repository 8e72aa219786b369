//! # Continuations
//!
//! A [`Continuation`] lets deferred work re-install an interaction set captured
//! earlier. It is one-shot: reserved once, started once, stopped once.
//!
//! ```text
//! reserve_continuation()  ──►  start_continuation()  ──►  stop_continuation()
//!      (on_scheduled)              (on_starting)              (on_ended)
//! ```
//!
//! Handles are cheap to clone and compare by identity: stopping requires the
//! very continuation that was started, not one with equal contents.
//!
//! A continuation that is reserved but never started is abandoned work. Its
//! `on_scheduled` notification has no terminal pair; observers that keep
//! per-execution state should expire such entries themselves.

use crate::interaction::InteractionSet;
use crate::registry::ExecutionId;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

struct Inner {
    id: ExecutionId,
    interactions: InteractionSet,
    has_run: Cell<bool>,
}

/// One-shot capsule re-installing a captured [`InteractionSet`].
#[derive(Clone)]
pub struct Continuation {
    inner: Rc<Inner>,
}

impl Continuation {
    pub(crate) fn new(id: ExecutionId, interactions: InteractionSet) -> Self {
        Self {
            inner: Rc::new(Inner {
                id,
                interactions,
                has_run: Cell::new(false),
            }),
        }
    }

    /// Execution id shared by this continuation's notifications.
    pub fn id(&self) -> ExecutionId {
        self.inner.id
    }

    pub fn interactions(&self) -> &InteractionSet {
        &self.inner.interactions
    }

    /// Whether the continuation has been started.
    pub fn has_run(&self) -> bool {
        self.inner.has_run.get()
    }

    pub(crate) fn mark_run(&self) {
        self.inner.has_run.set(true);
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Continuation) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("id", &self.inner.id)
            .field("interactions", &self.inner.interactions.names())
            .field("has_run", &self.inner.has_run.get())
            .finish()
    }
}
