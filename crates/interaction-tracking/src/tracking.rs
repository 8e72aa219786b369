//! # Propagation Engine
//!
//! The public operations of the crate. They compute the active interaction
//! set from the [context stack](crate::context), mutate it through scoped
//! guards, and drive the [observer registry](crate::observer).
//!
//! ## Execution protocol
//!
//! Every `track`/`retrack` call, every `wrap` that captured a context and every
//! reserved continuation gets a fresh execution id. Observers see
//! `on_scheduled` once per id, followed by matching `on_starting`/`on_ended`
//! pairs. `on_ended` is fired from a drop guard, so it also fires when the
//! callback panics; the panic then continues to the caller untouched. A
//! callback that fails by returning `Err` is just a return value and is handed
//! back as is.
//!
//! ## Continuations and `track`
//!
//! An active continuation masks the current set for [`get_current`] and
//! [`wrap`]. [`track`] does not look at the continuation: it always extends the
//! underlying current set. While the continuation stays installed,
//! `get_current` inside such a `track` still reports the continuation's set.
//!
//! ## Profiling gate
//!
//! Without the `profiling` feature every operation degrades to a pass-through:
//! callbacks run untracked, nothing is captured and no observer is notified.

use crate::clock;
use crate::context::{self, ClearContinuation, EndNotice, Scope};
use crate::continuation::Continuation;
use crate::error::TrackingError;
use crate::interaction::{Interaction, InteractionSet};
use crate::observer;
use crate::registry::{next_execution_id, next_interaction_id, ExecutionId};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::trace;

const ENABLED: bool = cfg!(feature = "profiling");

/// Runs `callback` inside a new interaction named `name`.
///
/// The new interaction is appended to the current set (or starts a new one)
/// for the duration of the callback. The previous set is restored afterwards,
/// whether the callback returns or panics.
///
/// ```
/// use interaction_tracking::{get_current, track};
///
/// let names = track("click", || {
///     track("submit", || get_current().map(|set| set.to_string()))
/// });
/// assert_eq!(names.as_deref(), Some("[click, submit]"));
/// assert!(get_current().is_none());
/// ```
pub fn track<F, R>(name: impl Into<Arc<str>>, callback: F) -> R
where
    F: FnOnce() -> R,
{
    if !ENABLED {
        return callback();
    }

    let interaction = Interaction::new(next_interaction_id(), name.into(), clock::now());
    let interactions = match context::current() {
        Some(previous) => previous.extend(interaction),
        None => InteractionSet::singleton(interaction),
    };
    run_scheduled(interactions, callback)
}

/// Re-enters a previously captured interaction set for the duration of
/// `callback`.
///
/// Used by schedulers replaying the interactions of a batch of deferred work.
/// Follows the same notification protocol as [`track`] under a fresh
/// execution id.
pub fn retrack<F, R>(interactions: &InteractionSet, callback: F) -> R
where
    F: FnOnce() -> R,
{
    if !ENABLED {
        return callback();
    }
    run_scheduled(interactions.clone(), callback)
}

fn run_scheduled<F, R>(interactions: InteractionSet, callback: F) -> R
where
    F: FnOnce() -> R,
{
    let execution_id = next_execution_id();
    observer::notify_scheduled(&interactions, execution_id);

    let mut scope = Scope::ending(interactions.clone(), execution_id);
    observer::notify_starting(&interactions, execution_id);
    scope.install(interactions);
    callback()
}

/// Returns the active interaction set, or `None` outside any tracked context.
///
/// An installed continuation takes precedence over the current set.
pub fn get_current() -> Option<InteractionSet> {
    if !ENABLED {
        return None;
    }
    context::active()
}

/// Like [`get_current`], but treats the absence of a context as an error.
pub fn require_current() -> Result<InteractionSet, TrackingError> {
    get_current().ok_or(TrackingError::NoActiveContext)
}

#[derive(Debug, Clone)]
struct Captured {
    interactions: InteractionSet,
    execution_id: ExecutionId,
}

impl Captured {
    fn enter(&self) -> Scope {
        let mut scope = Scope::ending(self.interactions.clone(), self.execution_id);
        scope.install(self.interactions.clone());
        observer::notify_starting(&self.interactions, self.execution_id);
        scope
    }
}

/// A callback bound to the interaction set that was active when it was
/// wrapped. Produced by [`wrap`].
///
/// Each invocation installs the captured set, fires `on_starting`, runs the
/// callback and fires `on_ended`, all under the execution id assigned at wrap
/// time. A wrapper created outside any context is untracked and simply calls
/// through.
#[derive(Debug, Clone)]
#[must_use = "a wrapped callback does nothing until it is called"]
pub struct Wrapped<F> {
    callback: F,
    captured: Option<Captured>,
}

/// Binds `callback` to the currently active interaction set.
///
/// `on_scheduled` fires once, here. If no context is active the callback is
/// returned untracked: calling it behaves exactly like calling `callback`, and
/// no observer is notified.
///
/// ```
/// use interaction_tracking::{get_current, track, wrap};
///
/// let deferred = track("click", || wrap(|| get_current().unwrap().to_string()));
/// assert_eq!(deferred.call(), "[click]");
/// assert!(get_current().is_none());
/// ```
pub fn wrap<F>(callback: F) -> Wrapped<F> {
    let captured = if ENABLED {
        context::active().map(|interactions| {
            let execution_id = next_execution_id();
            observer::notify_scheduled(&interactions, execution_id);
            Captured {
                interactions,
                execution_id,
            }
        })
    } else {
        None
    };
    Wrapped { callback, captured }
}

impl<F> Wrapped<F> {
    /// Whether a context was captured at wrap time.
    pub fn is_tracked(&self) -> bool {
        self.captured.is_some()
    }

    pub fn interactions(&self) -> Option<&InteractionSet> {
        self.captured.as_ref().map(|captured| &captured.interactions)
    }

    pub fn execution_id(&self) -> Option<ExecutionId> {
        self.captured.as_ref().map(|captured| captured.execution_id)
    }

    /// Unwraps the original callback.
    pub fn into_inner(self) -> F {
        self.callback
    }

    fn enter(&self) -> Option<Scope> {
        self.captured.as_ref().map(Captured::enter)
    }

    pub fn call<R>(&self) -> R
    where
        F: Fn() -> R,
    {
        let _scope = self.enter();
        (self.callback)()
    }

    /// Forwards `arg` to the callback. Use a tuple for several arguments.
    pub fn call_with<A, R>(&self, arg: A) -> R
    where
        F: Fn(A) -> R,
    {
        let _scope = self.enter();
        (self.callback)(arg)
    }

    pub fn call_mut<R>(&mut self) -> R
    where
        F: FnMut() -> R,
    {
        let _scope = self.enter();
        (self.callback)()
    }

    pub fn call_once<R>(self) -> R
    where
        F: FnOnce() -> R,
    {
        let Wrapped { callback, captured } = self;
        let _scope = captured.as_ref().map(Captured::enter);
        callback()
    }
}

/// Captures the active interaction set so deferred work can re-install it
/// with [`start_continuation`].
///
/// Returns `None` when no interactions are active. Otherwise `on_scheduled`
/// fires with a fresh execution id.
pub fn reserve_continuation() -> Option<Continuation> {
    if !ENABLED {
        return None;
    }

    let interactions = context::active()?;
    let execution_id = next_execution_id();
    observer::notify_scheduled(&interactions, execution_id);
    Some(Continuation::new(execution_id, interactions))
}

/// Installs `continuation` as the active continuation and fires
/// `on_starting`.
///
/// # Errors
///
/// - [`TrackingError::ContinuationAlreadyActive`] if another continuation is
///   installed (checked first, even when `continuation` is `None`).
/// - [`TrackingError::ContinuationAlreadyRun`] if `continuation` was started
///   before.
///
/// `None` means "nothing to continue" and is otherwise a no-op.
///
/// # Panics
///
/// Resumes an observer panic from `on_starting`. The continuation has been
/// stopped again by then, so `on_ended` pairs the start and nothing stays
/// installed.
pub fn start_continuation(continuation: Option<&Continuation>) -> Result<(), TrackingError> {
    if !ENABLED {
        return Ok(());
    }

    if let Some(active) = context::active_continuation() {
        return Err(TrackingError::ContinuationAlreadyActive {
            requested: continuation.map_or(active.id(), Continuation::id),
            active: active.id(),
        });
    }
    let Some(continuation) = continuation else {
        return Ok(());
    };
    if continuation.has_run() {
        return Err(TrackingError::ContinuationAlreadyRun(continuation.id()));
    }

    continuation.mark_run();
    context::install_continuation(continuation.clone());
    trace!(
        execution_id = continuation.id(),
        interactions = %continuation.interactions(),
        "Continuation started"
    );
    let starting = panic::catch_unwind(AssertUnwindSafe(|| {
        observer::notify_starting(continuation.interactions(), continuation.id());
    }));
    if let Err(payload) = starting {
        finish_continuation(continuation);
        panic::resume_unwind(payload);
    }
    Ok(())
}

/// The continuation installed by [`start_continuation`], if any.
///
/// Hosts check this before starting batch work that would need its own
/// continuation.
pub fn active_continuation() -> Option<Continuation> {
    if !ENABLED {
        return None;
    }
    context::active_continuation()
}

/// Fires `on_ended` for `continuation` and uninstalls it.
///
/// # Errors
///
/// [`TrackingError::ContinuationNotActive`] unless `continuation` is the
/// installed continuation.
pub fn stop_continuation(continuation: &Continuation) -> Result<(), TrackingError> {
    if !ENABLED {
        return Ok(());
    }

    let is_active = context::active_continuation()
        .is_some_and(|active| active.same_as(continuation));
    if !is_active {
        return Err(TrackingError::ContinuationNotActive(continuation.id()));
    }
    finish_continuation(continuation);
    Ok(())
}

fn finish_continuation(continuation: &Continuation) {
    trace!(execution_id = continuation.id(), "Continuation stopped");
    let _clear = ClearContinuation;
    let _ended = EndNotice::new(continuation.interactions().clone(), continuation.id());
}

/// Stops the continuation on drop unless the callback already did.
struct StopOnDrop {
    continuation: Continuation,
}

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        let still_active = context::active_continuation()
            .is_some_and(|active| active.same_as(&self.continuation));
        if still_active {
            finish_continuation(&self.continuation);
        }
    }
}

/// Starts `continuation`, runs `callback`, then stops it again, also when the
/// callback panics.
///
/// # Errors
///
/// Same as [`start_continuation`]; the callback does not run in that case.
pub fn resume_continuation<F, R>(
    continuation: Option<&Continuation>,
    callback: F,
) -> Result<R, TrackingError>
where
    F: FnOnce() -> R,
{
    start_continuation(continuation)?;
    let _stop = continuation
        .filter(|_| ENABLED)
        .map(|continuation| StopOnDrop {
            continuation: continuation.clone(),
        });
    Ok(callback())
}
