//! # Context Stack
//!
//! Holds the two ambient cells of the engine: the current interaction set and
//! the single active continuation. Both live in thread-local storage; the model
//! is single-threaded and cooperative, so a thread is the whole "process" as far
//! as tracking is concerned.
//!
//! Nothing outside this module writes to the cells directly. Entering a tracked
//! scope hands back a guard, and dropping the guard is what restores the prior
//! state, so restoration happens on every exit path including unwinding.

use crate::continuation::Continuation;
use crate::interaction::InteractionSet;
use crate::observer;
use crate::registry::ExecutionId;
use std::cell::RefCell;

thread_local! {
    static CURRENT: RefCell<Option<InteractionSet>> = const { RefCell::new(None) };
    static CONTINUATION: RefCell<Option<Continuation>> = const { RefCell::new(None) };
}

/// The current set, ignoring any active continuation.
pub(crate) fn current() -> Option<InteractionSet> {
    CURRENT.with(|slot| slot.borrow().clone())
}

pub(crate) fn active_continuation() -> Option<Continuation> {
    CONTINUATION.with(|slot| slot.borrow().clone())
}

/// The set `get_current`/`wrap` observe: the continuation's if one is
/// installed, else the current set.
pub(crate) fn active() -> Option<InteractionSet> {
    match active_continuation() {
        Some(continuation) => Some(continuation.interactions().clone()),
        None => current(),
    }
}

pub(crate) fn install_continuation(continuation: Continuation) {
    CONTINUATION.with(|slot| *slot.borrow_mut() = Some(continuation));
}

fn clear_continuation() {
    CONTINUATION.with(|slot| *slot.borrow_mut() = None);
}

/// Guard that puts the previous current set back on drop.
struct RestoreCurrent {
    previous: Option<InteractionSet>,
}

impl Drop for RestoreCurrent {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Guard that fires `on_ended` on drop.
pub(crate) struct EndNotice {
    interactions: InteractionSet,
    execution_id: ExecutionId,
}

impl EndNotice {
    pub(crate) fn new(interactions: InteractionSet, execution_id: ExecutionId) -> Self {
        Self {
            interactions,
            execution_id,
        }
    }
}

impl Drop for EndNotice {
    fn drop(&mut self) {
        observer::notify_ended(&self.interactions, self.execution_id);
    }
}

/// A tracked scope. Drops `on_ended` first, then the previous current set.
///
/// The end notice is armed before `on_starting` fans out, so any observer that
/// saw the execution start also sees it end, even when a later observer
/// panics mid fan-out. The restore still runs if an observer panics in
/// `on_ended`.
#[must_use = "the scope ends as soon as it is dropped"]
pub(crate) struct Scope {
    _ended: EndNotice,
    _restore: Option<RestoreCurrent>,
}

impl Scope {
    /// Arms the `on_ended` notification for `execution_id`. Nothing is
    /// installed yet.
    pub(crate) fn ending(interactions: InteractionSet, execution_id: ExecutionId) -> Self {
        Self {
            _ended: EndNotice::new(interactions, execution_id),
            _restore: None,
        }
    }

    /// Installs `interactions` as the current set until the scope drops.
    /// Called at most once per scope.
    pub(crate) fn install(&mut self, interactions: InteractionSet) {
        debug_assert!(self._restore.is_none());
        let previous = CURRENT.with(|slot| slot.borrow_mut().replace(interactions));
        self._restore = Some(RestoreCurrent { previous });
    }
}

/// Guard that uninstalls the active continuation on drop.
pub(crate) struct ClearContinuation;

impl Drop for ClearContinuation {
    fn drop(&mut self) {
        clear_continuation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Interaction;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    fn set(name: &str) -> InteractionSet {
        InteractionSet::singleton(Interaction::new(0, Arc::from(name), 0.0))
    }

    #[test]
    fn test_scope_restores_on_drop() {
        assert!(current().is_none());
        {
            let mut scope = Scope::ending(set("outer"), 1);
            scope.install(set("outer"));
            assert_eq!(current().unwrap().names(), vec!["outer"]);
            {
                let mut inner = Scope::ending(set("inner"), 2);
                inner.install(set("inner"));
                assert_eq!(current().unwrap().names(), vec!["inner"]);
            }
            assert_eq!(current().unwrap().names(), vec!["outer"]);
        }
        assert!(current().is_none());
    }

    #[test]
    fn test_scope_restores_on_panic() {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut scope = Scope::ending(set("doomed"), 1);
            scope.install(set("doomed"));
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(current().is_none());
    }

    #[test]
    fn test_scope_without_install_leaves_current_alone() {
        let mut outer = Scope::ending(set("outer"), 1);
        outer.install(set("outer"));
        {
            let _pending = Scope::ending(set("pending"), 2);
        }
        assert_eq!(current().unwrap().names(), vec!["outer"]);
        drop(outer);
        assert!(current().is_none());
    }
}
