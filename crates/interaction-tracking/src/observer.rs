//! # Observer Registry
//!
//! External listeners implement [`InteractionObserver`] and are registered with
//! [`register_observer`]. Every lifecycle notification is fanned out to all
//! registered observers in registration order, each receiving the same
//! [`InteractionSet`] handle and execution id.
//!
//! The registry lives on the current thread, next to the context stack it
//! reports on.
//!
//! ## Observer panics
//!
//! A panicking observer does not cut the fan-out short: every registered
//! observer is still notified, then the first panic is resumed to whoever
//! triggered the notification. If the thread is already unwinding (an
//! `on_ended` fired for a panicking callback) observer panics are dropped
//! instead, so the callback's own panic reaches the caller.

use crate::interaction::InteractionSet;
use crate::registry::ExecutionId;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::thread;

/// Listener for the scheduled → starting → ended protocol of tracked work.
///
/// For one execution id, `on_scheduled` fires once and before anything else.
/// `on_starting` and `on_ended` always come in pairs, possibly several times
/// for a wrapped callable that is invoked repeatedly.
pub trait InteractionObserver {
    fn on_scheduled(&self, interactions: &InteractionSet, execution_id: ExecutionId);

    fn on_starting(&self, interactions: &InteractionSet, execution_id: ExecutionId);

    fn on_ended(&self, interactions: &InteractionSet, execution_id: ExecutionId);
}

thread_local! {
    static OBSERVERS: RefCell<Vec<Rc<dyn InteractionObserver>>> = const { RefCell::new(Vec::new()) };
}

/// Appends an observer to the current thread's registry.
pub fn register_observer(observer: Rc<dyn InteractionObserver>) {
    OBSERVERS.with(|observers| observers.borrow_mut().push(observer));
}

/// Snapshot of the registry, so observers may register further observers or
/// call back into the engine while being notified.
fn observers() -> Option<Vec<Rc<dyn InteractionObserver>>> {
    OBSERVERS.with(|observers| {
        let observers = observers.borrow();
        if observers.is_empty() {
            None
        } else {
            Some(observers.clone())
        }
    })
}

pub(crate) fn notify_scheduled(interactions: &InteractionSet, execution_id: ExecutionId) {
    fan_out(|observer| observer.on_scheduled(interactions, execution_id));
}

pub(crate) fn notify_starting(interactions: &InteractionSet, execution_id: ExecutionId) {
    fan_out(|observer| observer.on_starting(interactions, execution_id));
}

pub(crate) fn notify_ended(interactions: &InteractionSet, execution_id: ExecutionId) {
    fan_out(|observer| observer.on_ended(interactions, execution_id));
}

fn fan_out(notify: impl Fn(&dyn InteractionObserver)) {
    let Some(observers) = observers() else {
        return;
    };

    let mut failure = None;
    for observer in &observers {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref()))) {
            failure.get_or_insert(payload);
        }
    }

    if let Some(payload) = failure {
        if !thread::panicking() {
            panic::resume_unwind(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Interaction;
    use std::sync::Arc;

    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl InteractionObserver for Tagged {
        fn on_scheduled(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
            self.log
                .borrow_mut()
                .push(format!("{}:scheduled:{}:{}", self.tag, interactions, execution_id));
        }

        fn on_starting(&self, _: &InteractionSet, execution_id: ExecutionId) {
            self.log
                .borrow_mut()
                .push(format!("{}:starting:{}", self.tag, execution_id));
        }

        fn on_ended(&self, _: &InteractionSet, execution_id: ExecutionId) {
            self.log
                .borrow_mut()
                .push(format!("{}:ended:{}", self.tag, execution_id));
        }
    }

    #[test]
    fn test_notifications_follow_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        register_observer(Rc::new(Tagged { tag: "first", log: log.clone() }));
        register_observer(Rc::new(Tagged { tag: "second", log: log.clone() }));

        let set = InteractionSet::singleton(Interaction::new(0, Arc::from("click"), 0.0));
        notify_scheduled(&set, 3);
        notify_starting(&set, 3);
        notify_ended(&set, 3);

        assert_eq!(
            *log.borrow(),
            vec![
                "first:scheduled:[click]:3",
                "second:scheduled:[click]:3",
                "first:starting:3",
                "second:starting:3",
                "first:ended:3",
                "second:ended:3",
            ]
        );
    }

    struct Failing;

    impl InteractionObserver for Failing {
        fn on_scheduled(&self, _: &InteractionSet, _: ExecutionId) {
            panic!("scheduled");
        }

        fn on_starting(&self, _: &InteractionSet, _: ExecutionId) {}

        fn on_ended(&self, _: &InteractionSet, _: ExecutionId) {}
    }

    #[test]
    fn test_panicking_observer_does_not_skip_later_observers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        register_observer(Rc::new(Failing));
        register_observer(Rc::new(Tagged { tag: "after", log: log.clone() }));

        let set = InteractionSet::singleton(Interaction::new(0, Arc::from("click"), 0.0));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| notify_scheduled(&set, 5)));

        let payload = outcome.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"scheduled"));
        assert_eq!(*log.borrow(), vec!["after:scheduled:[click]:5"]);
    }

    #[test]
    fn test_no_observers_is_a_no_op() {
        assert!(observers().is_none());
        let set = InteractionSet::singleton(Interaction::new(0, Arc::from("idle"), 0.0));
        notify_scheduled(&set, 0);
        notify_ended(&set, 0);
    }
}
