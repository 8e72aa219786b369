//! # Test Tooling
//!
//! In-memory stand-ins for the two external collaborators of the engine: an
//! observer that records everything it is told, and a clock the test drives.
//!
//! ```
//! use interaction_tracking::mock::{Notification, RecordingObserver};
//! use interaction_tracking::{register_observer, track};
//! use std::rc::Rc;
//!
//! let recorder = Rc::new(RecordingObserver::new());
//! register_observer(recorder.clone());
//!
//! track("click", || {});
//!
//! let kinds: Vec<_> = recorder.events().iter().map(|event| event.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![Notification::Scheduled, Notification::Starting, Notification::Ended]
//! );
//! recorder.verify_paired();
//! ```

use crate::clock::Clock;
use crate::interaction::InteractionSet;
use crate::observer::InteractionObserver;
use crate::registry::ExecutionId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Which lifecycle callback was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Scheduled,
    Starting,
    Ended,
}

/// One recorded notification.
#[derive(Debug, Clone)]
pub struct ObservedEvent {
    pub kind: Notification,
    pub execution_id: ExecutionId,
    pub interactions: InteractionSet,
}

impl ObservedEvent {
    pub fn names(&self) -> Vec<String> {
        self.interactions
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Observer that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.borrow().clone()
    }

    /// Notifications of one kind, in order.
    pub fn events_of(&self, kind: Notification) -> Vec<ObservedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }

    /// Notifications for one execution id, in order.
    pub fn events_for(&self, execution_id: ExecutionId) -> Vec<ObservedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.execution_id == execution_id)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Panics unless the recorded stream obeys the lifecycle protocol:
    /// every id is scheduled before it starts, and every `Starting` is
    /// matched by an `Ended` with the same id and the same interactions.
    pub fn verify_paired(&self) {
        let events = self.events.borrow();
        let mut scheduled = HashMap::new();
        let mut open: HashMap<ExecutionId, Vec<&InteractionSet>> = HashMap::new();

        for event in events.iter() {
            match event.kind {
                Notification::Scheduled => {
                    scheduled.insert(event.execution_id, &event.interactions);
                }
                Notification::Starting => {
                    if !scheduled.contains_key(&event.execution_id) {
                        panic!("Execution {} started before being scheduled", event.execution_id);
                    }
                    open.entry(event.execution_id)
                        .or_default()
                        .push(&event.interactions);
                }
                Notification::Ended => {
                    let started = open
                        .get_mut(&event.execution_id)
                        .and_then(|stack| stack.pop());
                    match started {
                        Some(interactions) if *interactions == event.interactions => {}
                        Some(_) => panic!(
                            "Execution {} ended with different interactions",
                            event.execution_id
                        ),
                        None => panic!(
                            "Execution {} ended without starting",
                            event.execution_id
                        ),
                    }
                }
            }
        }

        let dangling: Vec<_> = open
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(id, _)| *id)
            .collect();
        if !dangling.is_empty() {
            panic!("Executions started but never ended: {:?}", dangling);
        }
    }

    fn record(&self, kind: Notification, interactions: &InteractionSet, execution_id: ExecutionId) {
        self.events.borrow_mut().push(ObservedEvent {
            kind,
            execution_id,
            interactions: interactions.clone(),
        });
    }
}

impl InteractionObserver for RecordingObserver {
    fn on_scheduled(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        self.record(Notification::Scheduled, interactions, execution_id);
    }

    fn on_starting(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        self.record(Notification::Starting, interactions, execution_id);
    }

    fn on_ended(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        self.record(Notification::Ended, interactions, execution_id);
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, millis: f64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
