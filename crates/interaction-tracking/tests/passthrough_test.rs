//! Behavior with the `profiling` feature disabled:
//! `cargo test -p interaction-tracking --no-default-features`.

#![cfg(not(feature = "profiling"))]

use interaction_tracking::mock::RecordingObserver;
use interaction_tracking::{
    get_current, register_observer, reserve_continuation, start_continuation, track, wrap,
};
use std::rc::Rc;

#[test]
fn test_track_runs_callback_untracked() {
    let recorder = Rc::new(RecordingObserver::new());
    register_observer(recorder.clone());

    let seen = track("some event", get_current);

    assert!(seen.is_none());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_wrap_and_continuations_are_inert() {
    let wrapped = track("some event", || wrap(|| get_current().is_none()));
    assert!(!wrapped.is_tracked());
    assert!(wrapped.call());

    assert!(track("some event", reserve_continuation).is_none());
    assert_eq!(start_continuation(None), Ok(()));
}
