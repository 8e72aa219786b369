//! Property tests for context restoration under arbitrary nesting.
//!
//! For any depth of nested `track` calls, optionally failing at any level and
//! optionally running under an ambient interaction, the context after the
//! outermost call equals the context before it, and every started execution
//! ends exactly once.

#![cfg(feature = "profiling")]

use interaction_tracking::mock::RecordingObserver;
use interaction_tracking::{get_current, register_observer, track, wrap};
use proptest::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

thread_local! {
    static RECORDER: Rc<RecordingObserver> = {
        let recorder = Rc::new(RecordingObserver::new());
        register_observer(recorder.clone());
        recorder
    };
}

fn recorder() -> Rc<RecordingObserver> {
    RECORDER.with(Rc::clone)
}

/// Nests `depth - level` tracked spans, panicking at `fail_at`. Each level
/// checks that it sees exactly one more interaction than its parent.
fn nest(level: usize, depth: usize, fail_at: Option<usize>, parent_len: usize) {
    if level == depth {
        return;
    }
    track(format!("span-{level}"), || {
        let current = get_current().map(|set| set.len()).unwrap_or(0);
        assert_eq!(current, parent_len + 1);
        if fail_at == Some(level) {
            panic!("failure at level {level}");
        }
        nest(level + 1, depth, fail_at, current);
        assert_eq!(get_current().map(|set| set.len()), Some(current));
    });
}

fn run(depth: usize, fail_at: Option<usize>) -> bool {
    let parent_len = get_current().map(|set| set.len()).unwrap_or(0);
    panic::catch_unwind(AssertUnwindSafe(|| nest(0, depth, fail_at, parent_len))).is_ok()
}

fn arb_case() -> impl Strategy<Value = (usize, Option<usize>, bool)> {
    (1usize..8).prop_flat_map(|depth| {
        (
            Just(depth),
            proptest::option::of(0..depth),
            any::<bool>(),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn nested_tracks_restore_context((depth, fail_at, ambient) in arb_case()) {
        let recorder = recorder();
        recorder.clear();

        let (before, completed, after) = if ambient {
            track("ambient", || {
                let before = get_current();
                let completed = run(depth, fail_at);
                (before, completed, get_current())
            })
        } else {
            let before = get_current();
            let completed = run(depth, fail_at);
            (before, completed, get_current())
        };

        prop_assert_eq!(completed, fail_at.is_none());
        prop_assert_eq!(before, after);
        prop_assert!(get_current().is_none());
        recorder.verify_paired();
    }

    #[test]
    fn wrapped_calls_restore_caller_context(depth in 1usize..6, fail in any::<bool>()) {
        let recorder = recorder();
        recorder.clear();

        let wrapped = track("origin", || wrap(move || {
            if fail {
                panic!("deferred failure");
            }
            nest(0, depth, None, 1);
        }));

        let after = track("caller", || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| wrapped.call()));
            prop_assert_eq!(outcome.is_ok(), !fail);
            Ok(get_current())
        })?;

        prop_assert_eq!(after.map(|set| set.names().join("/")), Some("caller".to_string()));
        recorder.verify_paired();
    }
}
