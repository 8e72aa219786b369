//! # Clock Source
//!
//! Interactions are timestamped in milliseconds. The only requirement on the
//! source is that it never goes backwards within a run; wall-clock time is not
//! needed. The default [`MonotonicClock`] measures from the first read in the
//! process. Tests swap in [`ManualClock`](crate::mock::ManualClock) through
//! [`install_clock`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

/// A non-decreasing millisecond time source.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> f64;
}

/// Default clock backed by [`Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }
}

thread_local! {
    static CLOCK: RefCell<Option<Rc<dyn Clock>>> = const { RefCell::new(None) };
}

/// Replaces the clock used on the current thread.
pub fn install_clock(clock: Rc<dyn Clock>) {
    CLOCK.with(|slot| *slot.borrow_mut() = Some(clock));
}

/// Restores the default [`MonotonicClock`] on the current thread.
pub fn reset_clock() {
    CLOCK.with(|slot| *slot.borrow_mut() = None);
}

/// Reads the current thread's clock.
pub fn now() -> f64 {
    let installed = CLOCK.with(|slot| slot.borrow().clone());
    match installed {
        Some(clock) => clock.now(),
        None => MonotonicClock.now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ManualClock;

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock;
        let earlier = clock.now();
        let later = clock.now();
        assert!(later >= earlier);
    }

    #[test]
    fn test_installed_clock_is_used() {
        let clock = Rc::new(ManualClock::new(100.0));
        install_clock(clock.clone());
        assert_eq!(now(), 100.0);

        clock.advance(25.0);
        assert_eq!(now(), 125.0);

        reset_clock();
        let reading = now();
        assert!(reading.is_finite() && reading >= 0.0);
    }
}
