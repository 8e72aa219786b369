//! # Interaction Registry
//!
//! Issues the identities used by the rest of the crate. Both counters are
//! process-wide, start at zero and are never reused.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a single [`Interaction`](crate::Interaction).
pub type InteractionId = u64;

/// Identity correlating the scheduled/starting/ended notifications of one
/// logical unit of tracked work.
pub type ExecutionId = u64;

static NEXT_INTERACTION_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_EXECUTION_ID: AtomicU64 = AtomicU64::new(0);

/// Returns a fresh interaction id.
pub fn next_interaction_id() -> InteractionId {
    NEXT_INTERACTION_ID.fetch_add(1, Ordering::SeqCst)
}

/// Returns a fresh execution id.
pub fn next_execution_id() -> ExecutionId {
    NEXT_EXECUTION_ID.fetch_add(1, Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let first = next_interaction_id();
        let second = next_interaction_id();
        assert!(second > first);

        let first = next_execution_id();
        let second = next_execution_id();
        assert!(second > first);
    }

    #[test]
    fn test_counters_are_independent() {
        let execution = next_execution_id();
        next_interaction_id();
        next_interaction_id();
        // Other tests may run concurrently, so only ordering is guaranteed.
        assert!(next_execution_id() > execution);
    }
}
