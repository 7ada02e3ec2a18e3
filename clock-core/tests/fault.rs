//! Fault debounce behavior over repeated monitor passes.

use clock_core::fault::{DebounceOutcome, DebouncePolicy, FaultFlag, debounce};

/// Latch model: each acknowledge clears the flag, and a scripted schedule of
/// re-latches flips it back, mimicking an oscillator that keeps dropping out.
struct LatchModel {
    relatches_remaining: u32,
    set: bool,
}

impl LatchModel {
    fn faulted(relatches: u32) -> Self {
        Self {
            relatches_remaining: relatches,
            set: true,
        }
    }
}

impl FaultFlag for LatchModel {
    fn is_set(&self) -> bool {
        self.set
    }

    fn acknowledge(&mut self) {
        if self.relatches_remaining > 0 {
            self.relatches_remaining -= 1;
            self.set = true;
        } else {
            self.set = false;
        }
    }
}

#[test]
fn flaky_oscillator_clears_within_the_default_budget() {
    let mut latch = LatchModel::faulted(5);
    let policy = DebouncePolicy::new(16, DebouncePolicy::DEFAULT_MAX_ATTEMPTS);

    let outcome = debounce(&mut latch, &policy);

    assert_eq!(outcome, DebounceOutcome::Cleared { attempts: 6 });
    assert!(!latch.is_set());
}

#[test]
fn dead_oscillator_exhausts_the_budget_and_can_be_retried() {
    let mut latch = LatchModel::faulted(u32::MAX);
    let policy = DebouncePolicy::new(0, 4);

    // First pass exhausts the budget without clearing the fault.
    assert_eq!(debounce(&mut latch, &policy), DebounceOutcome::StillFaulted);
    assert!(latch.is_set());

    // A later pass, after the fault actually goes away, succeeds: the
    // monitor re-arms rather than wedging after one failed pass.
    latch.relatches_remaining = 1;
    let outcome = debounce(&mut latch, &policy);
    assert_eq!(outcome, DebounceOutcome::Cleared { attempts: 2 });
}

#[test]
fn settle_budget_is_observable_through_the_policy() {
    let policy = DebouncePolicy::default();
    assert_eq!(policy.settle_spins(), DebouncePolicy::DEFAULT_SETTLE_SPINS);
    assert_eq!(policy.max_attempts(), DebouncePolicy::DEFAULT_MAX_ATTEMPTS);

    let custom = DebouncePolicy::new(64, 2);
    assert_eq!(custom.settle_spins(), 64);
    assert_eq!(custom.max_attempts(), 2);
}
