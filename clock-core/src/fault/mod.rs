//! Bounded debounce for the oscillator-fault path.
//!
//! The fault monitor runs outside the tick scheduler and shares no state with
//! it: when the fault interrupt fires, the handler acknowledges the latched
//! flag, waits a fixed settle budget, and checks whether the fault re-latched.
//! The retry budget is explicit so the debounce duration is configurable and
//! the loop is testable, unlike a raw countdown spin.

/// Latched hardware fault flag as seen by the debounce loop.
pub trait FaultFlag {
    /// Returns `true` while the fault condition is latched.
    fn is_set(&self) -> bool;

    /// Clears the latch; hardware re-sets it if the fault persists.
    fn acknowledge(&mut self);
}

/// Budget applied to one debounce pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DebouncePolicy {
    settle_spins: u32,
    max_attempts: u32,
}

impl DebouncePolicy {
    /// Settle budget matching the original hand-tuned countdown.
    pub const DEFAULT_SETTLE_SPINS: u32 = 0xFFF;

    /// Attempts before the pass gives up and reports a persistent fault.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

    /// Creates a policy with explicit budgets.
    #[must_use]
    pub const fn new(settle_spins: u32, max_attempts: u32) -> Self {
        Self {
            settle_spins,
            max_attempts,
        }
    }

    /// Spin iterations between acknowledging the flag and re-checking it.
    #[must_use]
    pub const fn settle_spins(&self) -> u32 {
        self.settle_spins
    }

    /// Maximum acknowledge-and-recheck attempts per pass.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SETTLE_SPINS, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Result of one debounce pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DebounceOutcome {
    /// Fault stayed clear after `attempts` acknowledge cycles.
    Cleared {
        /// Acknowledge cycles consumed, starting at 1.
        attempts: u32,
    },
    /// Fault re-latched on every attempt within the budget.
    StillFaulted,
}

impl DebounceOutcome {
    /// Returns `true` when the fault cleared within the budget.
    #[must_use]
    pub const fn is_cleared(self) -> bool {
        matches!(self, DebounceOutcome::Cleared { .. })
    }
}

/// Runs one bounded debounce pass over `flag`.
///
/// Each attempt acknowledges the latch, burns the settle budget so slow
/// hardware has time to re-assert, and re-checks. A zero attempt budget
/// reports [`DebounceOutcome::StillFaulted`] without touching the flag.
pub fn debounce<F: FaultFlag>(flag: &mut F, policy: &DebouncePolicy) -> DebounceOutcome {
    for attempt in 1..=policy.max_attempts() {
        flag.acknowledge();

        for _ in 0..policy.settle_spins() {
            core::hint::spin_loop();
        }

        if !flag.is_set() {
            return DebounceOutcome::Cleared { attempts: attempt };
        }
    }

    DebounceOutcome::StillFaulted
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flag that re-latches a fixed number of times before staying clear.
    struct ScriptedFlag {
        relatch_count: u32,
        set: bool,
        acknowledges: u32,
    }

    impl ScriptedFlag {
        fn new(relatch_count: u32) -> Self {
            Self {
                relatch_count,
                set: true,
                acknowledges: 0,
            }
        }
    }

    impl FaultFlag for ScriptedFlag {
        fn is_set(&self) -> bool {
            self.set
        }

        fn acknowledge(&mut self) {
            self.acknowledges += 1;
            self.set = self.acknowledges <= self.relatch_count;
        }
    }

    #[test]
    fn clears_on_first_attempt_when_fault_is_transient() {
        let mut flag = ScriptedFlag::new(0);
        let outcome = debounce(&mut flag, &DebouncePolicy::new(4, 8));

        assert_eq!(outcome, DebounceOutcome::Cleared { attempts: 1 });
        assert_eq!(flag.acknowledges, 1);
    }

    #[test]
    fn retries_until_the_fault_stops_relatching() {
        let mut flag = ScriptedFlag::new(3);
        let outcome = debounce(&mut flag, &DebouncePolicy::new(0, 8));

        assert_eq!(outcome, DebounceOutcome::Cleared { attempts: 4 });
        assert_eq!(flag.acknowledges, 4);
    }

    #[test]
    fn reports_persistent_fault_once_the_budget_is_spent() {
        let mut flag = ScriptedFlag::new(u32::MAX);
        let outcome = debounce(&mut flag, &DebouncePolicy::new(0, 5));

        assert_eq!(outcome, DebounceOutcome::StillFaulted);
        assert!(!outcome.is_cleared());
        assert_eq!(flag.acknowledges, 5);
    }

    #[test]
    fn zero_attempt_budget_reports_without_touching_the_flag() {
        let mut flag = ScriptedFlag::new(0);
        let outcome = debounce(&mut flag, &DebouncePolicy::new(0, 0));

        assert_eq!(outcome, DebounceOutcome::StillFaulted);
        assert_eq!(flag.acknowledges, 0);
    }
}
