//! Firmware-facing clock types shared by the runtime tasks and host tests.
//!
//! Everything here compiles on the host so the wall-clock configuration can
//! be exercised without the MCU toolchain; only the `runtime` and `hw`
//! modules are target-gated.

#![allow(dead_code)]

use clock_core::fault::FaultFlag;
use clock_core::pattern::{PATTERN_BYTES, SECONDS_PER_WINDOW};
use clock_core::rng::DEFAULT_SEED;
use clock_core::scheduler::{ClockScheduler, TICK_PERIOD_MS};
use clock_core::telemetry::StatsRecorder;
use embassy_time::Duration;
use portable_atomic::{AtomicBool, Ordering};

/// Interval between scheduler wake-ups; the contract with the tick timer.
pub const TICK_PERIOD: Duration = Duration::from_millis(TICK_PERIOD_MS);

/// Scheduler sized for the production 64-second window.
pub type WallScheduler = ClockScheduler<PATTERN_BYTES>;

/// Window statistics ring used by the tick task.
pub type WindowTelemetry = StatsRecorder;

/// Builds the production scheduler with the power-on seed.
#[must_use]
pub fn wall_scheduler() -> WallScheduler {
    ClockScheduler::new(DEFAULT_SEED, SECONDS_PER_WINDOW)
}

/// Oscillator-fault latch, set from the fault interrupt and consumed by the
/// fault task. Independent of all scheduler state.
pub static OSC_FAULT_LATCH: AtomicBool = AtomicBool::new(false);

/// [`FaultFlag`] view over [`OSC_FAULT_LATCH`].
pub struct OscFaultLatch;

impl FaultFlag for OscFaultLatch {
    fn is_set(&self) -> bool {
        OSC_FAULT_LATCH.load(Ordering::Acquire)
    }

    fn acknowledge(&mut self) {
        OSC_FAULT_LATCH.store(false, Ordering::Release);
    }
}
