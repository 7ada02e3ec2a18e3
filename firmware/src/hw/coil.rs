//! H-bridge coil driver for the bistable stepper movement.
//!
//! One pulse energizes a single terminal for [`ENERGIZE_TIME`] and releases
//! it; the scheduler alternates terminals between pulses so the movement
//! advances. The waveform blocks inside the tick handler on purpose: tick
//! events are gated by the idle-wake cycle, so nothing can preempt it.

use clock_core::scheduler::{CoilDriver, CoilTerminal};
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, block_for};

/// How long a terminal stays energized per pulse. Depends on the clock
/// movement model.
pub const ENERGIZE_TIME: Duration = Duration::from_millis(50);

/// Push-pull GPIO pair driving the two coil terminals.
pub struct HBridgeCoilDriver<'d> {
    terminal_a: Output<'d>,
    terminal_b: Output<'d>,
}

impl<'d> HBridgeCoilDriver<'d> {
    /// Wraps the two terminal outputs; both must start released (low).
    pub fn new(terminal_a: Output<'d>, terminal_b: Output<'d>) -> Self {
        Self {
            terminal_a,
            terminal_b,
        }
    }

    fn output_mut(&mut self, terminal: CoilTerminal) -> &mut Output<'d> {
        match terminal {
            CoilTerminal::A => &mut self.terminal_a,
            CoilTerminal::B => &mut self.terminal_b,
        }
    }
}

impl CoilDriver for HBridgeCoilDriver<'_> {
    fn pulse(&mut self, terminal: CoilTerminal) {
        let output = self.output_mut(terminal);
        output.set_high();
        block_for(ENERGIZE_TIME);
        output.set_low();
    }
}
