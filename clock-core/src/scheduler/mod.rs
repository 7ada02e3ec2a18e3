//! Window scheduler that turns fixed-rate timer ticks into coil pulses.
//!
//! An external 4 Hz timer wakes the owner once per quarter second; each wake
//! calls [`ClockScheduler::advance`] exactly once. The scheduler looks up the
//! current slot in the active tick pattern, pulses the coil through the
//! [`CoilDriver`] seam when the slot is marked, and rebuilds the pattern in
//! place whenever the window wraps. Tick handling is synchronous and runs to
//! completion before the owner suspends again, so no state here needs
//! locking.

use core::num::NonZeroU16;

use crate::pattern::{self, BuildReport, PATTERN_BYTES, TICKS_PER_SECOND, TickPattern};
use crate::rng::Lfsr;
use crate::telemetry::StatsRecorder;

/// Interval between scheduler ticks in milliseconds (4 Hz).
pub const TICK_PERIOD_MS: u64 = 1_000 / TICKS_PER_SECOND as u64;

/// H-bridge coil terminal energized by a pulse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoilTerminal {
    A,
    B,
}

impl CoilTerminal {
    /// Returns the other terminal.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            CoilTerminal::A => CoilTerminal::B,
            CoilTerminal::B => CoilTerminal::A,
        }
    }

    /// Short label for logs and host rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CoilTerminal::A => "A",
            CoilTerminal::B => "B",
        }
    }
}

/// Abstraction over the physical coil driver.
pub trait CoilDriver {
    /// Performs one complete pulse: energize `terminal` for the hardware's
    /// energize duration, then release it. Blocking is expected; the
    /// scheduler finishes the tick only after the waveform completes.
    fn pulse(&mut self, terminal: CoilTerminal);
}

/// Coil driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopCoilDriver;

impl NoopCoilDriver {
    /// Creates a new no-op coil driver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CoilDriver for NoopCoilDriver {
    fn pulse(&mut self, _: CoilTerminal) {}
}

/// What one scheduler tick did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TickOutcome {
    /// Slot index the tick examined, in `[0, 4 * seconds)`.
    pub slot: u16,
    /// Terminal pulsed during this tick, if the slot was marked.
    pub pulse: Option<CoilTerminal>,
    /// `true` when this tick closed the window and rebuilt the pattern.
    pub window_completed: bool,
}

/// Scheduler context holding every piece of clock state.
///
/// The original firmware kept all of this in process-wide statics; owning it
/// in one struct lets hosts and tests drive the clock without hardware.
pub struct ClockScheduler<const BYTES: usize = PATTERN_BYTES> {
    rng: Lfsr,
    pattern: TickPattern<BYTES>,
    seconds: usize,
    slot_count: u16,
    cursor: u16,
    polarity: CoilTerminal,
    windows_completed: u32,
    last_build: BuildReport,
}

impl<const BYTES: usize> ClockScheduler<BYTES> {
    /// Creates a scheduler for a `seconds`-long window and builds the first
    /// pattern immediately.
    ///
    /// # Panics
    ///
    /// Panics when `seconds` violates the pattern builder's preconditions
    /// (nonzero power of two, `4 * seconds` within the pattern capacity).
    #[must_use]
    pub fn new(seed: NonZeroU16, seconds: usize) -> Self {
        let mut rng = Lfsr::new(seed);
        let mut tick_pattern = TickPattern::new();
        let last_build = pattern::rebuild(&mut tick_pattern, &mut rng, seconds);
        let slot_count = u16::try_from(seconds * TICKS_PER_SECOND)
            .expect("window slot count fits in a u16");

        Self {
            rng,
            pattern: tick_pattern,
            seconds,
            slot_count,
            cursor: 0,
            polarity: CoilTerminal::A,
            windows_completed: 0,
            last_build,
        }
    }

    /// Window length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> usize {
        self.seconds
    }

    /// Slot the next tick will examine.
    #[must_use]
    pub const fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Terminal the next pulse will energize.
    #[must_use]
    pub const fn next_polarity(&self) -> CoilTerminal {
        self.polarity
    }

    /// Windows completed since construction.
    #[must_use]
    pub const fn windows_completed(&self) -> u32 {
        self.windows_completed
    }

    /// Current generator state, exposed for determinism checks.
    #[must_use]
    pub const fn generator_state(&self) -> u16 {
        self.rng.state()
    }

    /// Build accounting for the pattern currently being played.
    #[must_use]
    pub const fn last_build(&self) -> BuildReport {
        self.last_build
    }

    /// Read-only view of the active tick pattern.
    #[must_use]
    pub const fn pattern(&self) -> &TickPattern<BYTES> {
        &self.pattern
    }

    /// Processes one external timer tick.
    ///
    /// Pulses the coil when the current slot is marked, alternating the
    /// terminal per pulse, then advances the cursor. When the cursor reaches
    /// the end of the window it wraps to zero, the completed window is
    /// recorded into `telemetry`, and the pattern is rebuilt carrying the
    /// generator state forward.
    pub fn advance<D, const CAPACITY: usize>(
        &mut self,
        driver: &mut D,
        telemetry: &mut StatsRecorder<CAPACITY>,
    ) -> TickOutcome
    where
        D: CoilDriver,
    {
        let slot = self.cursor;

        let pulse = if self.pattern.contains(usize::from(slot)) {
            let terminal = self.polarity;
            driver.pulse(terminal);
            self.polarity = terminal.opposite();
            Some(terminal)
        } else {
            None
        };

        self.cursor += 1;
        let window_completed = self.cursor == self.slot_count;
        if window_completed {
            self.cursor = 0;
            self.windows_completed += 1;
            telemetry.record_window(
                self.windows_completed,
                self.seconds as u16,
                self.last_build,
            );
            self.last_build = pattern::rebuild(&mut self.pattern, &mut self.rng, self.seconds);
        }

        TickOutcome {
            slot,
            pulse,
            window_completed,
        }
    }
}
