//! Per-window statistics retained in a fixed-size ring buffer.
//!
//! The scheduler records one entry each time a window completes, giving host
//! tooling and firmware diagnostics a short history of how the pattern
//! builder behaved without any allocation.

use heapless::{HistoryBuf, OldestOrdered};

use crate::pattern::BuildReport;

/// Number of completed windows retained in memory.
pub const STATS_RING_CAPACITY: usize = 32;

/// Summary of one completed sequence window.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WindowStats {
    /// 1-based index of the completed window since start-up.
    pub window: u32,
    /// Pulses emitted during the window; always the window length in seconds.
    pub pulses: u16,
    /// Generator draws the window's pattern build consumed.
    pub draws: u32,
    /// Draws discarded as collisions during the build.
    pub collisions: u32,
}

/// Records window summaries into a fixed-size ring buffer.
pub struct StatsRecorder<const CAPACITY: usize = STATS_RING_CAPACITY> {
    ring: HistoryBuf<WindowStats, CAPACITY>,
}

impl<const CAPACITY: usize> StatsRecorder<CAPACITY> {
    /// Creates a recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
        }
    }

    /// Records the completion of window `window`, built by `build`.
    pub fn record_window(&mut self, window: u32, pulses: u16, build: BuildReport) {
        self.ring.write(WindowStats {
            window,
            pulses,
            draws: build.draws,
            collisions: build.collisions,
        });
    }

    /// Returns the most recent window summary, if any.
    pub fn latest(&self) -> Option<&WindowStats> {
        self.ring.recent()
    }

    /// Returns an iterator over retained summaries in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, WindowStats> {
        self.ring.oldest_ordered()
    }

    /// Returns the number of summaries currently retained.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no windows have completed yet.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<const CAPACITY: usize> Default for StatsRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
