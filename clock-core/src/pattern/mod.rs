//! Tick pattern storage and the rejection-sampling builder.
//!
//! A window of `N` seconds is divided into `4 * N` quarter-second slots. The
//! builder marks exactly `N` of those slots, so the movement still advances
//! `N` times per window and stays time-accurate while individual "seconds"
//! stretch anywhere from 250 ms to nearly the whole window.

use crate::rng::Lfsr;

/// Scheduler ticks per wall-clock second, fixed by the external timer.
pub const TICKS_PER_SECOND: usize = 4;

/// Window length in seconds. Must be a power of two so the slot count can be
/// used as a draw mask.
pub const SECONDS_PER_WINDOW: usize = 64;

/// Quarter-second slots per window.
pub const SLOTS_PER_WINDOW: usize = SECONDS_PER_WINDOW * TICKS_PER_SECOND;

/// Backing storage for the wall-clock window, one bit per slot.
pub const PATTERN_BYTES: usize = SLOTS_PER_WINDOW / 8;

/// Fixed-size bit-set with one bit per tick slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TickPattern<const BYTES: usize = PATTERN_BYTES> {
    bits: [u8; BYTES],
}

impl<const BYTES: usize> TickPattern<BYTES> {
    /// Creates a pattern with every slot clear.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: [0; BYTES] }
    }

    /// Number of slots this pattern can address.
    #[must_use]
    pub const fn capacity() -> usize {
        BYTES * 8
    }

    /// Returns `true` when the slot is marked for a pulse.
    #[must_use]
    pub const fn contains(&self, slot: usize) -> bool {
        self.bits[slot >> 3] & (1 << (slot & 0x7)) != 0
    }

    /// Marks a slot for a pulse.
    pub const fn set(&mut self, slot: usize) {
        self.bits[slot >> 3] |= 1 << (slot & 0x7);
    }

    /// Clears every slot.
    pub fn clear_all(&mut self) {
        self.bits = [0; BYTES];
    }

    /// Counts the marked slots.
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.bits
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum()
    }

    /// Iterates over the marked slot indices in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::capacity()).filter(|slot| self.contains(*slot))
    }
}

impl<const BYTES: usize> Default for TickPattern<BYTES> {
    fn default() -> Self {
        Self::new()
    }
}

/// Accounting for one pattern build, used by telemetry and tests.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BuildReport {
    /// Generator draws consumed, including discarded ones.
    pub draws: u32,
    /// Draws discarded because the candidate slot was already marked.
    pub collisions: u32,
}

/// Rebuilds `pattern` in place with exactly `seconds` marked slots at
/// distinct pseudo-random positions in `[0, 4 * seconds)`.
///
/// The generator advances once per draw and its state carries into the next
/// rebuild. The rejection loop has no iteration cap; it terminates because
/// the slot space is held at four times the fill target, so occupancy never
/// exceeds 25%.
///
/// # Panics
///
/// Panics when `seconds` is zero, not a power of two, or when `4 * seconds`
/// exceeds the pattern's capacity.
pub fn rebuild<const BYTES: usize>(
    pattern: &mut TickPattern<BYTES>,
    rng: &mut Lfsr,
    seconds: usize,
) -> BuildReport {
    assert!(
        seconds != 0 && seconds.is_power_of_two(),
        "window length must be a nonzero power of two"
    );
    let slots = seconds * TICKS_PER_SECOND;
    assert!(
        slots <= TickPattern::<BYTES>::capacity(),
        "pattern storage too small for the window"
    );

    // The full 16-bit draw is masked down rather than reseeded per window so
    // the register walks a longer chain before the pattern stream repeats.
    let mask = (slots - 1) as u16;

    pattern.clear_all();
    let mut report = BuildReport::default();
    let mut remaining = seconds;

    while remaining > 0 {
        let draw = rng.next_value();
        report.draws += 1;

        let slot = usize::from(draw & mask);
        if pattern.contains(slot) {
            report.collisions += 1;
            continue;
        }

        pattern.set(slot);
        remaining -= 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroU16;

    #[test]
    fn empty_pattern_has_no_marks() {
        let pattern = TickPattern::<PATTERN_BYTES>::new();
        assert_eq!(pattern.count_set(), 0);
        assert!(!pattern.contains(0));
        assert!(!pattern.contains(SLOTS_PER_WINDOW - 1));
    }

    #[test]
    fn set_and_contains_agree_across_byte_boundaries() {
        let mut pattern = TickPattern::<PATTERN_BYTES>::new();
        for slot in [0, 7, 8, 15, 100, SLOTS_PER_WINDOW - 1] {
            pattern.set(slot);
            assert!(pattern.contains(slot));
        }
        assert_eq!(pattern.count_set(), 6);
        let marked: heapless::Vec<usize, 8> = pattern.iter_set().collect();
        assert_eq!(marked.as_slice(), &[0, 7, 8, 15, 100, SLOTS_PER_WINDOW - 1]);
    }

    #[test]
    fn rebuild_marks_exactly_one_slot_per_second() {
        let mut pattern = TickPattern::<PATTERN_BYTES>::new();
        let mut rng = Lfsr::default();

        for _ in 0..16 {
            let report = rebuild(&mut pattern, &mut rng, SECONDS_PER_WINDOW);
            assert_eq!(pattern.count_set(), SECONDS_PER_WINDOW);
            assert_eq!(
                report.draws,
                report.collisions + SECONDS_PER_WINDOW as u32,
                "every draw either marks a slot or collides"
            );
        }
    }

    #[test]
    fn rebuild_is_deterministic_for_a_fixed_seed() {
        let seed = NonZeroU16::new(0xBEEF).unwrap();

        let mut first = TickPattern::<PATTERN_BYTES>::new();
        let mut rng_a = Lfsr::new(seed);
        rebuild(&mut first, &mut rng_a, SECONDS_PER_WINDOW);

        let mut second = TickPattern::<PATTERN_BYTES>::new();
        let mut rng_b = Lfsr::new(seed);
        rebuild(&mut second, &mut rng_b, SECONDS_PER_WINDOW);

        assert_eq!(first, second);
        assert_eq!(rng_a.state(), rng_b.state());
    }

    #[test]
    fn single_second_window_marks_one_of_four_slots() {
        let mut pattern = TickPattern::<1>::new();
        let mut rng = Lfsr::default();

        let report = rebuild(&mut pattern, &mut rng, 1);
        assert_eq!(pattern.count_set(), 1);
        assert_eq!(report.collisions, 0);
        let slot = pattern.iter_set().next().unwrap();
        assert!(slot < 4);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rebuild_rejects_non_power_of_two_windows() {
        let mut pattern = TickPattern::<PATTERN_BYTES>::new();
        let mut rng = Lfsr::default();
        rebuild(&mut pattern, &mut rng, 48);
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn rebuild_rejects_oversized_windows() {
        let mut pattern = TickPattern::<1>::new();
        let mut rng = Lfsr::default();
        rebuild(&mut pattern, &mut rng, 4);
    }
}
