use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use clock_core::fault::{DebounceOutcome, DebouncePolicy, debounce};

use crate::clock::OscFaultLatch;

/// Raised by the clock-security interrupt when the oscillator drops out.
/// The interrupt also sets [`crate::clock::OSC_FAULT_LATCH`] before
/// signaling.
pub static OSC_FAULT: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Debounces oscillator faults and re-arms for the next one.
///
/// Runs independently of the tick task and shares no scheduler state; the
/// scheduler assumes wake events stay reliable once the fault clears.
#[embassy_executor::task]
pub async fn run() -> ! {
    let policy = DebouncePolicy::default();

    loop {
        OSC_FAULT.wait().await;

        match debounce(&mut OscFaultLatch, &policy) {
            DebounceOutcome::Cleared { attempts } => {
                defmt::info!("oscillator fault cleared after {=u32} attempts", attempts);
            }
            DebounceOutcome::StillFaulted => {
                defmt::warn!("oscillator fault persisted past the debounce budget");
            }
        }
    }
}
