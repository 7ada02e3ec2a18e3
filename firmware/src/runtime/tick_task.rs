use embassy_time::Ticker;

use crate::clock::{TICK_PERIOD, WallScheduler, WindowTelemetry};
use crate::hw::coil::HBridgeCoilDriver;

/// Periodic 4 Hz wake source driving the scheduler.
///
/// Each wake handles exactly one tick to completion, including the blocking
/// coil waveform, before suspending again.
#[embassy_executor::task]
pub async fn run(
    mut scheduler: WallScheduler,
    mut driver: HBridgeCoilDriver<'static>,
    mut telemetry: WindowTelemetry,
) -> ! {
    let mut ticker = Ticker::every(TICK_PERIOD);

    loop {
        ticker.next().await;

        let outcome = scheduler.advance(&mut driver, &mut telemetry);

        if let Some(terminal) = outcome.pulse {
            defmt::trace!(
                "tick: slot {=u16} terminal {=str}",
                outcome.slot,
                terminal.label()
            );
        }

        if outcome.window_completed
            && let Some(stats) = telemetry.latest()
        {
            defmt::info!(
                "window {=u32} complete: {=u16} pulses, {=u32} draws ({=u32} collisions)",
                stats.window,
                stats.pulses,
                stats.draws,
                stats.collisions
            );
        }
    }
}
