use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Level, Output, Speed};

use crate::clock;
use crate::hw::coil::HBridgeCoilDriver;

mod fault_task;
mod tick_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals { PA0, PA1, .. } = hal::init(config);

    // Both terminals released until the first marked slot comes around.
    let driver = HBridgeCoilDriver::new(
        Output::new(PA0, Level::Low, Speed::Low),
        Output::new(PA1, Level::Low, Speed::Low),
    );

    let scheduler = clock::wall_scheduler();
    let telemetry = clock::WindowTelemetry::new();

    defmt::info!(
        "vetinari clock up: {=usize} s window, generator state {=u16:x}",
        scheduler.seconds(),
        scheduler.generator_state()
    );

    spawner
        .spawn(tick_task::run(scheduler, driver, telemetry))
        .expect("failed to spawn tick task");

    spawner
        .spawn(fault_task::run())
        .expect("failed to spawn fault task");

    core::future::pending::<()>().await;
}
