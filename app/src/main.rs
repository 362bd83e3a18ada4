#![no_std]
#![no_main]

mod heartbeat;
mod led;

use cortex_m_rt::entry;
use kernel::AutoStart;

use defmt_rtt as _;
use panic_probe as _;

static mut HEARTBEAT: heartbeat::LedHeartbeat = heartbeat::LedHeartbeat::new();

fn idle_task() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

fn sensor_task() -> ! {
    loop {
        defmt::info!("sensor tick, clock = {}", kernel::get_clock());
        kernel::delay(200);
    }
}

fn watchdog_task() -> ! {
    loop {
        kernel::delay(1000);
        defmt::debug!("watchdog pass, clock = {}", kernel::get_clock());
    }
}

#[entry]
fn main() -> ! {
    led::init_heartbeat_led();

    kernel::create_task(sensor_task, 2, AutoStart::AutoStart);
    kernel::create_task(watchdog_task, 1, AutoStart::AutoStart);

    // SAFETY: runs once, before `start_scheduler` enables the tick
    // interrupt that would otherwise race this registration.
    #[allow(static_mut_refs)]
    unsafe {
        kernel::heartbeat::register(&mut HEARTBEAT);
    }

    kernel::start_scheduler(idle_task);
}
