//! Delay and reset on the board.

use embassy_time::Timer;
use platform::system::SystemControl;

/// Board system control.
pub struct BoardSystem;

impl SystemControl for BoardSystem {
    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }

    fn restart(&mut self) -> ! {
        defmt::info!("Restarting now.");
        cortex_m::peripheral::SCB::sys_reset()
    }
}
