//! System lifecycle control.

/// Delay and restart, the only two things the application asks of the system.
pub trait SystemControl {
    /// Wait for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32) -> impl core::future::Future<Output = ()>;

    /// Restart the device. Never returns.
    fn restart(&mut self) -> !;
}
