//! I2S transmit channel abstraction

use crate::audio_config::I2sStdConfig;

/// A transmit channel of an I2S peripheral.
///
/// One value per hardware channel. The owner configures it once, toggles it
/// around a playback run and finally consumes it with [`I2sTx::delete`].
pub trait I2sTx {
    /// Error type
    type Error: core::fmt::Debug;

    /// Program the channel for standard (Philips/MSB) mode.
    ///
    /// Must be called while the channel is disabled.
    fn init_std_mode(
        &mut self,
        config: &I2sStdConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Start clocking data out.
    fn enable(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop clocking data out. Queued data that has not been sent is dropped.
    fn disable(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Queue raw little-endian PCM bytes for transmission.
    ///
    /// Waits, without timeout, until the peripheral's transfer queue has room,
    /// and returns the number of bytes accepted.
    fn write(
        &mut self,
        bytes: &[u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Release the channel and its DMA resources.
    fn delete(self) -> impl core::future::Future<Output = Result<(), Self::Error>>
    where
        Self: Sized;
}
