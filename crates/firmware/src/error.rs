//! Error types of the player.
//!
//! Every failure is fatal. Each step returns its own error; [`FatalError`]
//! wraps them so the top-level sequencer can propagate with `?` and hand a
//! single value to the restart handler. Driver error payloads are logged
//! where they occur and not carried further.

use platform::audio_config::I2sConfigError;
use platform::storage_config::StorageConfigError;
use playback::StreamError;

/// SD card bring-up failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdCardError {
    /// The board configuration is inconsistent.
    #[error("invalid SD card configuration: {0}")]
    Config(#[from] StorageConfigError),
    /// The SPI bus could not be initialised.
    #[error("failed to initialize bus")]
    BusInit,
    /// The card answered but no FAT volume could be mounted.
    #[error("failed to mount filesystem")]
    FilesystemMount,
    /// The card did not initialise.
    #[error("failed to initialize the card")]
    CardInit,
}

/// I2S channel setup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sSetupError {
    /// The profile's configuration is inconsistent with the pins.
    #[error("invalid I2S configuration: {0}")]
    Config(#[from] I2sConfigError),
    /// The peripheral rejected the configuration.
    #[error("I2S driver rejected std mode")]
    Driver,
}

/// Playback failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayError {
    /// The file could not be opened. Nothing was sent to the channel.
    #[error("failed to open file")]
    Open,
    /// Seeking or reading failed.
    #[error("file read failed")]
    Read,
    /// The channel rejected a write.
    #[error("channel write failed")]
    Write,
    /// The channel could not be enabled or disabled.
    #[error("channel enable/disable failed")]
    Channel,
    /// The channel stopped taking data.
    #[error("channel stalled")]
    Stalled,
}

impl<R, W> From<StreamError<R, W>> for PlayError {
    fn from(e: StreamError<R, W>) -> Self {
        match e {
            StreamError::Read(_) => Self::Read,
            StreamError::Write(_) => Self::Write,
            StreamError::Channel(_) => Self::Channel,
            StreamError::Stalled => Self::Stalled,
        }
    }
}

/// A failure that ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalError {
    /// Storage bring-up failed.
    #[error("sd card: {0}")]
    SdCard(#[from] SdCardError),
    /// I2S channel configuration failed.
    #[error("i2s setup: {0}")]
    I2sSetup(#[from] I2sSetupError),
    /// Playback failed.
    #[error("playback: {0}")]
    Playback(#[from] PlayError),
    /// The channel could not be released.
    #[error("failed to delete I2S channel")]
    ChannelDelete,
}
