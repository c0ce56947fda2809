//! SD card host abstraction and card diagnostics.

use crate::storage::Storage;
use crate::storage_config::{MountConfig, SdSpiDeviceConfig, SpiBusConfig};

/// Card name as reported in the CID register (up to 5 ASCII characters),
/// or a host-provided label when the CID is not exposed.
pub type CardName = heapless::String<8>;

/// Bus speed class derived from the card's maximum transfer rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedClass {
    /// Transfer speed below 25 MHz.
    DefaultSpeed,
    /// 25 MHz and above.
    HighSpeed,
}

impl SpeedClass {
    /// Threshold between default and high speed.
    pub const HIGH_SPEED_HZ: u32 = 25_000_000;

    /// Classify a CSD transfer speed.
    #[must_use]
    pub fn from_transfer_speed(hz: u32) -> Self {
        if hz < Self::HIGH_SPEED_HZ {
            Self::DefaultSpeed
        } else {
            Self::HighSpeed
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DefaultSpeed => "Default Speed",
            Self::HighSpeed => "High Speed",
        }
    }
}

/// Card metadata snapshot taken at mount time. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardInfo {
    /// Product name.
    pub name: CardName,
    /// CSD maximum transfer rate in Hz.
    pub transfer_speed_hz: u32,
    /// Clock the host actually runs the card at, in kHz.
    pub max_freq_khz: u32,
    /// log2 of the data bus width (0 in SPI mode).
    pub log_bus_width: u8,
    /// Read block length in bytes.
    pub read_block_len: u32,
    /// Capacity in bytes.
    pub capacity_bytes: u64,
}

impl CardInfo {
    /// Speed class of the card.
    #[must_use]
    pub fn speed_class(&self) -> SpeedClass {
        SpeedClass::from_transfer_speed(self.transfer_speed_hz)
    }
}

/// Result of a successful mount.
pub struct Mounted<S> {
    /// The mounted file system.
    pub storage: S,
    /// Card metadata.
    pub info: CardInfo,
}

/// Why a mount attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountFault<E> {
    /// The card answered but no usable FAT volume was found. Formatting may help.
    Filesystem(E),
    /// The card did not initialise. Usually wiring or missing pull-ups.
    Card(E),
}

/// A controller that can talk to an SD card over SPI and mount it.
pub trait SdSpiHost {
    /// Error type
    type Error: core::fmt::Debug;
    /// Storage produced by a successful mount.
    type Storage: Storage;

    /// Initialise the SPI bus.
    fn init_bus(
        &mut self,
        bus: &SpiBusConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Attach the card on the initialised bus and mount its file system.
    fn mount(
        &mut self,
        device: &SdSpiDeviceConfig,
        mount: &MountConfig,
    ) -> impl core::future::Future<Output = Result<Mounted<Self::Storage>, MountFault<Self::Error>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_class_threshold_is_25mhz() {
        assert_eq!(
            SpeedClass::from_transfer_speed(24_999_999),
            SpeedClass::DefaultSpeed
        );
        assert_eq!(
            SpeedClass::from_transfer_speed(25_000_000),
            SpeedClass::HighSpeed
        );
        assert_eq!(
            SpeedClass::from_transfer_speed(50_000_000),
            SpeedClass::HighSpeed
        );
    }

    #[test]
    fn speed_class_labels() {
        assert_eq!(SpeedClass::DefaultSpeed.label(), "Default Speed");
        assert_eq!(SpeedClass::HighSpeed.label(), "High Speed");
    }
}
