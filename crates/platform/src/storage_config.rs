//! SD-card-over-SPI storage configuration.
//!
//! Three pieces, applied in order by the mount routine:
//!
//! 1. [`SpiBusConfig`]: bring up the SPI bus (pins, clock, largest transfer)
//! 2. [`SdSpiDeviceConfig`]: attach the card as a device on that bus
//! 3. [`MountConfig`]: mount its FAT volume at a fixed mount point
//!
//! The card runs in SPI mode, so the data path is always one bit wide.

use crate::gpio::{self, PinId};

/// SPI clock polarity / phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0, the mode SD cards use in SPI.
    Mode0,
}

/// SPI bus bring-up parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiBusConfig {
    /// Serial clock.
    pub sclk: PinId,
    /// Controller out, card in.
    pub mosi: PinId,
    /// Card out, controller in.
    pub miso: PinId,
    /// Largest single DMA transfer in bytes.
    pub max_transfer_bytes: u32,
    /// Bus clock once the card is initialised.
    pub frequency_hz: u32,
    /// Clock mode.
    pub mode: SpiMode,
}

impl SpiBusConfig {
    /// Transfer size limit used by the board: 4000 bytes.
    pub const DEFAULT_MAX_TRANSFER_BYTES: u32 = 4000;

    /// Card identification clock. SD cards must be clocked at ≤ 400 kHz
    /// until they leave idle state.
    pub const INIT_FREQUENCY_HZ: u32 = 400_000;

    /// Default-speed SD clock limit in SPI mode.
    pub const DEFAULT_FREQUENCY_HZ: u32 = 20_000_000;
}

/// The card as a device on the SPI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdSpiDeviceConfig {
    /// Chip select, active low.
    pub cs: PinId,
    /// Card-detect switch, if wired.
    pub card_detect: Option<PinId>,
    /// Write-protect switch, if wired.
    pub write_protect: Option<PinId>,
}

/// File system mount parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountConfig {
    /// Absolute mount point, e.g. `/sdcard`.
    pub mount_point: &'static str,
    /// Reformat the card when no FAT volume is found. Destroys card contents.
    pub format_if_mount_failed: bool,
    /// Maximum number of simultaneously open files.
    pub max_files: u8,
    /// Cluster size used when formatting.
    pub allocation_unit_size: u32,
}

impl MountConfig {
    /// Read-only playback defaults: never format, five files, 16 KiB clusters.
    #[must_use]
    pub const fn new(mount_point: &'static str) -> Self {
        Self {
            mount_point,
            format_if_mount_failed: false,
            max_files: 5,
            allocation_unit_size: 16 * 1024,
        }
    }
}

/// Everything the mount routine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdCardConfig {
    /// Bus bring-up.
    pub bus: SpiBusConfig,
    /// Device attachment.
    pub device: SdSpiDeviceConfig,
    /// Mount parameters.
    pub mount: MountConfig,
}

/// Reasons an [`SdCardConfig`] is rejected before touching hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageConfigError {
    /// A pin is used for two signals.
    #[error("SPI pin assigned twice")]
    DuplicatePin,
    /// `max_transfer_bytes` is zero.
    #[error("SPI max transfer size is zero")]
    ZeroTransferSize,
    /// `max_files` is zero.
    #[error("mount allows zero open files")]
    ZeroMaxFiles,
    /// Allocation unit is not a power-of-two multiple of the 512-byte sector.
    #[error("allocation unit must be a power of two and at least one sector")]
    BadAllocationUnit,
    /// Mount point is not absolute or ends with `/`.
    #[error("mount point must be absolute without trailing slash")]
    BadMountPoint,
}

impl SdCardConfig {
    /// SD sector size.
    pub const SECTOR_BYTES: u32 = 512;

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// See [`StorageConfigError`].
    pub fn validate(&self) -> Result<(), StorageConfigError> {
        let mut pins: heapless::Vec<PinId, 6> = heapless::Vec::new();
        for pin in [
            Some(self.bus.sclk),
            Some(self.bus.mosi),
            Some(self.bus.miso),
            Some(self.device.cs),
            self.device.card_detect,
            self.device.write_protect,
        ]
        .into_iter()
        .flatten()
        {
            // Capacity equals the number of candidates.
            let _ = pins.push(pin);
        }
        if !gpio::all_distinct(&pins) {
            return Err(StorageConfigError::DuplicatePin);
        }
        if self.bus.max_transfer_bytes == 0 {
            return Err(StorageConfigError::ZeroTransferSize);
        }
        if self.mount.max_files == 0 {
            return Err(StorageConfigError::ZeroMaxFiles);
        }
        let unit = self.mount.allocation_unit_size;
        if !unit.is_power_of_two() || unit < Self::SECTOR_BYTES {
            return Err(StorageConfigError::BadAllocationUnit);
        }
        let mp = self.mount.mount_point;
        if !mp.starts_with('/') || mp.len() < 2 || mp.ends_with('/') {
            return Err(StorageConfigError::BadMountPoint);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::Port;

    fn config() -> SdCardConfig {
        SdCardConfig {
            bus: SpiBusConfig {
                sclk: PinId::new(Port::B, 13),
                mosi: PinId::new(Port::B, 15),
                miso: PinId::new(Port::B, 14),
                max_transfer_bytes: SpiBusConfig::DEFAULT_MAX_TRANSFER_BYTES,
                frequency_hz: SpiBusConfig::DEFAULT_FREQUENCY_HZ,
                mode: SpiMode::Mode0,
            },
            device: SdSpiDeviceConfig {
                cs: PinId::new(Port::B, 12),
                card_detect: None,
                write_protect: None,
            },
            mount: MountConfig::new("/sdcard"),
        }
    }

    #[test]
    fn board_config_is_valid() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn mount_defaults_never_format() {
        let m = MountConfig::new("/sdcard");
        assert!(!m.format_if_mount_failed);
        assert_eq!(m.max_files, 5);
        assert_eq!(m.allocation_unit_size, 16 * 1024);
    }

    #[test]
    fn cs_sharing_a_bus_pin_rejected() {
        let mut cfg = config();
        cfg.device.cs = cfg.bus.miso;
        assert_eq!(cfg.validate(), Err(StorageConfigError::DuplicatePin));
    }

    #[test]
    fn zero_limits_rejected() {
        let mut cfg = config();
        cfg.bus.max_transfer_bytes = 0;
        assert_eq!(cfg.validate(), Err(StorageConfigError::ZeroTransferSize));

        let mut cfg = config();
        cfg.mount.max_files = 0;
        assert_eq!(cfg.validate(), Err(StorageConfigError::ZeroMaxFiles));
    }

    #[test]
    fn allocation_unit_must_be_sector_power_of_two() {
        let mut cfg = config();
        cfg.mount.allocation_unit_size = 3000;
        assert_eq!(cfg.validate(), Err(StorageConfigError::BadAllocationUnit));
        cfg.mount.allocation_unit_size = 256;
        assert_eq!(cfg.validate(), Err(StorageConfigError::BadAllocationUnit));
        cfg.mount.allocation_unit_size = 512;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn mount_point_shape_checked() {
        for bad in ["sdcard", "/", "/sdcard/", ""] {
            let mut cfg = config();
            cfg.mount.mount_point = bad;
            assert_eq!(
                cfg.validate(),
                Err(StorageConfigError::BadMountPoint),
                "{bad:?}"
            );
        }
    }
}
