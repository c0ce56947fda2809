//! SD card bring-up: SPI bus, card attach, FAT mount.

use platform::sdcard::{CardInfo, MountFault, SdSpiHost};
use platform::storage_config::SdCardConfig;

use crate::error::SdCardError;
use crate::fmt::Dbg;

/// A mounted card. Never unmounted; dropping it is fine.
pub struct SdCard<S> {
    /// The mounted volume.
    pub storage: S,
    /// Card metadata captured at mount time.
    pub info: CardInfo,
}

/// Bring up the SPI bus and mount the card described by `config`.
///
/// No retries. The card is not formatted when the mount fails unless
/// `config.mount.format_if_mount_failed` is set and the host supports it.
///
/// # Errors
///
/// [`SdCardError::Config`] before touching the host, then
/// [`SdCardError::BusInit`], [`SdCardError::FilesystemMount`] or
/// [`SdCardError::CardInit`] depending on the stage that failed.
pub async fn init_sdcard<H: SdSpiHost>(
    host: &mut H,
    config: &SdCardConfig,
) -> Result<SdCard<H::Storage>, SdCardError> {
    config.validate()?;

    info!("Initializing SD card");
    info!("Using SPI peripheral");

    if let Err(e) = host.init_bus(&config.bus).await {
        error!("Failed to initialize bus. {:?}", Dbg(&e));
        return Err(SdCardError::BusInit);
    }

    info!("Mounting filesystem");
    match host.mount(&config.device, &config.mount).await {
        Ok(mounted) => {
            info!("Filesystem mounted");
            Ok(SdCard {
                storage: mounted.storage,
                info: mounted.info,
            })
        }
        Err(MountFault::Filesystem(e)) => {
            error!(
                "Failed to mount filesystem. If you want the card to be formatted, set format_if_mount_failed. {:?}",
                Dbg(&e)
            );
            Err(SdCardError::FilesystemMount)
        }
        Err(MountFault::Card(e)) => {
            error!(
                "Failed to initialize the card ({:?}). Make sure SD card lines have pull-up resistors in place.",
                Dbg(&e)
            );
            Err(SdCardError::CardInit)
        }
    }
}

/// Log the card's identification and bus parameters.
pub fn print_sdcard_info(info: &CardInfo) {
    info!("Name: {}", info.name.as_str());
    info!("Speed: {}", info.speed_class().label());
    info!("Max frequency: {} kHz", info.max_freq_khz);
    info!("Bus width (log2): {}", info.log_bus_width);
    info!("Read block length: {}", info.read_block_len);
    info!("Capacity: {} MB", info.capacity_bytes / (1024 * 1024));
}
