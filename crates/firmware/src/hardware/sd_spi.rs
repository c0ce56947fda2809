//! SD card on SPI2, FAT volume through `embedded-sdmmc`.
//!
//! The card is identified at 400 kHz and then clocked at the configured bus
//! frequency. Only volume 0 is used, opened read-only.

use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals::{PB12, SPI2};
use embassy_stm32::spi::{self, Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::{
    sdcard::CardType, Mode, RawDirectory, RawFile, RawVolume, SdCard, TimeSource, Timestamp,
    VolumeIdx, VolumeManager,
};

use platform::sdcard::{CardInfo, CardName, MountFault, Mounted, SdSpiHost};
use platform::storage::{relative_to_mount, File, Storage};
use platform::storage_config::{MountConfig, SdSpiDeviceConfig, SpiBusConfig, SpiMode};

use super::SdPins;

type SpiBus = Spi<'static, SPI2, NoDma, NoDma>;
type SpiDev = ExclusiveDevice<SpiBus, Output<'static, PB12>, Delay>;
type Card = SdCard<SpiDev, Delay>;
type Volumes = VolumeManager<Card, FixedTime>;
type VolumeError = embedded_sdmmc::Error<embedded_sdmmc::SdCardError>;

/// Block length of every SD card in SPI mode.
const SD_BLOCK_LEN: u32 = 512;

/// Transfer rate a card advertises in its CSD when it only supports default
/// speed. `embedded-sdmmc` does not expose the CSD, so this is reported.
const DEFAULT_SPEED_TRAN_HZ: u32 = 25_000_000;

/// SD host errors.
#[derive(Debug)]
pub enum SdHostError {
    /// Peripherals were already handed to a bus.
    BusTaken,
    /// `mount` was called before `init_bus`.
    NoBus,
    /// The SPI peripheral refused the fast clock.
    Clock,
    /// The card did not answer.
    Card(embedded_sdmmc::SdCardError),
    /// FAT or partition level failure.
    Volume(VolumeError),
    /// Path is not below the mount point.
    OutsideMount,
    /// Path does not name a file.
    BadName,
}

/// File timestamps are never written; a constant is enough.
pub struct FixedTime;

impl TimeSource for FixedTime {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

fn spi_config(hz: u32, mode: SpiMode) -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = Hertz(hz);
    config.mode = match mode {
        SpiMode::Mode0 => spi::MODE_0,
    };
    config
}

/// SD card host on SPI2.
pub struct SpiSdHost {
    pins: Option<SdPins>,
    bus: Option<(SpiBus, PB12, SpiBusConfig)>,
}

impl SpiSdHost {
    /// Host owning SPI2 and the card's pins.
    pub fn new(pins: SdPins) -> Self {
        Self {
            pins: Some(pins),
            bus: None,
        }
    }
}

impl SdSpiHost for SpiSdHost {
    type Error = SdHostError;
    type Storage = SdStorage;

    async fn init_bus(&mut self, bus: &SpiBusConfig) -> Result<(), SdHostError> {
        let pins = self.pins.take().ok_or(SdHostError::BusTaken)?;
        debug!(
            "SPI2 up at {} Hz, max transfer {} bytes",
            SpiBusConfig::INIT_FREQUENCY_HZ,
            bus.max_transfer_bytes
        );
        let spi = Spi::new(
            pins.SPI,
            pins.SCK,
            pins.MOSI,
            pins.MISO,
            NoDma,
            NoDma,
            spi_config(SpiBusConfig::INIT_FREQUENCY_HZ, bus.mode),
        );
        self.bus = Some((spi, pins.CS, *bus));
        Ok(())
    }

    async fn mount(
        &mut self,
        device: &SdSpiDeviceConfig,
        mount: &MountConfig,
    ) -> Result<Mounted<SdStorage>, MountFault<SdHostError>> {
        let (spi, cs_pin, bus) = self
            .bus
            .take()
            .ok_or(MountFault::Card(SdHostError::NoBus))?;
        if device.card_detect.is_some() || device.write_protect.is_some() {
            warn!("Card detect / write protect lines are not monitored");
        }

        let cs = Output::new(cs_pin, Level::High, Speed::VeryHigh);
        let dev = match ExclusiveDevice::new(spi, cs, Delay) {
            Ok(dev) => dev,
            Err(never) => match never {},
        };
        let card = SdCard::new(dev, Delay);

        // Forces the identification sequence at the slow clock.
        let capacity_bytes = card
            .num_bytes()
            .map_err(|e| MountFault::Card(SdHostError::Card(e)))?;
        let fast = spi_config(bus.frequency_hz, bus.mode);
        card.spi(|dev| dev.bus_mut().set_config(&fast))
            .map_err(|_| MountFault::Card(SdHostError::Clock))?;

        let name = card_name(card.get_card_type());
        if mount.format_if_mount_failed {
            warn!("Formatting is not supported; a failed mount stays failed");
        }

        let mut volumes = VolumeManager::new(card, FixedTime);
        let volume = volumes.open_raw_volume(VolumeIdx(0)).map_err(classify)?;
        let root = match volumes.open_root_dir(volume) {
            Ok(root) => root,
            Err(e) => {
                let _ = volumes.close_volume(volume);
                return Err(classify(e));
            }
        };
        info!("FAT volume 0 open, {} open files max", mount.max_files);

        Ok(Mounted {
            storage: SdStorage {
                volumes,
                volume,
                root,
                mount_point: mount.mount_point,
            },
            info: CardInfo {
                name,
                transfer_speed_hz: DEFAULT_SPEED_TRAN_HZ,
                max_freq_khz: bus.frequency_hz / 1000,
                log_bus_width: 0,
                read_block_len: SD_BLOCK_LEN,
                capacity_bytes,
            },
        })
    }
}

/// Block device trouble is the card's fault, everything else the volume's.
fn classify(e: VolumeError) -> MountFault<SdHostError> {
    match e {
        embedded_sdmmc::Error::DeviceError(inner) => MountFault::Card(SdHostError::Card(inner)),
        other => MountFault::Filesystem(SdHostError::Volume(other)),
    }
}

fn card_name(kind: Option<CardType>) -> CardName {
    let label = match kind {
        Some(CardType::SD1) => "SDSC1",
        Some(CardType::SD2) => "SDSC2",
        Some(CardType::SDHC) => "SDHC",
        None => "SD",
    };
    let mut name = CardName::new();
    // Every label is shorter than the capacity.
    let _ = name.push_str(label);
    name
}

/// The mounted FAT volume.
pub struct SdStorage {
    volumes: Volumes,
    volume: RawVolume,
    root: RawDirectory,
    mount_point: &'static str,
}

impl SdStorage {
    fn open_raw(&mut self, path: &str) -> Result<RawFile, SdHostError> {
        let rel = relative_to_mount(self.mount_point, path).ok_or(SdHostError::OutsideMount)?;
        let (dirs, name) = match rel.rsplit_once('/') {
            Some((dirs, name)) => (Some(dirs), name),
            None => (None, rel),
        };
        if name.is_empty() {
            return Err(SdHostError::BadName);
        }

        let mut parent: Option<RawDirectory> = None;
        for component in dirs.into_iter().flat_map(|d| d.split('/')) {
            let next = self.volumes.open_dir(parent.unwrap_or(self.root), component);
            if let Some(dir) = parent {
                let _ = self.volumes.close_dir(dir);
            }
            parent = Some(next.map_err(SdHostError::Volume)?);
        }

        let file = self
            .volumes
            .open_file_in_dir(parent.unwrap_or(self.root), name, Mode::ReadOnly);
        if let Some(dir) = parent {
            let _ = self.volumes.close_dir(dir);
        }
        file.map_err(SdHostError::Volume)
    }
}

impl Drop for SdStorage {
    fn drop(&mut self) {
        let _ = self.volumes.close_dir(self.root);
        let _ = self.volumes.close_volume(self.volume);
    }
}

impl Storage for SdStorage {
    type Error = SdHostError;
    type File<'a>
        = SdFile<'a>
    where
        Self: 'a;

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<SdFile<'a>, SdHostError> {
        let raw = self.open_raw(path)?;
        let len = match self.volumes.file_length(raw) {
            Ok(len) => len,
            Err(e) => {
                let _ = self.volumes.close_file(raw);
                return Err(SdHostError::Volume(e));
            }
        };
        Ok(SdFile {
            volumes: &mut self.volumes,
            raw,
            len,
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, SdHostError> {
        match self.open_raw(path) {
            Ok(raw) => {
                let _ = self.volumes.close_file(raw);
                Ok(true)
            }
            Err(SdHostError::Volume(embedded_sdmmc::Error::NotFound)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// An open read-only file. Closed on drop.
///
/// Every `VolumeManager` call needs `&mut`, so the file holds the storage's
/// manager exclusively for as long as it is open.
pub struct SdFile<'a> {
    volumes: &'a mut Volumes,
    raw: RawFile,
    len: u32,
}

impl File for SdFile<'_> {
    type Error = SdHostError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SdHostError> {
        match self.volumes.read(self.raw, buf) {
            Ok(n) => Ok(n),
            Err(embedded_sdmmc::Error::EndOfFile) => Ok(0),
            Err(e) => Err(SdHostError::Volume(e)),
        }
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, SdHostError> {
        // FAT refuses offsets past the end; parking at the end reads 0 just the same.
        let offset = u32::try_from(pos).map_or(self.len, |p| p.min(self.len));
        self.volumes
            .file_seek_from_start(self.raw, offset)
            .map_err(SdHostError::Volume)?;
        Ok(pos)
    }

    fn size(&self) -> u64 {
        u64::from(self.len)
    }
}

impl Drop for SdFile<'_> {
    fn drop(&mut self) {
        let _ = self.volumes.close_file(self.raw);
    }
}
