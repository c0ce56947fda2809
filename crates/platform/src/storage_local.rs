//! Host-directory SD card for the desktop emulator.
//!
//! [`LocalFileStorage`] implements [`Storage`] with `std::fs`, mapping the
//! mount point (e.g. `/sdcard`) onto a directory of the host. [`LocalSdHost`]
//! wraps it behind the same [`SdSpiHost`] seam the board uses, so the
//! application code is identical on both targets.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::sdcard::{CardInfo, CardName, MountFault, Mounted, SdSpiHost, SpeedClass};
use crate::storage::{relative_to_mount, File, Storage};
use crate::storage_config::{MountConfig, SdSpiDeviceConfig, SpiBusConfig};

/// Error type for local filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum LocalStorageError {
    /// Underlying I/O failure.
    #[error("local storage error: {0}")]
    Io(#[from] std::io::Error),
    /// Path does not start with the mount point.
    #[error("path is outside the mount point")]
    OutsideMount,
    /// `init_bus` was not called before `mount`.
    #[error("bus not initialised")]
    BusDown,
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(Read::read(&mut self.inner, buf)?)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        Ok(Seek::seek(&mut self.inner, SeekFrom::Start(pos))?)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A [`Storage`] implementation backed by `std::fs`.
///
/// Paths passed to [`LocalFileStorage::open_file`] and
/// [`LocalFileStorage::exists`] are absolute device paths; the mount point
/// prefix is replaced by the host directory given at construction.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/sdcard", "/home/user/sd");
/// let file = storage.open_file("/sdcard/2.wav").await.unwrap();
/// # }
/// ```
pub struct LocalFileStorage {
    mount_point: &'static str,
    root: PathBuf,
}

impl LocalFileStorage {
    /// Mount `root` at `mount_point`.
    #[must_use]
    pub fn new(mount_point: &'static str, root: impl AsRef<Path>) -> Self {
        Self {
            mount_point,
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Host directory backing the mount point.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LocalStorageError> {
        let rel = relative_to_mount(self.mount_point, path).ok_or(LocalStorageError::OutsideMount)?;
        Ok(self.root.join(rel))
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File<'a> = LocalFile;

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<Self::File<'a>, Self::Error> {
        let full = self.resolve(path)?;
        let file = fs::File::open(&full)?;
        let meta = file.metadata()?;
        Ok(LocalFile {
            inner: file,
            size: meta.len(),
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path)?.is_file())
    }
}

/// SD host whose "card" is a host directory.
///
/// `init_bus` only records the configuration; `mount` fails with
/// [`MountFault::Card`] if the directory is missing, mirroring a card that
/// never answers.
pub struct LocalSdHost {
    root: PathBuf,
    bus: Option<SpiBusConfig>,
}

impl LocalSdHost {
    /// Card backed by `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            bus: None,
        }
    }

    /// Same shape the SPI host reports: default-speed CSD, bus clock as
    /// the card's working frequency.
    fn card_info(bus: &SpiBusConfig) -> CardInfo {
        let mut name = CardName::new();
        let _ = name.push_str("HOSTFS");
        CardInfo {
            name,
            transfer_speed_hz: SpeedClass::HIGH_SPEED_HZ,
            max_freq_khz: bus.frequency_hz / 1000,
            log_bus_width: 0,
            read_block_len: 512,
            capacity_bytes: 0,
        }
    }
}

impl SdSpiHost for LocalSdHost {
    type Error = LocalStorageError;
    type Storage = LocalFileStorage;

    async fn init_bus(&mut self, bus: &SpiBusConfig) -> Result<(), Self::Error> {
        tracing::debug!(
            sclk = %bus.sclk,
            mosi = %bus.mosi,
            miso = %bus.miso,
            "SPI2 up at {} Hz, max transfer {} bytes",
            SpiBusConfig::INIT_FREQUENCY_HZ,
            bus.max_transfer_bytes
        );
        self.bus = Some(*bus);
        Ok(())
    }

    async fn mount(
        &mut self,
        device: &SdSpiDeviceConfig,
        mount: &MountConfig,
    ) -> Result<Mounted<Self::Storage>, MountFault<Self::Error>> {
        let Some(bus) = self.bus else {
            return Err(MountFault::Card(LocalStorageError::BusDown));
        };
        tracing::debug!(cs = %device.cs, root = %self.root.display(), "attaching host card");
        let meta = fs::metadata(&self.root).map_err(|e| MountFault::Card(e.into()))?;
        if !meta.is_dir() {
            return Err(MountFault::Filesystem(LocalStorageError::Io(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            )));
        }
        Ok(Mounted {
            storage: LocalFileStorage::new(mount.mount_point, &self.root),
            info: Self::card_info(&bus),
        })
    }
}
