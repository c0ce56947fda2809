//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use std::string::String;
use std::vec::Vec;

use crate::audio::I2sTx;
use crate::audio_config::I2sStdConfig;
use crate::sdcard::{CardInfo, CardName, MountFault, Mounted, SdSpiHost};
use crate::storage::{relative_to_mount, File, Storage};
use crate::storage_config::{MountConfig, SdSpiDeviceConfig, SpiBusConfig};
use crate::system::SystemControl;

/// Error produced by every mock when a failure was injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// Injected failure.
    #[error("injected failure")]
    Injected,
    /// Path not present in the mock file table.
    #[error("file not found")]
    NotFound,
    /// Operation on a channel that was already deleted.
    #[error("channel deleted")]
    Deleted,
}

// ── I2S ─────────────────────────────────────────────────────────────────────

/// One call observed by [`MockI2s`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    /// `init_std_mode` with the configured sample rate in Hz.
    Init(u32),
    /// `enable`
    Enable,
    /// `write`, with the number of bytes accepted.
    Write(usize),
    /// `disable`
    Disable,
    /// `delete`
    Delete,
}

/// Shared record of what a [`MockI2s`] saw.
///
/// `delete` consumes the channel, so tests read the log through this handle.
#[derive(Debug, Default, Clone)]
pub struct TxLog {
    inner: std::rc::Rc<core::cell::RefCell<TxLogInner>>,
}

#[derive(Debug, Default)]
struct TxLogInner {
    events: Vec<TxEvent>,
    bytes: Vec<u8>,
    config: Option<I2sStdConfig>,
}

impl TxLog {
    /// All calls in order.
    pub fn events(&self) -> Vec<TxEvent> {
        self.inner.borrow().events.clone()
    }

    /// Every byte accepted by `write`, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.borrow().bytes.clone()
    }

    /// The last configuration passed to `init_std_mode`.
    pub fn config(&self) -> Option<I2sStdConfig> {
        self.inner.borrow().config
    }

    /// Accepted byte counts of all `write` calls.
    pub fn writes(&self) -> Vec<usize> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                TxEvent::Write(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Number of occurrences of `event`.
    pub fn count(&self, event: TxEvent) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|e| **e == event)
            .count()
    }

    fn push(&self, event: TxEvent) {
        self.inner.borrow_mut().events.push(event);
    }
}

/// Mock I2S transmit channel
pub struct MockI2s {
    log: TxLog,
    enabled: bool,
    deleted: bool,
    max_accept: Option<usize>,
    fail_init: bool,
    fail_enable: bool,
    fail_disable: bool,
    fail_delete: bool,
    fail_write_at: Option<usize>,
    stall_write_at: Option<usize>,
    write_calls: usize,
}

impl MockI2s {
    /// Create a channel that accepts everything.
    pub fn new() -> Self {
        Self {
            log: TxLog::default(),
            enabled: false,
            deleted: false,
            max_accept: None,
            fail_init: false,
            fail_enable: false,
            fail_disable: false,
            fail_delete: false,
            fail_write_at: None,
            stall_write_at: None,
            write_calls: 0,
        }
    }

    /// Handle to the call log.
    pub fn log(&self) -> TxLog {
        self.log.clone()
    }

    /// Accept at most `n` bytes per `write` call.
    #[must_use]
    pub fn with_max_accept(mut self, n: usize) -> Self {
        self.max_accept = Some(n);
        self
    }

    /// Fail `init_std_mode`.
    #[must_use]
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Fail `enable`.
    #[must_use]
    pub fn failing_enable(mut self) -> Self {
        self.fail_enable = true;
        self
    }

    /// Fail `disable`.
    #[must_use]
    pub fn failing_disable(mut self) -> Self {
        self.fail_disable = true;
        self
    }

    /// Fail `delete`.
    #[must_use]
    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Fail the `n`th `write` call (0-based).
    #[must_use]
    pub fn failing_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    /// Accept nothing on the `n`th `write` call (0-based).
    #[must_use]
    pub fn stalling_write_at(mut self, n: usize) -> Self {
        self.stall_write_at = Some(n);
        self
    }

    /// Whether the channel is currently clocking.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockI2s {
    fn default() -> Self {
        Self::new()
    }
}

impl I2sTx for MockI2s {
    type Error = MockError;

    async fn init_std_mode(&mut self, config: &I2sStdConfig) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(MockError::Injected);
        }
        self.log.push(TxEvent::Init(config.clock.sample_rate.get()));
        self.log.inner.borrow_mut().config = Some(*config);
        Ok(())
    }

    async fn enable(&mut self) -> Result<(), Self::Error> {
        if self.deleted {
            return Err(MockError::Deleted);
        }
        if self.fail_enable {
            return Err(MockError::Injected);
        }
        self.enabled = true;
        self.log.push(TxEvent::Enable);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        if self.fail_disable {
            return Err(MockError::Injected);
        }
        self.enabled = false;
        self.log.push(TxEvent::Disable);
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let call = self.write_calls;
        self.write_calls = self.write_calls.saturating_add(1);
        if self.fail_write_at == Some(call) {
            return Err(MockError::Injected);
        }
        let accepted = if self.stall_write_at == Some(call) {
            0
        } else {
            self.max_accept.map_or(bytes.len(), |m| m.min(bytes.len()))
        };
        self.log.push(TxEvent::Write(accepted));
        if let Some(chunk) = bytes.get(..accepted) {
            self.log.inner.borrow_mut().bytes.extend_from_slice(chunk);
        }
        Ok(accepted)
    }

    async fn delete(mut self) -> Result<(), Self::Error> {
        if self.fail_delete {
            return Err(MockError::Injected);
        }
        self.deleted = true;
        self.log.push(TxEvent::Delete);
        Ok(())
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

/// In-memory file system mounted at a fixed point.
#[derive(Debug, Clone)]
pub struct MockStorage {
    mount_point: &'static str,
    files: Vec<(String, Vec<u8>)>,
    fail_read_at: Option<u64>,
    opens: usize,
}

impl MockStorage {
    /// Empty storage mounted at `mount_point`.
    pub fn new(mount_point: &'static str) -> Self {
        Self {
            mount_point,
            files: Vec::new(),
            fail_read_at: None,
            opens: 0,
        }
    }

    /// Add a file. `name` is relative to the volume root.
    #[must_use]
    pub fn with_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.files.push((String::from(name), data));
        self
    }

    /// Make reads fail once the file position reaches `offset`.
    #[must_use]
    pub fn failing_read_at(mut self, offset: u64) -> Self {
        self.fail_read_at = Some(offset);
        self
    }

    /// Number of successful `open_file` calls.
    pub fn opens(&self) -> usize {
        self.opens
    }

    fn lookup(&self, path: &str) -> Option<&[u8]> {
        let name = relative_to_mount(self.mount_point, path)?;
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }
}

/// Open handle into a [`MockStorage`] file.
pub struct MockFile<'a> {
    data: &'a [u8],
    pos: u64,
    fail_read_at: Option<u64>,
    reads: usize,
}

impl MockFile<'_> {
    /// Number of `read` calls so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl File for MockFile<'_> {
    type Error = MockError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads = self.reads.saturating_add(1);
        if self.fail_read_at.is_some_and(|at| self.pos >= at) {
            return Err(MockError::Injected);
        }
        let start = usize::try_from(self.pos).unwrap_or(usize::MAX);
        let rest = self.data.get(start..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), rest.get(..n)) {
            dst.copy_from_slice(src);
        }
        self.pos = self.pos.saturating_add(n as u64);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        self.pos = pos;
        Ok(pos)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Storage for MockStorage {
    type Error = MockError;
    type File<'a> = MockFile<'a>;

    async fn open_file<'a>(&'a mut self, path: &str) -> Result<Self::File<'a>, Self::Error> {
        self.opens = self.opens.saturating_add(1);
        let fail_read_at = self.fail_read_at;
        let data = self.lookup(path).ok_or(MockError::NotFound)?;
        Ok(MockFile {
            data,
            pos: 0,
            fail_read_at,
            reads: 0,
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.lookup(path).is_some())
    }
}

// ── SD host ─────────────────────────────────────────────────────────────────

/// Which mount stage a [`MockSdHost`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdFailure {
    /// `init_bus` fails.
    Bus,
    /// The card initialises but has no FAT volume.
    Filesystem,
    /// The card never answers.
    Card,
}

/// Mock SD-over-SPI host handing out a prepared [`MockStorage`].
pub struct MockSdHost {
    storage: Option<MockStorage>,
    info: CardInfo,
    failure: Option<SdFailure>,
    bus: Option<SpiBusConfig>,
    mount: Option<MountConfig>,
}

impl MockSdHost {
    /// Host that mounts `storage` successfully.
    pub fn new(storage: MockStorage) -> Self {
        Self {
            storage: Some(storage),
            info: Self::default_info(),
            failure: None,
            bus: None,
            mount: None,
        }
    }

    /// Inject a failure at `stage`.
    #[must_use]
    pub fn failing(mut self, stage: SdFailure) -> Self {
        self.failure = Some(stage);
        self
    }

    /// Override the card metadata reported on mount.
    #[must_use]
    pub fn with_info(mut self, info: CardInfo) -> Self {
        self.info = info;
        self
    }

    /// Bus configuration seen by `init_bus`, if it was called.
    pub fn bus_config(&self) -> Option<SpiBusConfig> {
        self.bus
    }

    /// Mount configuration seen by `mount`, if it was called.
    pub fn mount_config(&self) -> Option<MountConfig> {
        self.mount
    }

    /// A 2 GB default-speed card.
    pub fn default_info() -> CardInfo {
        let mut name = CardName::new();
        let _ = name.push_str("SD02G");
        CardInfo {
            name,
            transfer_speed_hz: 20_000_000,
            max_freq_khz: 20_000,
            log_bus_width: 0,
            read_block_len: 512,
            capacity_bytes: 2_000_000_000,
        }
    }
}

impl SdSpiHost for MockSdHost {
    type Error = MockError;
    type Storage = MockStorage;

    async fn init_bus(&mut self, bus: &SpiBusConfig) -> Result<(), Self::Error> {
        self.bus = Some(*bus);
        if self.failure == Some(SdFailure::Bus) {
            return Err(MockError::Injected);
        }
        Ok(())
    }

    async fn mount(
        &mut self,
        _device: &SdSpiDeviceConfig,
        mount: &MountConfig,
    ) -> Result<Mounted<Self::Storage>, MountFault<Self::Error>> {
        self.mount = Some(*mount);
        match self.failure {
            Some(SdFailure::Filesystem) => Err(MountFault::Filesystem(MockError::Injected)),
            Some(SdFailure::Card) => Err(MountFault::Card(MockError::Injected)),
            _ => {
                let storage = self.storage.take().ok_or(MountFault::Card(MockError::NotFound))?;
                Ok(Mounted {
                    storage,
                    info: self.info.clone(),
                })
            }
        }
    }
}

// ── System ──────────────────────────────────────────────────────────────────

/// Mock system control. Records delays; `restart` panics with `"restart"`
/// so tests can observe it with `#[should_panic(expected = "restart")]`.
#[derive(Debug, Default, Clone)]
pub struct MockSystem {
    delays: std::rc::Rc<core::cell::RefCell<Vec<u32>>>,
}

impl MockSystem {
    /// Create new mock system
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in ms.
    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl SystemControl for MockSystem {
    async fn delay_ms(&mut self, ms: u32) {
        self.delays.borrow_mut().push(ms);
    }

    #[allow(clippy::panic)]
    fn restart(&mut self) -> ! {
        panic!("restart after {:?} ms", self.delays.borrow());
    }
}
