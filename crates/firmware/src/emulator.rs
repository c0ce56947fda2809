//! Desktop back end for the player.
//!
//! - SD card: [`platform::storage_local::LocalSdHost`], a host directory
//!   standing in for the card's FAT volume
//! - I2S: [`HostI2s`], a sink that paces writes to the channel's byte rate
//!   and can dump the PCM it received to a file
//! - System: [`HostSystem`], tokio sleep, restart ends the process

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;

use platform::audio::I2sTx;
use platform::audio_config::I2sStdConfig;
use platform::system::SystemControl;

/// Host I2S sink errors.
#[derive(Debug, thiserror::Error)]
pub enum HostI2sError {
    /// Operation needs `init_std_mode` first.
    #[error("channel not configured")]
    NotConfigured,
    /// Write on a disabled channel.
    #[error("channel not enabled")]
    NotEnabled,
    /// Configuration rejected.
    #[error("invalid channel configuration: {0}")]
    Config(#[from] platform::audio_config::I2sConfigError),
    /// Writing the PCM dump failed.
    #[error("dump file: {0}")]
    Io(#[from] io::Error),
}

/// An I2S transmit channel that plays into the void at real-time speed.
pub struct HostI2s {
    config: Option<I2sStdConfig>,
    enabled: bool,
    pacing: bool,
    dump: Option<io::BufWriter<fs::File>>,
    bytes: u64,
}

impl HostI2s {
    /// Sink that paces writes to the configured byte rate.
    pub fn new() -> Self {
        Self {
            config: None,
            enabled: false,
            pacing: true,
            dump: None,
            bytes: 0,
        }
    }

    /// Accept writes as fast as they come.
    #[must_use]
    pub fn without_pacing(mut self) -> Self {
        self.pacing = false;
        self
    }

    /// Append every accepted byte to `path` (raw PCM, no header).
    ///
    /// # Errors
    ///
    /// The file cannot be created.
    pub fn dump_to(mut self, path: &Path) -> io::Result<Self> {
        self.dump = Some(io::BufWriter::new(fs::File::create(path)?));
        Ok(self)
    }

    /// Bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    fn playback_time(config: &I2sStdConfig, len: usize) -> Duration {
        let rate = u64::from(config.byte_rate()).max(1);
        let micros = (len as u64)
            .saturating_mul(1_000_000)
            .checked_div(rate)
            .unwrap_or(0);
        Duration::from_micros(micros)
    }
}

impl Default for HostI2s {
    fn default() -> Self {
        Self::new()
    }
}

impl I2sTx for HostI2s {
    type Error = HostI2sError;

    async fn init_std_mode(&mut self, config: &I2sStdConfig) -> Result<(), HostI2sError> {
        config.validate()?;
        info!(
            "I2S (host): {} Hz, {} bytes/s, MCLK {} Hz, BCLK {} Hz",
            config.clock.sample_rate.get(),
            config.byte_rate(),
            config.mclk_hz(),
            config.bclk_hz()
        );
        self.config = Some(*config);
        Ok(())
    }

    async fn enable(&mut self) -> Result<(), HostI2sError> {
        if self.config.is_none() {
            return Err(HostI2sError::NotConfigured);
        }
        self.enabled = true;
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), HostI2sError> {
        if self.config.is_none() {
            return Err(HostI2sError::NotConfigured);
        }
        self.enabled = false;
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, HostI2sError> {
        let config = self.config.ok_or(HostI2sError::NotConfigured)?;
        if !self.enabled {
            return Err(HostI2sError::NotEnabled);
        }
        if let Some(dump) = self.dump.as_mut() {
            dump.write_all(bytes)?;
        }
        if self.pacing {
            tokio::time::sleep(Self::playback_time(&config, bytes.len())).await;
        }
        self.bytes = self.bytes.saturating_add(bytes.len() as u64);
        Ok(bytes.len())
    }

    async fn delete(mut self) -> Result<(), HostI2sError> {
        if let Some(dump) = self.dump.as_mut() {
            dump.flush()?;
        }
        debug!("I2S (host) released after {} bytes", self.bytes);
        Ok(())
    }
}

/// Restart request raised by [`HostSystem`].
///
/// The emulator has no reset line; the process exits with this code and a
/// supervisor (`cargo xtask emulate --loop`) starts the next run.
pub const RESTART_EXIT_CODE: i32 = 0;

/// Desktop system control.
pub struct HostSystem {
    /// Scales every delay; 0 skips them.
    delay_scale_percent: u32,
}

impl HostSystem {
    /// Real-time delays.
    pub fn new() -> Self {
        Self {
            delay_scale_percent: 100,
        }
    }

    /// Scale delays by `percent` (0 disables them).
    #[must_use]
    pub fn with_delay_scale(mut self, percent: u32) -> Self {
        self.delay_scale_percent = percent;
        self
    }
}

impl Default for HostSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemControl for HostSystem {
    async fn delay_ms(&mut self, ms: u32) {
        let scaled = u64::from(ms).saturating_mul(u64::from(self.delay_scale_percent)) / 100;
        tokio::time::sleep(Duration::from_millis(scaled)).await;
    }

    fn restart(&mut self) -> ! {
        info!("Restarting now.");
        std::process::exit(RESTART_EXIT_CODE)
    }
}

/// Default card directory when none is given on the command line.
pub fn default_sd_root() -> PathBuf {
    PathBuf::from("sd")
}
