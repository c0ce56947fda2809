//! Top-level run sequence and the restart handler.
//!
//! One linear pass, no loop:
//!
//! ```text
//! banner ─► mount SD ─► card info ─► I2S setup ─► play 2.wav ─► delete channel
//!    any failure ──────────────────────────────────────────────┐
//!                                                               ▼
//!                                         finish: log, wait 5000 ms, restart
//! ```
//!
//! [`run`] propagates the first failure with `?`, so nothing after a failed
//! step executes. [`finish`] is the only place that decides to restart.

use core::convert::Infallible;

use platform::audio::I2sTx;
use platform::config::{APP_NAME, APP_VERSION, BOARD};
use platform::sdcard::SdSpiHost;
use platform::system::SystemControl;

use crate::config::{OUTPUT_PROFILE, I2S_PINS, REBOOT_WAIT_MS, SD_CARD, WAV_FILE};
use crate::error::FatalError;
use crate::fmt::Dbg;
use crate::player::{i2s_setup, play_wav};
use crate::sdcard::{init_sdcard, print_sdcard_info};

/// Ordered list of the run steps, for documentation and testing.
///
/// # Correctness Invariants
///
/// - The card is mounted before the I2S channel is touched, so a storage
///   failure leaves the channel unconfigured.
/// - The channel is disabled before it is deleted.
/// - The card is never unmounted.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Banner: application name, version, board",
    "2. SD card: SPI2 bus up, attach card, mount FAT at /sdcard",
    "3. Card info: name, speed class, frequency, bus width, block length",
    "4. I2S: program SAI1 block A std mode for the output profile",
    "5. Play: skip 44-byte header, stream 2048-sample chunks, disable channel",
    "6. Release: delete the I2S channel",
    "7. Restart: wait 5000 ms, reset",
];

/// Hardware handed to [`run`].
pub struct AppContext<H, T> {
    /// SD card host.
    pub host: H,
    /// I2S transmit channel. Consumed at the end of the run.
    pub tx: T,
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunSummary {
    /// PCM bytes sent to the channel.
    pub bytes_written: u64,
    /// Chunks sent.
    pub chunks: u32,
}

/// Execute the run sequence once.
///
/// # Errors
///
/// The first failing step's error. Later steps are not attempted.
pub async fn run<H: SdSpiHost, T: I2sTx>(ctx: AppContext<H, T>) -> Result<RunSummary, FatalError> {
    let AppContext { mut host, mut tx } = ctx;

    info!("{} v{}", APP_NAME, APP_VERSION);
    info!("Board: {}", BOARD);

    let mut card = init_sdcard(&mut host, &SD_CARD).await?;
    print_sdcard_info(&card.info);

    i2s_setup(&mut tx, OUTPUT_PROFILE, I2S_PINS).await?;

    let report = play_wav(&mut card.storage, &mut tx, WAV_FILE).await?;

    tx.delete().await.map_err(|e| {
        error!("Failed to delete I2S channel: {:?}", Dbg(&e));
        FatalError::ChannelDelete
    })?;

    Ok(RunSummary {
        bytes_written: report.bytes_written,
        chunks: report.chunks,
    })
}

/// Log the outcome, wait [`REBOOT_WAIT_MS`], restart.
///
/// Never resolves to a value: the returned [`Infallible`] only lets the
/// caller prove divergence with `match finish(..).await {}`.
pub async fn finish<S: SystemControl>(
    result: Result<RunSummary, FatalError>,
    system: &mut S,
) -> Infallible {
    match result {
        Ok(summary) => info!(
            "Done: {} bytes played in {} chunks",
            summary.bytes_written, summary.chunks
        ),
        Err(e) => error!("Fatal: {:?}", e),
    }
    info!("Rebooting in {} ms...", REBOOT_WAIT_MS);
    system.delay_ms(REBOOT_WAIT_MS).await;
    system.restart()
}
