//! I2S channel setup and WAV playback.

use platform::audio::I2sTx;
use platform::audio_config::I2sPins;
use platform::storage::{File, Storage};
use playback::{stream_pcm_with, StreamReport};

use crate::config::{OutputProfile, AUDIO_BUFFER_BYTES};
use crate::error::{I2sSetupError, PlayError};
use crate::fmt::Dbg;

/// Program `tx` for `profile` on `pins`.
///
/// # Errors
///
/// [`I2sSetupError::Config`] if the configuration does not validate,
/// [`I2sSetupError::Driver`] if the peripheral rejects it.
pub async fn i2s_setup<T: I2sTx>(
    tx: &mut T,
    profile: OutputProfile,
    pins: I2sPins,
) -> Result<(), I2sSetupError> {
    let config = profile.std_config(pins);
    config.validate()?;
    info!(
        "I2S std mode: {} Hz, {} bit, {} slot(s), MCLK {} Hz",
        config.clock.sample_rate.get(),
        config.slot.data_bit_width.bits(),
        config.slot.slot_mask.active_slots(),
        config.mclk_hz(),
    );
    tx.init_std_mode(&config).await.map_err(|e| {
        error!("Failed to configure I2S channel: {:?}", Dbg(&e));
        I2sSetupError::Driver
    })
}

/// Play `path` from `storage` on `tx`.
///
/// The first 44 bytes are skipped without looking at them; the rest is sent
/// as-is in [`AUDIO_BUFFER_BYTES`] chunks. The channel is left disabled.
///
/// # Errors
///
/// [`PlayError::Open`] if the file cannot be opened, in which case the
/// channel is not touched. Otherwise the streaming failure.
pub async fn play_wav<S: Storage, T: I2sTx>(
    storage: &mut S,
    tx: &mut T,
    path: &str,
) -> Result<StreamReport, PlayError> {
    let mut file = match storage.open_file(path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to open file {}: {:?}", path, Dbg(&e));
            return Err(PlayError::Open);
        }
    };
    debug!("Opened {} ({} bytes)", path, file.size());

    #[allow(clippy::large_stack_arrays)]
    let mut buf = [0u8; AUDIO_BUFFER_BYTES];
    let report = stream_pcm_with(&mut file, tx, &mut buf, |n| trace!("Bytes read: {}", n))
        .await
        .map_err(|e| {
            error!("Playback aborted: {:?}", Dbg(&e));
            PlayError::from(e)
        })?;

    info!(
        "Playback finished: {} bytes in {} chunks",
        report.bytes_written, report.chunks
    );
    Ok(report)
}
