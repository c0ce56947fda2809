//! Raw PCM streaming from a WAV file to an I2S transmit channel.
//!
//! The file is assumed to be a canonical 16-bit PCM WAV with a 44-byte
//! header. The header is skipped without being read; every byte after it is
//! sent to the channel as-is, in chunks no larger than the transfer buffer.
//!
//! ```text
//!   seek(44) ─► read ─► enable ─► ┌─ write chunk (until accepted) ─┐
//!                                 └──────────── read ◄─────────────┘
//!                                        │ read == 0
//!                                        ▼
//!                                     disable
//! ```
//!
//! The channel is enabled after the first read so the DMA ring is never
//! started empty. A file of 44 bytes or less still enables and disables the
//! channel, but writes nothing.

use platform::{File, I2sTx};

/// Size of the canonical RIFF/WAVE header. Skipped unconditionally.
pub const WAV_HEADER_LEN: u64 = 44;

/// Summary of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamReport {
    /// PCM bytes accepted by the channel.
    pub bytes_written: u64,
    /// Non-empty reads forwarded to the channel.
    pub chunks: u32,
    /// Largest single read, in bytes.
    pub largest_chunk: usize,
}

/// Streaming failure.
///
/// `R` is the file error, `W` the channel error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError<R, W> {
    /// Seeking past the header or reading a chunk failed.
    #[error("file read failed: {0:?}")]
    Read(R),
    /// The channel rejected a write.
    #[error("channel write failed: {0:?}")]
    Write(W),
    /// Enabling or disabling the channel failed.
    #[error("channel enable/disable failed: {0:?}")]
    Channel(W),
    /// The channel accepted zero bytes of a non-empty chunk.
    #[error("channel accepted no data")]
    Stalled,
}

/// Stream the PCM body of `file` to `tx` through `buf`.
///
/// Equivalent to [`stream_pcm_with`] with no per-chunk callback.
///
/// # Errors
///
/// See [`StreamError`]. The channel is disabled before an error is returned
/// whenever it had been enabled.
pub async fn stream_pcm<F: File, T: I2sTx>(
    file: &mut F,
    tx: &mut T,
    buf: &mut [u8],
) -> Result<StreamReport, StreamError<F::Error, T::Error>> {
    stream_pcm_with(file, tx, buf, |_| {}).await
}

/// Stream the PCM body of `file` to `tx` through `buf`, calling `on_chunk`
/// with the length of every read (including the final zero-length one).
///
/// Every read requests exactly `buf.len()` bytes.
///
/// # Errors
///
/// See [`StreamError`]. The channel is disabled before an error is returned
/// whenever it had been enabled.
pub async fn stream_pcm_with<F, T, C>(
    file: &mut F,
    tx: &mut T,
    buf: &mut [u8],
    mut on_chunk: C,
) -> Result<StreamReport, StreamError<F::Error, T::Error>>
where
    F: File,
    T: I2sTx,
    C: FnMut(usize),
{
    file.seek(WAV_HEADER_LEN).await.map_err(StreamError::Read)?;
    let first = file.read(buf).await.map_err(StreamError::Read)?;
    on_chunk(first);

    tx.enable().await.map_err(StreamError::Channel)?;
    let pumped = pump(file, tx, buf, first, &mut on_chunk).await;
    let disabled = tx.disable().await;

    let report = pumped?;
    disabled.map_err(StreamError::Channel)?;
    Ok(report)
}

async fn pump<F, T, C>(
    file: &mut F,
    tx: &mut T,
    buf: &mut [u8],
    first: usize,
    on_chunk: &mut C,
) -> Result<StreamReport, StreamError<F::Error, T::Error>>
where
    F: File,
    T: I2sTx,
    C: FnMut(usize),
{
    let mut report = StreamReport::default();
    let mut n = first;
    while n > 0 {
        let len = n.min(buf.len());
        let chunk = buf.get(..len).unwrap_or_default();
        write_all(tx, chunk).await?;

        report.bytes_written = report.bytes_written.saturating_add(len as u64);
        report.chunks = report.chunks.saturating_add(1);
        report.largest_chunk = report.largest_chunk.max(len);

        n = file.read(buf).await.map_err(StreamError::Read)?;
        on_chunk(n);
    }
    Ok(report)
}

/// Offer `bytes` until the channel has taken all of them.
async fn write_all<T: I2sTx, R>(tx: &mut T, mut bytes: &[u8]) -> Result<(), StreamError<R, T::Error>> {
    while !bytes.is_empty() {
        let accepted = tx.write(bytes).await.map_err(StreamError::Write)?;
        if accepted == 0 {
            return Err(StreamError::Stalled);
        }
        bytes = bytes.get(accepted..).unwrap_or_default();
    }
    Ok(())
}
