//! WAV playback core: skip the fixed header, stream raw PCM to an I²S channel
#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![allow(async_fn_in_trait)]

pub mod stream;

pub use stream::{stream_pcm, stream_pcm_with, StreamError, StreamReport, WAV_HEADER_LEN};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
mod tests {
    use platform::mocks::{MockError, MockI2s, MockStorage, TxEvent};
    use platform::Storage;

    use crate::stream::{stream_pcm, stream_pcm_with, StreamError, WAV_HEADER_LEN};

    const BUF: usize = 4096;

    fn wav(body: usize) -> Vec<u8> {
        let mut data = vec![0xAAu8; WAV_HEADER_LEN as usize];
        data.extend((0..body).map(|i| (i % 251) as u8));
        data
    }

    fn storage(data: Vec<u8>) -> MockStorage {
        MockStorage::new("/sdcard").with_file("2.wav", data)
    }

    /// Header skip and chunking
    mod chunking_tests {
        use super::*;

        #[tokio::test]
        async fn test_two_full_chunks_for_8192_byte_body() {
            let mut sd = storage(wav(8192));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let report = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            assert_eq!(log.writes(), [4096, 4096]);
            assert_eq!(report.bytes_written, 8192);
            assert_eq!(report.chunks, 2);
            assert_eq!(report.largest_chunk, 4096);
        }

        #[tokio::test]
        async fn test_header_bytes_never_reach_channel() {
            let mut sd = storage(wav(100));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            let expected: Vec<u8> = (0..100).map(|i| (i % 251) as u8).collect();
            assert_eq!(log.bytes(), expected);
        }

        #[tokio::test]
        async fn test_partial_last_chunk() {
            let mut sd = storage(wav(4096 + 10));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let report = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            assert_eq!(log.writes(), [4096, 10]);
            assert_eq!(report.bytes_written, 4106);
        }

        #[tokio::test]
        async fn test_header_only_file_writes_nothing() {
            for len in [0usize, 10, 44] {
                let mut sd = storage(vec![0u8; len]);
                let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
                let mut tx = MockI2s::new();
                let log = tx.log();
                let mut buf = [0u8; BUF];

                let report = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

                assert_eq!(report.bytes_written, 0, "len {len}");
                assert!(log.writes().is_empty(), "len {len}");
                assert_eq!(file.reads(), 1, "exactly one read after the seek");
            }
        }

        #[tokio::test]
        async fn test_every_read_reports_its_length() {
            let mut sd = storage(wav(5000));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let mut buf = [0u8; BUF];
            let mut seen = Vec::new();

            stream_pcm_with(&mut file, &mut tx, &mut buf, |n| seen.push(n))
                .await
                .unwrap();

            assert_eq!(seen, [4096, 904, 0]);
        }
    }

    /// Channel enable/disable ordering
    mod channel_tests {
        use super::*;

        #[tokio::test]
        async fn test_enable_once_before_writes_disable_once_after() {
            let mut sd = storage(wav(10_000));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            let events = log.events();
            assert_eq!(log.count(TxEvent::Enable), 1);
            assert_eq!(log.count(TxEvent::Disable), 1);
            assert_eq!(events.first(), Some(&TxEvent::Enable));
            assert_eq!(events.last(), Some(&TxEvent::Disable));
        }

        #[tokio::test]
        async fn test_empty_body_still_toggles_channel() {
            let mut sd = storage(wav(0));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            assert_eq!(log.events(), [TxEvent::Enable, TxEvent::Disable]);
        }

        #[tokio::test]
        async fn test_short_writes_are_reoffered() {
            let mut sd = storage(wav(4096));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new().with_max_accept(1000);
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let report = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap();

            assert_eq!(log.writes(), [1000, 1000, 1000, 1000, 96]);
            assert_eq!(report.bytes_written, 4096);
            assert_eq!(report.chunks, 1);
        }
    }

    /// Failure handling
    mod error_tests {
        use super::*;

        #[tokio::test]
        async fn test_write_failure_still_disables() {
            let mut sd = storage(wav(10_000));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new().failing_write_at(1);
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let err = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap_err();

            assert_eq!(err, StreamError::Write(MockError::Injected));
            assert_eq!(log.events().last(), Some(&TxEvent::Disable));
            assert!(!tx.is_enabled());
        }

        #[tokio::test]
        async fn test_stalled_channel_reported() {
            let mut sd = storage(wav(100));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new().stalling_write_at(0);
            let mut buf = [0u8; BUF];

            let err = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap_err();

            assert_eq!(err, StreamError::Stalled);
        }

        #[tokio::test]
        async fn test_read_failure_mid_stream() {
            let mut sd = storage(wav(10_000)).failing_read_at(WAV_HEADER_LEN + 4096);
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let err = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap_err();

            assert_eq!(err, StreamError::Read(MockError::Injected));
            assert_eq!(log.writes(), [4096]);
            assert_eq!(log.count(TxEvent::Disable), 1);
        }

        #[tokio::test]
        async fn test_first_read_failure_never_enables() {
            let mut sd = storage(wav(10)).failing_read_at(0);
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new();
            let log = tx.log();
            let mut buf = [0u8; BUF];

            let err = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap_err();

            assert_eq!(err, StreamError::Read(MockError::Injected));
            assert!(log.events().is_empty());
        }

        #[tokio::test]
        async fn test_enable_failure_is_channel_error() {
            let mut sd = storage(wav(10));
            let mut file = sd.open_file("/sdcard/2.wav").await.unwrap();
            let mut tx = MockI2s::new().failing_enable();
            let mut buf = [0u8; BUF];

            let err = stream_pcm(&mut file, &mut tx, &mut buf).await.unwrap_err();

            assert_eq!(err, StreamError::Channel(MockError::Injected));
        }
    }
}
