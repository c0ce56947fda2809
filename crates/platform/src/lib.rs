//! Hardware Abstraction Layer (HAL) for the SD WAV player
//!
//! This crate provides the trait seams and configuration types the player
//! is written against, so the same application code runs on the board and
//! on a desktop host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Streaming core (playback crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (embassy-stm32 SPI2 + SAI1, embedded-sdmmc)
//! ```
//!
//! # Seams
//!
//! - [`SdSpiHost`] - SPI bus bring-up and SD card mount
//! - [`Storage`] / [`File`] - Read-only access to the mounted volume
//! - [`I2sTx`] - I2S transmit channel
//! - [`SystemControl`] - Delay and restart
//!
//! # Features
//!
//! - `std`: Host directory storage ([`storage_local`]) and [`mocks`]
//! - `defmt`: Enable `defmt::Format` on all types
//!
//! # Example
//!
//! ```no_run
//! use platform::{File, I2sTx};
//!
//! async fn one_chunk<F: File, T: I2sTx>(file: &mut F, tx: &mut T) {
//!     let mut buf = [0u8; 512];
//!     let n = file.read(&mut buf).await.unwrap();
//!     tx.write(&buf[..n]).await.unwrap();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

#[cfg(feature = "std")]
extern crate std;

pub mod audio;
pub mod audio_config;
pub mod audio_types;
pub mod config;
pub mod dma_safety;
pub mod gpio;
pub mod mocks;
pub mod sdcard;
pub mod storage;
pub mod storage_config;
#[cfg(any(test, feature = "std"))]
pub mod storage_local;
pub mod system;

// Re-export main high-level traits
pub use audio::I2sTx;
pub use sdcard::{CardInfo, MountFault, Mounted, SdSpiHost, SpeedClass};
pub use storage::{File, Storage};
pub use system::SystemControl;

// Re-export configuration types
pub use audio_config::{I2sConfigError, I2sPins, I2sStdConfig};
pub use gpio::{PinId, Port};
pub use storage_config::{MountConfig, SdCardConfig, SdSpiDeviceConfig, SpiBusConfig, SpiMode};
