//! SD WAV Player Firmware
//!
//! Plays one WAV file from an SPI-attached SD card over I2S, then restarts.
//!
//! # Architecture
//!
//! This firmware follows a layered architecture:
//!
//! ```text
//! Application Layer (app: run sequence + restart handler)
//!         ↓
//! Steps (sdcard, player)
//!         ↓
//! Streaming core (playback crate)
//!         ↓
//! Platform HAL (SdSpiHost, Storage, I2sTx, SystemControl)
//!         ↓
//! Board (hardware: embassy-stm32 + embedded-sdmmc) | Desktop (emulator: std + tokio)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for STM32H743ZI (embassy, embedded-sdmmc, defmt)
//! - `emulator` - Build for desktop testing (tokio, tracing, host directory as card)
//! - `defmt` / `tracing` - Log back end (selected by the two above)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --bin wav-player-emulator --features emulator -- --sd-root ./sd
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)]

// Must stay first: the log macros are only visible to modules declared after it.
#[macro_use]
mod fmt;

pub mod app;
pub mod audio_clock;
pub mod config;
pub mod error;
pub mod pcm;
pub mod player;
pub mod sdcard;

#[cfg(feature = "hardware")]
pub mod hardware;

#[cfg(feature = "emulator")]
pub mod emulator;

// Re-export key types
pub use app::{finish, run, AppContext, RunSummary, BOOT_SEQUENCE_STEPS};
pub use config::{OutputProfile, OUTPUT_PROFILE};
pub use error::{FatalError, I2sSetupError, PlayError, SdCardError};
