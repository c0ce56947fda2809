//! Application identity constants
//!
//! Branding and version strings shared by the firmware banner and the
//! desktop emulator. Board wiring lives in `firmware::config`.

/// The application name
pub const APP_NAME: &str = "SD WAV Player";

/// Short name used as the log target prefix
pub const APP_NAME_SHORT: &str = "wav-player";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target board
pub const BOARD: &str = "STM32H743ZI";

/// Banner shown on the emulator console
pub const fn emulator_banner() -> &'static str {
    "SD WAV Player - Desktop Emulator"
}
