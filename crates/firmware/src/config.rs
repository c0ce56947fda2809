//! Compile-time board configuration.
//!
//! Everything the player needs to know about the board and the medium is a
//! constant here. There is no runtime configuration: changing the file,
//! the pins or the output format means rebuilding.

use platform::audio_config::{I2sPins, I2sStdConfig, InvertFlags};
use platform::gpio::{PinId, Port};
use platform::storage_config::{
    MountConfig, SdCardConfig, SdSpiDeviceConfig, SpiBusConfig, SpiMode,
};

// ── Medium ───────────────────────────────────────────────────────────────────

/// Where the card's FAT volume is mounted.
pub const MOUNT_POINT: &str = "/sdcard";

/// The one file that is played.
pub const WAV_FILE: &str = "/sdcard/2.wav";

// ── Transfer buffer ──────────────────────────────────────────────────────────

/// 16-bit samples per read/write chunk.
pub const AUDIO_BUFFER_SAMPLES: usize = 2048;

/// Bytes per read/write chunk.
pub const AUDIO_BUFFER_BYTES: usize = AUDIO_BUFFER_SAMPLES * 2;

/// Words in the SAI circular DMA ring: two chunk-sized halves.
///
/// At 22.05 kHz mono one half lasts ~93 ms; at 44.1 kHz stereo ~23 ms.
pub const SAI_DMA_RING_WORDS: usize = AUDIO_BUFFER_SAMPLES * 2;

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Pause between the end of a run (good or bad) and the restart.
pub const REBOOT_WAIT_MS: u32 = 5000;

// ── SPI2: SD card ────────────────────────────────────────────────────────────

/// SPI2_SCK
pub const SD_SCK: PinId = PinId::new(Port::B, 13);
/// SPI2_MISO
pub const SD_MISO: PinId = PinId::new(Port::B, 14);
/// SPI2_MOSI
pub const SD_MOSI: PinId = PinId::new(Port::B, 15);
/// Card chip select (GPIO, active low)
pub const SD_CS: PinId = PinId::new(Port::B, 12);

/// SD card bus, device and mount settings.
pub const SD_CARD: SdCardConfig = SdCardConfig {
    bus: SpiBusConfig {
        sclk: SD_SCK,
        mosi: SD_MOSI,
        miso: SD_MISO,
        max_transfer_bytes: SpiBusConfig::DEFAULT_MAX_TRANSFER_BYTES,
        frequency_hz: SpiBusConfig::DEFAULT_FREQUENCY_HZ,
        mode: SpiMode::Mode0,
    },
    device: SdSpiDeviceConfig {
        cs: SD_CS,
        card_detect: None,
        write_protect: None,
    },
    mount: MountConfig::new(MOUNT_POINT),
};

// ── SAI1 block A: I2S out ────────────────────────────────────────────────────

/// SAI1_MCLK_A
pub const I2S_MCLK: PinId = PinId::new(Port::E, 2);
/// SAI1_FS_A (word select)
pub const I2S_WS: PinId = PinId::new(Port::E, 4);
/// SAI1_SCK_A (bit clock)
pub const I2S_BCLK: PinId = PinId::new(Port::E, 5);
/// SAI1_SD_A (data out)
pub const I2S_DOUT: PinId = PinId::new(Port::E, 6);

/// I2S pin assignment. Transmit only, no inversion.
pub const I2S_PINS: I2sPins = I2sPins {
    mclk: I2S_MCLK,
    bclk: I2S_BCLK,
    ws: I2S_WS,
    dout: I2S_DOUT,
    din: None,
    invert: InvertFlags {
        mclk: false,
        bclk: false,
        ws: false,
    },
};

// ── Output format ────────────────────────────────────────────────────────────

/// Which channel format the I2S output is programmed with.
///
/// The file is never inspected, so this has to match the material on the
/// card. A mismatch plays at the wrong speed rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputProfile {
    /// 22 050 Hz, 16-bit, mono, right slot only.
    OriginalMonoRight22k05,
    /// 44 100 Hz, 16-bit, stereo.
    DocumentedStereo44k1,
}

impl OutputProfile {
    /// Channel configuration for this profile.
    #[must_use]
    pub fn std_config(self, pins: I2sPins) -> I2sStdConfig {
        match self {
            Self::OriginalMonoRight22k05 => I2sStdConfig::mono_right_22k05(pins),
            Self::DocumentedStereo44k1 => I2sStdConfig::stereo_44k1(pins),
        }
    }
}

/// Output format used by the firmware.
pub const OUTPUT_PROFILE: OutputProfile = OutputProfile::OriginalMonoRight22k05;
