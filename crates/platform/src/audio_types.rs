//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common I2S configuration errors:
//! - `SampleRateHz`: validates the 8000–192000 Hz range the SAI clock tree can reach
//! - `DataBitWidth`: the sample width the WAV path carries
//! - `SlotMask`: which hardware slot(s) carry data, independent of the file layout

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the SAI1 master clock can produce.
///
/// Valid range: 8000–192000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 192000 Hz.
    pub const MAX_HZ: u32 = 192_000;

    /// 22.05 kHz, half the CD rate.
    pub const HZ_22_050: Self = Self(22_050);

    /// 44.1 kHz, the CD rate.
    pub const HZ_44_100: Self = Self(44_100);

    /// Create a `SampleRateHz`, returning an error if out of 8000–192000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 192000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── DataBitWidth ─────────────────────────────────────────────────────────────

/// Width of one sample word on the I2S data line.
///
/// The WAV path only carries 16-bit little-endian PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBitWidth {
    /// 16-bit samples.
    Bits16,
}

impl DataBitWidth {
    /// Number of significant bits per sample.
    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
        }
    }

    /// Bytes one sample occupies in memory and in the file.
    #[must_use]
    pub fn bytes_per_sample(self) -> u8 {
        match self {
            Self::Bits16 => 2,
        }
    }
}

// ── Slot layout ──────────────────────────────────────────────────────────────

/// How many data words the peripheral expects per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotMode {
    /// One word per frame, duplicated or masked onto the active slot(s).
    Mono,
    /// Two interleaved words per frame (left, right).
    Stereo,
}

impl SlotMode {
    /// Words consumed from memory per frame.
    #[must_use]
    pub fn words_per_frame(self) -> u8 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Which hardware slots are driven.
///
/// With [`SlotMode::Mono`] and a single-slot mask, the opposite slot is left
/// silent regardless of what the source file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotMask {
    /// Left slot only (word-select low).
    Left,
    /// Right slot only (word-select high).
    Right,
    /// Both slots.
    Both,
}

impl SlotMask {
    /// Bitmask over the two hardware slots, bit 0 = left, bit 1 = right.
    ///
    /// Matches the layout of the SAI `SLOTEN` field for a two-slot frame.
    #[must_use]
    pub fn bits(self) -> u16 {
        match self {
            Self::Left => 0b01,
            Self::Right => 0b10,
            Self::Both => 0b11,
        }
    }

    /// Number of slots carrying data.
    #[must_use]
    pub fn active_slots(self) -> u8 {
        match self {
            Self::Left | Self::Right => 1,
            Self::Both => 2,
        }
    }
}

/// MCLK multiplier: MCLK = multiple × fs.
///
/// The SAI divider table in `firmware::audio_clock` is built for 256 fs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MclkMultiple {
    /// 256 × fs.
    X256,
}

impl MclkMultiple {
    /// Numeric multiplier.
    #[must_use]
    pub fn get(self) -> u16 {
        match self {
            Self::X256 => 256,
        }
    }
}
