//! I2S standard-mode channel configuration.
//!
//! The output path is SAI1 block A running as an I2S master in Philips
//! format. Everything about the channel is fixed at compile time; this module
//! only describes it and derives the clock numbers from it.
//!
//! # Clock chain
//!
//! ```text
//! PLL3P → SAI1 kernel clock → MCLK_A = mclk_multiple × fs
//!                           → SCK_A  = bit width × 2 slots × fs
//! ```
//!
//! For the two shipped profiles at 16-bit / 256 fs:
//!
//! | Profile            | fs        | MCLK        | BCLK        |
//! |--------------------|-----------|-------------|-------------|
//! | mono, right slot   | 22 050 Hz | 5.6448 MHz  | 705.6 kHz   |
//! | stereo, both slots | 44 100 Hz | 11.2896 MHz | 1.4112 MHz  |
//!
//! The frame always carries two slots on the wire; in mono mode the mask
//! decides which one is driven.

use crate::audio_types::{DataBitWidth, MclkMultiple, SampleRateHz, SlotMask, SlotMode};
use crate::gpio::{self, PinId};

/// Channel role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sRole {
    /// This MCU generates MCLK, BCLK and WS.
    Master,
}

/// Serial format of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotFormat {
    /// Standard I2S: data lags WS by one bit clock.
    Philips,
}

/// Clock section of the channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sClockConfig {
    /// Frame rate.
    pub sample_rate: SampleRateHz,
    /// MCLK = multiple × fs.
    pub mclk_multiple: MclkMultiple,
}

/// Slot section of the channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sSlotConfig {
    /// Sample word width.
    pub data_bit_width: DataBitWidth,
    /// Words per frame taken from memory.
    pub slot_mode: SlotMode,
    /// Slots driven on the wire.
    pub slot_mask: SlotMask,
    /// Serial format.
    pub format: SlotFormat,
}

impl I2sSlotConfig {
    /// Philips slot defaults for a bit width and mode: both slots driven.
    #[must_use]
    pub fn philips(data_bit_width: DataBitWidth, slot_mode: SlotMode) -> Self {
        Self {
            data_bit_width,
            slot_mode,
            slot_mask: SlotMask::Both,
            format: SlotFormat::Philips,
        }
    }
}

/// Per-signal inversion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InvertFlags {
    /// Invert MCLK.
    pub mclk: bool,
    /// Invert BCLK (sample on the falling edge).
    pub bclk: bool,
    /// Invert WS (left slot on WS high).
    pub ws: bool,
}

/// Pin assignment of the I2S channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sPins {
    /// Master clock out.
    pub mclk: PinId,
    /// Bit clock.
    pub bclk: PinId,
    /// Word select / frame sync.
    pub ws: PinId,
    /// Serial data out.
    pub dout: PinId,
    /// Serial data in; `None` on a transmit-only board.
    pub din: Option<PinId>,
    /// Signal inversion.
    pub invert: InvertFlags,
}

/// Reasons an [`I2sStdConfig`] is rejected before reaching the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sConfigError {
    /// Two signals are assigned to the same pin.
    #[error("I2S pin assigned twice")]
    DuplicatePin,
    /// Stereo data needs both slots driven.
    #[error("stereo slot mode requires both slots in the mask")]
    StereoNeedsBothSlots,
}

/// Complete standard-mode channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sStdConfig {
    /// Which side drives the clocks.
    pub role: I2sRole,
    /// Clocking.
    pub clock: I2sClockConfig,
    /// Slot layout.
    pub slot: I2sSlotConfig,
    /// Pin assignment.
    pub pins: I2sPins,
}

impl I2sStdConfig {
    /// 22 050 Hz, 16-bit, mono, right slot only.
    ///
    /// This is the channel the original board programmed. Stereo material
    /// played through it comes out at half speed on one side.
    #[must_use]
    pub fn mono_right_22k05(pins: I2sPins) -> Self {
        let mut slot = I2sSlotConfig::philips(DataBitWidth::Bits16, SlotMode::Mono);
        slot.slot_mask = SlotMask::Right;
        Self {
            role: I2sRole::Master,
            clock: I2sClockConfig {
                sample_rate: SampleRateHz::HZ_22_050,
                mclk_multiple: MclkMultiple::X256,
            },
            slot,
            pins,
        }
    }

    /// 44 100 Hz, 16-bit, stereo, both slots: the documented file format.
    #[must_use]
    pub fn stereo_44k1(pins: I2sPins) -> Self {
        Self {
            role: I2sRole::Master,
            clock: I2sClockConfig {
                sample_rate: SampleRateHz::HZ_44_100,
                mclk_multiple: MclkMultiple::X256,
            },
            slot: I2sSlotConfig::philips(DataBitWidth::Bits16, SlotMode::Stereo),
            pins,
        }
    }

    /// Master clock frequency in Hz: `mclk_multiple × fs`.
    #[must_use]
    pub fn mclk_hz(&self) -> u32 {
        self.clock
            .sample_rate
            .get()
            .saturating_mul(u32::from(self.clock.mclk_multiple.get()))
    }

    /// Bit clock frequency in Hz: `bits × 2 slots × fs`.
    ///
    /// The frame is always two slots wide on the wire, also in mono mode.
    #[must_use]
    pub fn bclk_hz(&self) -> u32 {
        u32::from(self.slot.data_bit_width.bits())
            .saturating_mul(2)
            .saturating_mul(self.clock.sample_rate.get())
    }

    /// Bytes of PCM the channel consumes per frame.
    #[must_use]
    pub fn frame_bytes(&self) -> u32 {
        u32::from(self.slot.data_bit_width.bytes_per_sample())
            .saturating_mul(u32::from(self.slot.slot_mode.words_per_frame()))
    }

    /// Bytes of PCM consumed per second of playback.
    #[must_use]
    pub fn byte_rate(&self) -> u32 {
        self.frame_bytes()
            .saturating_mul(self.clock.sample_rate.get())
    }

    /// Check the configuration for inconsistencies the peripheral would not report.
    ///
    /// A mismatch between this configuration and the file being played is
    /// deliberately not checked here.
    ///
    /// # Errors
    ///
    /// See [`I2sConfigError`].
    pub fn validate(&self) -> Result<(), I2sConfigError> {
        let p = &self.pins;
        let mut pins: heapless::Vec<PinId, 5> = heapless::Vec::new();
        for pin in [Some(p.mclk), Some(p.bclk), Some(p.ws), Some(p.dout), p.din]
            .into_iter()
            .flatten()
        {
            // Capacity equals the number of candidates.
            let _ = pins.push(pin);
        }
        if !gpio::all_distinct(&pins) {
            return Err(I2sConfigError::DuplicatePin);
        }
        if self.slot.slot_mode == SlotMode::Stereo && self.slot.slot_mask != SlotMask::Both {
            return Err(I2sConfigError::StereoNeedsBothSlots);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::gpio::Port;

    fn pins() -> I2sPins {
        I2sPins {
            mclk: PinId::new(Port::E, 2),
            bclk: PinId::new(Port::E, 5),
            ws: PinId::new(Port::E, 4),
            dout: PinId::new(Port::E, 6),
            din: None,
            invert: InvertFlags::default(),
        }
    }

    #[test]
    fn mono_profile_is_22k05_right_slot() {
        let cfg = I2sStdConfig::mono_right_22k05(pins());
        assert_eq!(cfg.clock.sample_rate.get(), 22_050);
        assert_eq!(cfg.slot.data_bit_width, DataBitWidth::Bits16);
        assert_eq!(cfg.slot.slot_mode, SlotMode::Mono);
        assert_eq!(cfg.slot.slot_mask, SlotMask::Right);
        assert_eq!(cfg.role, I2sRole::Master);
    }

    #[test]
    fn stereo_profile_is_44k1_both_slots() {
        let cfg = I2sStdConfig::stereo_44k1(pins());
        assert_eq!(cfg.clock.sample_rate.get(), 44_100);
        assert_eq!(cfg.slot.slot_mode, SlotMode::Stereo);
        assert_eq!(cfg.slot.slot_mask, SlotMask::Both);
    }

    #[test]
    fn mono_clock_numbers() {
        let cfg = I2sStdConfig::mono_right_22k05(pins());
        assert_eq!(cfg.mclk_hz(), 5_644_800);
        assert_eq!(cfg.bclk_hz(), 705_600);
        assert_eq!(cfg.frame_bytes(), 2);
        assert_eq!(cfg.byte_rate(), 44_100);
    }

    #[test]
    fn stereo_clock_numbers() {
        let cfg = I2sStdConfig::stereo_44k1(pins());
        assert_eq!(cfg.mclk_hz(), 11_289_600);
        assert_eq!(cfg.bclk_hz(), 1_411_200);
        assert_eq!(cfg.frame_bytes(), 4);
        assert_eq!(cfg.byte_rate(), 176_400);
    }

    #[test]
    fn mclk_bclk_ratio_is_power_of_two() {
        for cfg in [
            I2sStdConfig::mono_right_22k05(pins()),
            I2sStdConfig::stereo_44k1(pins()),
        ] {
            let ratio = cfg.mclk_hz() / cfg.bclk_hz();
            assert!(ratio.is_power_of_two(), "MCLK/BCLK ratio {ratio}");
        }
    }

    #[test]
    fn both_profiles_validate() {
        assert!(I2sStdConfig::mono_right_22k05(pins()).validate().is_ok());
        assert!(I2sStdConfig::stereo_44k1(pins()).validate().is_ok());
    }

    #[test]
    fn duplicate_pin_rejected() {
        let mut p = pins();
        p.din = Some(p.dout);
        let cfg = I2sStdConfig::stereo_44k1(p);
        assert_eq!(cfg.validate(), Err(I2sConfigError::DuplicatePin));
    }

    #[test]
    fn stereo_with_single_slot_rejected() {
        let mut cfg = I2sStdConfig::stereo_44k1(pins());
        cfg.slot.slot_mask = SlotMask::Left;
        assert_eq!(cfg.validate(), Err(I2sConfigError::StereoNeedsBothSlots));
    }
}
