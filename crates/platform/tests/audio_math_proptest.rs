//! Property-based tests for I2S clock math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::audio_config::{I2sPins, I2sStdConfig, InvertFlags};
use platform::audio_types::{DataBitWidth, SampleRateHz, SlotMode};
use platform::gpio::{PinId, Port};

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

proptest::proptest! {
    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        let _ = SampleRateHz::new(hz);
    }

    /// SampleRateHz valid range [8000, 192000] always succeeds.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8000u32..=192_000u32) {
        assert!(SampleRateHz::new(hz).is_ok(),
            "SampleRateHz::new({}) should be Ok within [8000, 192000]", hz);
    }

    /// SampleRateHz out of range always fails.
    #[test]
    fn sample_rate_hz_out_of_range_always_err(hz in 192_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err(),
            "SampleRateHz::new({}) should be Err above 192000", hz);
    }

    /// BCLK is always 32 × fs for 16-bit slots, mono or stereo.
    #[test]
    fn bclk_is_two_16_bit_slots_per_frame(hz in 8000u32..=192_000u32, stereo in proptest::bool::ANY) {
        let mut cfg = if stereo {
            I2sStdConfig::stereo_44k1(pins())
        } else {
            I2sStdConfig::mono_right_22k05(pins())
        };
        cfg.clock.sample_rate = SampleRateHz::new(hz).unwrap();
        assert_eq!(u64::from(cfg.bclk_hz()), u64::from(hz) * 32);
    }

    /// MCLK = 256 × fs stays within the SAI limit for every valid rate.
    #[test]
    fn mclk_256fs_always_validates(hz in 8000u32..=192_000u32) {
        let mut cfg = I2sStdConfig::stereo_44k1(pins());
        cfg.clock.sample_rate = SampleRateHz::new(hz).unwrap();
        assert_eq!(u64::from(cfg.mclk_hz()), u64::from(hz) * 256);
        assert!(cfg.validate().is_ok());
    }

    /// Byte rate = fs × frame bytes, and a stereo frame is twice a mono one.
    #[test]
    fn byte_rate_scales_with_slot_mode(hz in 8000u32..=192_000u32) {
        let mut mono = I2sStdConfig::mono_right_22k05(pins());
        mono.clock.sample_rate = SampleRateHz::new(hz).unwrap();
        let mut stereo = I2sStdConfig::stereo_44k1(pins());
        stereo.clock.sample_rate = SampleRateHz::new(hz).unwrap();
        assert_eq!(mono.slot.data_bit_width, DataBitWidth::Bits16);
        assert_eq!(mono.slot.slot_mode, SlotMode::Mono);
        assert_eq!(stereo.byte_rate(), mono.byte_rate() * 2);
    }
}
