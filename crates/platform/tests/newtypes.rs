//! Type system enforcement tests for audio domain newtypes.
//! These newtypes keep I2S channel configuration bugs out of the SAI setup.

#![allow(clippy::unwrap_used)]

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_hz_accepts_both_preset_rates() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(SampleRateHz::new(22_050).unwrap(), SampleRateHz::HZ_22_050);
    assert_eq!(SampleRateHz::new(44_100).unwrap(), SampleRateHz::HZ_44_100);
}

#[test]
fn sample_rate_hz_rejects_below_8000() {
    use platform::audio_types::SampleRateHz;
    let err = SampleRateHz::new(7_999).unwrap_err();
    assert_eq!(err.value, 7_999);
    assert_eq!(err.min, 8_000);
}

#[test]
fn sample_rate_hz_rejects_above_192000() {
    use platform::audio_types::SampleRateHz;
    assert!(SampleRateHz::new(192_001).is_err());
    assert!(SampleRateHz::new(192_000).is_ok());
}

#[test]
fn sample_rate_hz_is_four_bytes() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

// ── DataBitWidth / SlotMode / SlotMask ───────────────────────────────────────

#[test]
fn data_bit_width_matches_wav_sample() {
    use platform::audio_types::DataBitWidth;
    assert_eq!(DataBitWidth::Bits16.bits(), 16);
    assert_eq!(DataBitWidth::Bits16.bytes_per_sample(), 2);
    assert_eq!(
        u32::from(DataBitWidth::Bits16.bits()),
        8 * u32::from(DataBitWidth::Bits16.bytes_per_sample())
    );
}

#[test]
fn slot_mode_words_per_frame() {
    use platform::audio_types::SlotMode;
    assert_eq!(SlotMode::Mono.words_per_frame(), 1);
    assert_eq!(SlotMode::Stereo.words_per_frame(), 2);
}

#[test]
fn slot_mask_bits_match_sai_slot_enable() {
    use platform::audio_types::SlotMask;
    assert_eq!(SlotMask::Left.bits(), 0b01);
    assert_eq!(SlotMask::Right.bits(), 0b10);
    assert_eq!(SlotMask::Both.bits(), 0b11);
    assert_eq!(SlotMask::Right.active_slots(), 1);
    assert_eq!(SlotMask::Both.active_slots(), 2);
}

#[test]
fn mclk_multiple_is_256() {
    use platform::audio_types::MclkMultiple;
    assert_eq!(MclkMultiple::X256.get(), 256);
}

// ── PinId ────────────────────────────────────────────────────────────────────

#[test]
fn pin_id_displays_as_port_and_index() {
    use platform::gpio::{PinId, Port};
    assert_eq!(format!("{}", PinId::new(Port::E, 5)), "PE5");
    assert_eq!(format!("{}", PinId::new(Port::B, 13)), "PB13");
}
