//! PLL3 audio clock for SAI1, 44.1 kHz family.
//!
//! Both output profiles (22 050 Hz and 44 100 Hz at 256 fs) divide evenly
//! from one SAI kernel clock of 1024 × 44 100 Hz = 45.1584 MHz. SAI1 then
//! derives MCLK with its integer MCKDIV:
//!
//! | Profile          | MCLK           | MCKDIV |
//! |------------------|----------------|--------|
//! | 44 100 Hz stereo | 11.2896 MHz    | 4      |
//! | 22 050 Hz mono   |  5.6448 MHz    | 8      |
//!
//! # Clock Tree
//!
//!   HSI (64 MHz) -> PLL3M (div 4) -> VCO_IN (16 MHz)
//!                                  -> VCO_OUT (x45.1584 = 722.53 MHz)
//!                                    -> PLL3P (div 16) = 45.1584 MHz [FRACN=1298]
//!                                       |
//!                                    SAI1 kernel clock -> MCKDIV -> SAI1_MCLK_A (PE2)
//!
//! # PLL3 Formula
//!
//!   VCO_INPUT  = HSI / PLL3M
//!   VCO_OUTPUT = VCO_INPUT * (PLL3N + PLL3FRACN / 8192)
//!   PLL3P_CLK  = VCO_OUTPUT / PLL3P
//!
//! FRACN = round(0.1584 x 8192) = round(1297.61) = 1298, giving
//! 64 000 000 x 369 938 / 524 288 = 45 158 447 Hz (47 Hz high, ~1 ppm).
//!
//! References:
//! - STM32H7 RM0433 Rev 9, S8.7.14 (PLL configuration, VCO ranges)
//! - STM32H7 RM0433 Rev 9, S8.7.15 (fractional PLL, FRACN field)
//! - STM32H7 RM0433 Rev 9, S51.4.8 (SAI clock generator, MCKDIV)

/// HSI oscillator frequency (Hz) -- internal 64 MHz RC oscillator on STM32H743.
pub const HSI_HZ: u32 = 64_000_000;

/// Target SAI1 kernel clock: 1024 x 44 100 Hz.
pub const SAI_KERNEL_TARGET_HZ: u32 = 45_158_400;

/// PLL3 M predivider: HSI / 4 = 16 MHz VCO input.
/// Corresponds to PllPreDiv::DIV4 in embassy-stm32.
pub const PLL3_M: u32 = 4;

/// PLL3 N multiplier: VCO = 16 MHz x 45 = 720 MHz before FRACN.
/// Corresponds to PllMul::MUL45 in embassy-stm32.
pub const PLL3_N: u32 = 45;

/// PLL3 P divider.
/// Corresponds to PllDiv::DIV16 in embassy-stm32.
pub const PLL3_P: u32 = 16;

/// PLL3 fractional part (0-8191, 13-bit RCC_PLL3FRACR.FRACN field).
///
/// embassy-stm32 0.1.x does not expose FRACN through the Pll struct.
/// Applied via PAC right after init.
pub const PLL3_FRACN: u32 = 1298;

/// Computed PLL3P clock in Hz using full-precision u128 arithmetic.
// The intermediate u128 arithmetic prevents overflow; the final value (≈45 MHz) fits in u32.
#[allow(clippy::cast_possible_truncation)]
pub const PLL3P_HZ_APPROX: u32 = (HSI_HZ as u128
    * (PLL3_N as u128 * 8192 + PLL3_FRACN as u128)
    / (PLL3_M as u128 * 8192 * PLL3_P as u128)) as u32;

/// Maximum allowed kernel clock error (Hz), ~10 ppm.
pub const KERNEL_MAX_ERROR_HZ: u32 = 450;

/// Largest MCKDIV value SAI accepts.
pub const MAX_MCKDIV: u32 = 63;

/// SAI MCKDIV that turns the kernel clock into `sample_rate_hz x mclk_multiple`.
///
/// `None` if the rate is not an integer divisor of the kernel clock
/// (48 kHz family) or the divider is out of range.
pub fn mclk_divider(sample_rate_hz: u32, mclk_multiple: u32) -> Option<u32> {
    let mclk = sample_rate_hz.checked_mul(mclk_multiple)?;
    if SAI_KERNEL_TARGET_HZ.checked_rem(mclk)? != 0 {
        return None;
    }
    let div = SAI_KERNEL_TARGET_HZ.checked_div(mclk)?;
    (1..=MAX_MCKDIV).contains(&div).then_some(div)
}
