//! STM32H743ZI board back end.
//!
//! Implements the platform seams on real peripherals:
//!
//! - [`sd_spi::SpiSdHost`]: SPI2 + `embedded-sdmmc` FAT volume
//! - [`sai::SaiTx`]: SAI1 block A as an I2S transmitter
//! - [`system::BoardSystem`]: `embassy-time` delay, SCB reset

pub mod sai;
pub mod sd_spi;
pub mod system;

use embassy_stm32::peripherals::{
    DMA1_CH0, PB12, PB13, PB14, PB15, PE2, PE4, PE5, PE6, SAI1, SPI2,
};

use crate::audio_clock::PLL3_FRACN;

/// SPI2 and its chip select, as wired to the card slot.
#[allow(non_snake_case)]
pub struct SdPins {
    /// SPI2 peripheral.
    pub SPI: SPI2,
    /// SPI2_SCK
    pub SCK: PB13,
    /// SPI2_MISO
    pub MISO: PB14,
    /// SPI2_MOSI
    pub MOSI: PB15,
    /// Chip select (GPIO)
    pub CS: PB12,
}

/// SAI1 block A, its DMA stream and pins.
#[allow(non_snake_case)]
pub struct SaiPins {
    /// SAI1 peripheral.
    pub SAI: SAI1,
    /// TX DMA stream.
    pub DMA: DMA1_CH0,
    /// SAI1_MCLK_A
    pub MCLK_A: PE2,
    /// SAI1_FS_A
    pub FS_A: PE4,
    /// SAI1_SCK_A
    pub SCK_A: PE5,
    /// SAI1_SD_A
    pub SD_A: PE6,
}

/// Clock tree for the player.
///
/// PLL1 drives the core (400 MHz) and the SPI2 kernel clock (PLL1_Q,
/// 200 MHz). PLL3_P carries the 44.1 kHz-family kernel clock from
/// [`crate::audio_clock`]. The `Config` of this embassy-stm32 release has
/// neither a FRACN field nor a SAI1 kernel mux, so [`apply_pll3_fracn`] and
/// [`select_sai1_kernel_clock`] finish the job after `init`.
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;

    // ── PLL1: system clock + SPI kernel clock ───────────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = 400 MHz → system clock, PLL1_Q = 200 MHz → SPI1/2/3
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: Some(PllDiv::DIV4),
        divr: None,
    });

    // ── PLL3: SAI1 kernel clock ─────────────────────────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(45) = 720 MHz VCO (before FRACN)
    // PLL3_P = VCO / divp(16) ≈ 45.1584 MHz once FRACN is applied
    config.rcc.pll3 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL45,
        divp: Some(PllDiv::DIV16),
        divq: None,
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

/// Trim PLL3 to the exact audio kernel clock.
///
/// Must run after `embassy_stm32::init` and before SAI1 is enabled.
pub fn apply_pll3_fracn() {
    use embassy_stm32::pac::RCC;

    // FRACN latches on the FRACEN rising edge (RM0433 S8.7.15).
    RCC.pllcfgr().modify(|w| w.set_pllfracen(2, false));
    RCC.pllfracr(2).write(|w| w.set_fracn(PLL3_FRACN as u16));
    RCC.pllcfgr().modify(|w| w.set_pllfracen(2, true));
}

/// Switch the SAI1 kernel clock from its reset source (PLL1_Q) to PLL3_P.
///
/// Must run after `embassy_stm32::init` and before SAI1 is enabled.
pub fn select_sai1_kernel_clock() {
    use embassy_stm32::pac::{rcc::vals::Saisel, RCC};

    RCC.d2ccip1r().modify(|w| w.set_sai1sel(Saisel::PLL3_P));
}
