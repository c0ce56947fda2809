//! SD WAV Player - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use platform::dma_safety::{AXI_SRAM_BASE, AXI_SRAM_SIZE_BYTES};

use firmware::hardware::sai::{SaiRing, SaiTx};
use firmware::hardware::sd_spi::SpiSdHost;
use firmware::hardware::system::BoardSystem;
use firmware::hardware::{
    apply_pll3_fracn, build_embassy_config, select_sai1_kernel_clock, SaiPins, SdPins,
};
use firmware::config::SAI_DMA_RING_WORDS;
use firmware::{finish, run, AppContext};

use defmt_rtt as _;
use panic_probe as _;

// SAI DMA ring in AXI SRAM (D1 domain, reachable by DMA1).
#[link_section = ".axisram"]
static mut SAI_RING: SaiRing = SaiRing::new([0; SAI_DMA_RING_WORDS]);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(build_embassy_config());
    apply_pll3_fracn();
    select_sai1_kernel_clock();

    // The linker script decides where `.axisram` lands; DMA1 cannot reach DTCM.
    let ring_addr = core::ptr::addr_of!(SAI_RING) as usize as u32;
    if ring_addr.wrapping_sub(AXI_SRAM_BASE) >= AXI_SRAM_SIZE_BYTES as u32 {
        defmt::panic!("SAI ring at 0x{:08X} is outside AXI SRAM; check memory.x", ring_addr);
    }

    // SAFETY: `main` runs once, so this is the only reference ever taken.
    let ring = unsafe { &mut *core::ptr::addr_of_mut!(SAI_RING) };

    let ctx = AppContext {
        host: SpiSdHost::new(SdPins {
            SPI: p.SPI2,
            SCK: p.PB13,
            MISO: p.PB14,
            MOSI: p.PB15,
            CS: p.PB12,
        }),
        tx: SaiTx::new(
            SaiPins {
                SAI: p.SAI1,
                DMA: p.DMA1_CH0,
                MCLK_A: p.PE2,
                FS_A: p.PE4,
                SCK_A: p.PE5,
                SD_A: p.PE6,
            },
            ring,
        ),
    };

    let mut system = BoardSystem;
    match finish(run(ctx).await, &mut system).await {}
}
