//! SAI1 block A as a 16-bit I2S transmitter.
//!
//! The block is built on [`I2sTx::init_std_mode`] from the channel
//! configuration, and fed through a DMA ring that lives in AXI SRAM.
//! Little-endian PCM bytes are packed into 16-bit words on the way in; an
//! odd trailing byte is held back until the next write completes the word.
//!
//! | Operation | SAI                              |
//! |-----------|----------------------------------|
//! | enable    | `start`, unmute                  |
//! | write     | `write` into the DMA ring        |
//! | disable   | mute, further writes refused     |
//! | delete    | drop: block and DMA stream off   |

use embassy_stm32::dma::word::{U4, U7};
use embassy_stm32::peripherals::{DMA1_CH0, SAI1};
use embassy_stm32::sai::{
    self, ClockStrobe, Config as SaiConfig, DataSize, FrameSyncOffset, FrameSyncPolarity,
    MasterClockDivider, Mode, Sai, StereoMono, TxRx,
};
use platform::audio::I2sTx;
use platform::audio_config::{I2sRole, I2sStdConfig, SlotFormat};
use platform::audio_types::{DataBitWidth, SlotMode};
use platform::dma_safety::{AxiSramRegion, DmaBuffer};

use super::SaiPins;
use crate::audio_clock::mclk_divider;
use crate::config::SAI_DMA_RING_WORDS;
use crate::fmt::Dbg;
use crate::pcm::pack_le;

/// The SAI DMA ring, placed in AXI SRAM by the caller.
pub type SaiRing = DmaBuffer<AxiSramRegion, [u16; SAI_DMA_RING_WORDS]>;

type SaiBlock = Sai<'static, SAI1, DMA1_CH0, u16>;

/// Words packed per DMA write.
const STAGING_WORDS: usize = 512;

/// SAI transmitter errors.
#[derive(Debug, thiserror::Error)]
pub enum SaiTxError {
    /// `init_std_mode` was called twice.
    #[error("SAI already configured")]
    AlreadyConfigured,
    /// Operation needs `init_std_mode` first.
    #[error("SAI not configured")]
    NotConfigured,
    /// Write on a disabled channel.
    #[error("SAI not enabled")]
    NotEnabled,
    /// MCLK cannot be divided from the 44.1 kHz-family kernel clock.
    #[error("sample rate not reachable from the SAI kernel clock")]
    UnsupportedRate,
    /// The DMA ring over- or underran.
    #[error("SAI DMA error")]
    Dma(sai::Error),
}

enum State {
    Unconfigured(SaiPins, &'static mut [u16; SAI_DMA_RING_WORDS]),
    Ready { sai: SaiBlock, enabled: bool },
    Poisoned,
}

/// SAI1 block A transmit channel.
pub struct SaiTx {
    state: State,
    /// Low byte of a sample split across two writes.
    carry: Option<u8>,
}

impl SaiTx {
    /// Channel on SAI1 block A, streaming through `ring`.
    pub fn new(pins: SaiPins, ring: &'static mut SaiRing) -> Self {
        let words = ring.for_dma();
        words.fill(0);
        Self {
            state: State::Unconfigured(pins, words),
            carry: None,
        }
    }
}

fn master_clock_divider(div: u32) -> Option<MasterClockDivider> {
    Some(match div {
        1 => MasterClockDivider::Div1,
        2 => MasterClockDivider::Div2,
        4 => MasterClockDivider::Div4,
        8 => MasterClockDivider::Div8,
        16 => MasterClockDivider::Div16,
        32 => MasterClockDivider::Div32,
        _ => return None,
    })
}

fn sai_config(config: &I2sStdConfig) -> Result<SaiConfig, SaiTxError> {
    // Stops compiling if either enum grows; the frame below is 16-bit master only.
    let (I2sRole::Master, DataBitWidth::Bits16) = (config.role, config.slot.data_bit_width);
    let div = mclk_divider(
        config.clock.sample_rate.get(),
        u32::from(config.clock.mclk_multiple.get()),
    )
    .and_then(master_clock_divider)
    .ok_or(SaiTxError::UnsupportedRate)?;

    let mut sai_cfg = SaiConfig::default();
    sai_cfg.mode = Mode::Master;
    sai_cfg.tx_rx = TxRx::Transmitter;
    sai_cfg.data_size = DataSize::Data16;
    sai_cfg.frame_length = 32;
    sai_cfg.frame_sync_active_level_length = U7(16);
    sai_cfg.slot_count = U4(2);
    sai_cfg.slot_enable = config.slot.slot_mask.bits();
    sai_cfg.stereo_mono = match config.slot.slot_mode {
        SlotMode::Mono => StereoMono::Mono,
        SlotMode::Stereo => StereoMono::Stereo,
    };
    sai_cfg.frame_sync_offset = match config.slot.format {
        SlotFormat::Philips => FrameSyncOffset::BeforeFirstBit,
    };
    sai_cfg.frame_sync_polarity = if config.pins.invert.ws {
        FrameSyncPolarity::ActiveHigh
    } else {
        FrameSyncPolarity::ActiveLow
    };
    sai_cfg.clock_strobe = if config.pins.invert.bclk {
        ClockStrobe::Rising
    } else {
        ClockStrobe::Falling
    };
    sai_cfg.master_clock_divider = div;
    Ok(sai_cfg)
}

impl I2sTx for SaiTx {
    type Error = SaiTxError;

    async fn init_std_mode(&mut self, config: &I2sStdConfig) -> Result<(), SaiTxError> {
        let sai_cfg = sai_config(config)?;
        if config.pins.invert.mclk {
            warn!("MCLK inversion is not available on SAI; ignored");
        }
        match core::mem::replace(&mut self.state, State::Poisoned) {
            State::Unconfigured(p, ring) => {
                let (block_a, _block_b) = sai::split_subblocks(p.SAI);
                let sai = Sai::new_asynchronous_with_mclk(
                    block_a, p.SCK_A, p.SD_A, p.FS_A, p.MCLK_A, p.DMA, ring, sai_cfg,
                );
                debug!(
                    "SAI1_A: {} Hz, MCLK {} Hz, slots {}",
                    config.clock.sample_rate.get(),
                    config.mclk_hz(),
                    config.slot.slot_mask.bits()
                );
                self.state = State::Ready {
                    sai,
                    enabled: false,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(SaiTxError::AlreadyConfigured)
            }
        }
    }

    async fn enable(&mut self) -> Result<(), SaiTxError> {
        let State::Ready { sai, enabled } = &mut self.state else {
            return Err(SaiTxError::NotConfigured);
        };
        if !*enabled {
            sai.set_mute(false);
            sai.start();
            *enabled = true;
        }
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), SaiTxError> {
        let State::Ready { sai, enabled } = &mut self.state else {
            return Err(SaiTxError::NotConfigured);
        };
        sai.set_mute(true);
        *enabled = false;
        self.carry = None;
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SaiTxError> {
        let State::Ready { sai, enabled } = &mut self.state else {
            return Err(SaiTxError::NotConfigured);
        };
        if !*enabled {
            return Err(SaiTxError::NotEnabled);
        }

        if bytes.is_empty() {
            return Ok(0);
        }

        let mut staging = [0u16; STAGING_WORDS];
        let (words, mut consumed) = pack_le(self.carry.take(), bytes, &mut staging);
        if bytes.len().saturating_sub(consumed) == 1 {
            self.carry = bytes.last().copied();
            consumed = bytes.len();
        }
        if let Some(words) = staging.get(..words).filter(|w| !w.is_empty()) {
            sai.write(words).await.map_err(|e| {
                warn!("SAI write failed: {:?}", Dbg(&e));
                SaiTxError::Dma(e)
            })?;
        }
        Ok(consumed)
    }

    async fn delete(self) -> Result<(), SaiTxError> {
        match self.state {
            State::Ready { .. } => {
                debug!("SAI1_A released");
                Ok(())
            }
            _ => Err(SaiTxError::NotConfigured),
        }
    }
}
