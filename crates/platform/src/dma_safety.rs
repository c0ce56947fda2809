//! DMA placement markers for STM32H743ZI.
//!
//! ## DMA accessibility on STM32H743ZI
//!
//! | Memory Region | Base Address | Size   | DMA1/2 | Use case |
//! |---------------|-------------|--------|--------|----------|
//! | AXI SRAM      | 0x2400_0000 | 512 KB | YES    | SAI1 ring, SPI2 transfers |
//! | DTCM          | 0x2000_0000 | 128 KB | NO     | CPU-only: stack, transfer buffer |
//!
//! The SAI driver owns a circular DMA ring. The application never touches
//! it directly: it hands byte chunks to `I2sTx::write`, which copies them in
//! as the ring drains.
//!
//! ```rust
//! use platform::dma_safety::{AxiSramRegion, DmaBuffer};
//!
//! #[link_section = ".axisram"]
//! static mut RING: DmaBuffer<AxiSramRegion, [u16; 4096]> = DmaBuffer::new([0; 4096]);
//! ```

use core::marker::PhantomData;

// ── Memory region addresses ──────────────────────────────────────────────────

/// Base address of AXI SRAM (DMA1/2/MDMA accessible, D1 domain).
pub const AXI_SRAM_BASE: u32 = 0x2400_0000;

/// Size of AXI SRAM in bytes (512 KB).
pub const AXI_SRAM_SIZE_BYTES: usize = 512 * 1024;

/// Base address of DTCM (CPU only).
pub const DTCM_BASE: u32 = 0x2000_0000;

// ── Marker traits ────────────────────────────────────────────────────────────

/// Marker trait: memory region accessible by DMA1, DMA2, and MDMA.
///
/// # Safety
/// Only implement for zero-sized types representing memory regions
/// that are physically accessible by the STM32H743 DMA controllers.
/// Implementing this for DTCM causes silent DMA data corruption or bus faults.
pub unsafe trait DmaAccessible: Sized {}

// ── Region zero-sized types ──────────────────────────────────────────────────

/// Zero-sized type representing AXI SRAM (DMA1/DMA2/MDMA accessible).
///
/// Buffers placed here via `#[link_section = ".axisram"]`.
#[derive(Debug, Clone, Copy)]
pub struct AxiSramRegion;

// SAFETY: AXI SRAM at 0x2400_0000 is in D1 domain, accessible by all
// DMA controllers (DMA1, DMA2, MDMA) per STM32H743 reference manual Table 3.
unsafe impl DmaAccessible for AxiSramRegion {}

/// Zero-sized type representing DTCM (CPU-only, NOT DMA-accessible).
#[derive(Debug, Clone, Copy)]
pub struct DtcmRegion;
// DtcmRegion intentionally does NOT implement DmaAccessible.

// ── Buffer wrapper ───────────────────────────────────────────────────────────

/// A buffer tagged with the memory region it is linked into.
///
/// Drivers that start DMA take `&mut DmaBuffer<R, _>` with `R: DmaAccessible`,
/// so a DTCM-tagged buffer cannot be handed to them.
#[repr(transparent)]
pub struct DmaBuffer<R, T> {
    /// The buffer storage.
    pub data: T,
    _region: PhantomData<R>,
}

impl<R, T> DmaBuffer<R, T> {
    /// Wrap `data`. The caller places the static in the section matching `R`.
    pub const fn new(data: T) -> Self {
        Self {
            data,
            _region: PhantomData,
        }
    }
}

impl<R: DmaAccessible, T> DmaBuffer<R, T> {
    /// Borrow the storage for a DMA transfer.
    pub fn for_dma(&mut self) -> &mut T {
        &mut self.data
    }
}
