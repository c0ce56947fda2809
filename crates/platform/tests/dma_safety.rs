//! Architecture tests: DMA safety marker traits.
//! These tests enforce compile-time guarantees about DMA buffer placement.

// Test files legitimately use arithmetic for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
// Some assertions check documented compile-time constants for architectural correctness.
#![allow(clippy::assertions_on_constants)]

use platform::dma_safety::{
    AxiSramRegion, DmaAccessible, DmaBuffer, DtcmRegion, AXI_SRAM_BASE, AXI_SRAM_SIZE_BYTES,
    DTCM_BASE,
};

/// Words in a ring of two 2048-sample halves.
const RING_WORDS: usize = 4096;

#[test]
fn region_markers_are_zero_sized() {
    assert_eq!(core::mem::size_of::<AxiSramRegion>(), 0);
    assert_eq!(core::mem::size_of::<DtcmRegion>(), 0);
}

#[test]
fn axi_sram_region_implements_dma_accessible() {
    fn assert_dma_accessible<T: DmaAccessible>() {}
    assert_dma_accessible::<AxiSramRegion>();
}

#[test]
fn dma_buffer_adds_no_overhead() {
    assert_eq!(
        core::mem::size_of::<DmaBuffer<AxiSramRegion, [u16; RING_WORDS]>>(),
        RING_WORDS * 2
    );
}

#[test]
fn dma_buffer_hands_out_storage() {
    let mut buf: DmaBuffer<AxiSramRegion, [u16; 8]> = DmaBuffer::new([0; 8]);
    buf.for_dma()[3] = 0xBEEF;
    assert_eq!(buf.data[3], 0xBEEF);
}

#[test]
fn sai_ring_fits_in_axi_sram() {
    assert!(RING_WORDS * 2 < AXI_SRAM_SIZE_BYTES);
}

#[test]
fn dtcm_and_axi_sram_do_not_overlap() {
    assert!(DTCM_BASE < AXI_SRAM_BASE);
    assert_eq!(AXI_SRAM_BASE, 0x2400_0000);
}
