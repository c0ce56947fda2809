//! PCM byte stream to sample words.

/// Pack little-endian bytes into `out`, starting with a carried low byte.
///
/// Returns `(words, bytes consumed)`. An odd byte at the end is not consumed.
pub fn pack_le(carry: Option<u8>, bytes: &[u8], out: &mut [u16]) -> (usize, usize) {
    let mut words = 0usize;
    let mut rest = bytes;
    let mut consumed = 0usize;

    if let Some(lo) = carry {
        let Some((&hi, tail)) = rest.split_first() else {
            return (0, 0);
        };
        if let Some(slot) = out.get_mut(0) {
            *slot = u16::from_le_bytes([lo, hi]);
            words = 1;
            consumed = 1;
            rest = tail;
        }
    }

    let free = out.len().saturating_sub(words);
    for (pair, slot) in rest
        .chunks_exact(2)
        .take(free)
        .zip(out.iter_mut().skip(words))
    {
        if let [lo, hi] = *pair {
            *slot = u16::from_le_bytes([lo, hi]);
            words = words.saturating_add(1);
            consumed = consumed.saturating_add(2);
        }
    }
    (words, consumed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn packs_little_endian_pairs() {
        let mut out = [0u16; 4];
        assert_eq!(pack_le(None, &[0x34, 0x12, 0x78, 0x56], &mut out), (2, 4));
        assert_eq!(&out[..2], &[0x1234, 0x5678]);
    }

    #[test]
    fn odd_tail_left_unconsumed() {
        let mut out = [0u16; 4];
        assert_eq!(pack_le(None, &[1, 0, 2], &mut out), (1, 2));
    }

    #[test]
    fn carry_completes_first_word() {
        let mut out = [0u16; 4];
        assert_eq!(pack_le(Some(0xCD), &[0xAB, 0x01, 0x00], &mut out), (2, 3));
        assert_eq!(&out[..2], &[0xABCD, 0x0001]);
    }

    #[test]
    fn staging_limit_respected() {
        let mut out = [0u16; 2];
        assert_eq!(pack_le(None, &[0; 10], &mut out), (2, 4));
    }
}
