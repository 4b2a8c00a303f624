/// Packs fields into a 128-bit block, least significant bit first.
///
/// BC6H and BC7 blocks are defined as a little endian bit stream, which is exactly
/// the byte order of [`u128::to_le_bytes`].
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    value: u128,
    position: u32,
}

impl BitWriter {
    /// Appends the low `bits` bits of `value`.
    #[inline]
    pub(crate) fn write(&mut self, value: u32, bits: u32) {
        debug_assert!(self.position + bits <= 128);
        let mask = (1u128 << bits) - 1;
        self.value |= (value as u128 & mask) << self.position;
        self.position += bits;
    }

    #[inline]
    pub(crate) fn into_bytes(self) -> [u8; 16] {
        debug_assert_eq!(self.position, 128);
        self.value.to_le_bytes()
    }
}
