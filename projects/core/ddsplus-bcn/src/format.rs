//! The BCn block formats.

use derive_enum_all_values::AllValues;

/// Width and height of a compressed block, in pixels.
pub const BLOCK_DIMENSION: usize = 4;

/// A block compression format.
///
/// sRGB variants share their block layout with the linear format; colour space is
/// a property of the container, not of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum BcFormat {
    /// a.k.a. DXT1
    Bc1,
    /// a.k.a. DXT3
    Bc2,
    /// a.k.a. DXT5
    Bc3,
    /// Single channel, a.k.a. ATI1
    Bc4,
    /// Two channel, a.k.a. ATI2
    Bc5,
    /// Unsigned half float RGB
    Bc6h,
    /// High quality RGBA, a.k.a. BPTC
    Bc7,
}

impl BcFormat {
    /// Size of a single compressed 4x4 block in bytes.
    #[inline]
    pub const fn bytes_per_block(self) -> usize {
        match self {
            BcFormat::Bc1 | BcFormat::Bc4 => 8,
            BcFormat::Bc2 | BcFormat::Bc3 | BcFormat::Bc5 | BcFormat::Bc6h | BcFormat::Bc7 => 16,
        }
    }

    /// Whether the encoder for this format searches colour endpoints, and is therefore
    /// influenced by the [`ErrorMetric`](crate::ErrorMetric).
    ///
    /// BC4 and BC5 encode each channel independently, so channel weighting has no effect.
    #[inline]
    pub const fn uses_color_endpoints(self) -> bool {
        !matches!(self, BcFormat::Bc4 | BcFormat::Bc5)
    }
}
