//! The block codec capabilities consumed by the encode and decode pipelines.
//!
//! The pipelines never touch block bit layouts directly; all of that lives behind these two
//! traits so an alternative codec (e.g. a GPU or C library backed one) can be swapped in.

use crate::{BcFormat, BlockSettings};
use ddsplus_common::block_4x4::Block4x4;

/// Compresses a single 4x4 block of RGBA8 pixels.
pub trait BlockCompressor {
    /// Compresses `block` into `output`.
    ///
    /// # Parameters
    ///
    /// - `block`: The pixels to compress. Edge blocks arrive already padded.
    /// - `format`: The target block format.
    /// - `settings`: Error metric and search effort.
    /// - `output`: Receives the compressed block; must be at least
    ///   [`BcFormat::bytes_per_block`] bytes long.
    fn compress_block(
        &self,
        block: &Block4x4,
        format: BcFormat,
        settings: BlockSettings,
        output: &mut [u8],
    );
}

/// Decompresses a single block into a 4x4 tile of RGBA8 pixels.
pub trait BlockDecompressor {
    /// Decompresses `block`, which must be at least [`BcFormat::bytes_per_block`] bytes long.
    ///
    /// Formats with fewer than 4 channels fill the remaining channels the same way
    /// for every block: BC4 decodes to grey, BC5 to `(r, g, 0, 255)` and BC6H is
    /// clamped to `[0, 1]` before quantization to 8 bits.
    fn decompress_block(&self, block: &[u8], format: BcFormat) -> Block4x4;
}

impl<T: BlockCompressor + ?Sized> BlockCompressor for &T {
    #[inline]
    fn compress_block(
        &self,
        block: &Block4x4,
        format: BcFormat,
        settings: BlockSettings,
        output: &mut [u8],
    ) {
        (**self).compress_block(block, format, settings, output)
    }
}

impl<T: BlockDecompressor + ?Sized> BlockDecompressor for &T {
    #[inline]
    fn decompress_block(&self, block: &[u8], format: BcFormat) -> Block4x4 {
        (**self).decompress_block(block, format)
    }
}
