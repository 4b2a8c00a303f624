//! # BC2 (DXT3) Block Encoder
//!
//! ```text
//! Address: 0                8        10       12      16
//!          +----------------+--------+--------+--------+
//! Data:    | 16 x 4-bit A   | Color0 | Color1 | Indices|
//!          +----------------+--------+--------+--------+
//! ```
//!
//! Alpha is stored explicitly, 4 bits per pixel; the colour half is a four colour BC1 block.

use crate::bc1::{encode_color_block, ColorMode};
use crate::BlockSettings;
use ddsplus_common::block_4x4::Block4x4;

/// Compresses a BC2 block into the first 16 bytes of `output`.
pub(crate) fn compress_bc2(block: &Block4x4, settings: BlockSettings, output: &mut [u8]) {
    let mut alpha = 0u64;
    for (i, pixel) in block.pixels.iter().enumerate() {
        let a4 = (pixel.a as u64 * 15 + 127) / 255;
        alpha |= a4 << (i * 4);
    }

    output[..8].copy_from_slice(&alpha.to_le_bytes());
    output[8..16].copy_from_slice(&encode_color_block(block, settings, ColorMode::FourColor));
}
