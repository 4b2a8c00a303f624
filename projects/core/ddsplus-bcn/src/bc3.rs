//! # BC3 (DXT5) Block Encoder
//!
//! ```text
//! Address: 0    1    2              8        10       12      16
//!          +----+----+--------------+--------+--------+--------+
//! Data:    | A0 | A1 | 16 x 3-bit   | Color0 | Color1 | Indices|
//!          +----+----+--------------+--------+--------+--------+
//! ```
//!
//! The alpha half is an interpolated single channel block (see [`crate::single_channel`]);
//! the colour half is a four colour BC1 block.

use crate::bc1::{encode_color_block, ColorMode};
use crate::single_channel::{channel, encode_channel};
use crate::BlockSettings;
use ddsplus_common::block_4x4::Block4x4;

/// Compresses a BC3 block into the first 16 bytes of `output`.
pub(crate) fn compress_bc3(block: &Block4x4, settings: BlockSettings, output: &mut [u8]) {
    let alpha = channel(block, |p| p.a);
    output[..8].copy_from_slice(&encode_channel(&alpha, settings.speed));
    output[8..16].copy_from_slice(&encode_color_block(block, settings, ColorMode::FourColor));
}
