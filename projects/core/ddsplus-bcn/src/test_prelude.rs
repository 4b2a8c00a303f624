//! Common test imports and utilities for the block codec tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use rstest::rstest;

pub use crate::{
    BcFormat, BlockCompressor, BlockDecompressor, BlockSettings, CompressionSpeed, ErrorMetric,
    NativeBlockCodec,
};
pub use ddsplus_common::block_4x4::Block4x4;
pub use ddsplus_common::color_8888::Color8888;

/// Builds a block whose pixel `i` (row-major) is `start + step * i`, saturating per channel.
///
/// With small steps this models the smooth content BCn formats are designed for.
pub fn gradient_block(start: Color8888, step: [i16; 4]) -> Block4x4 {
    let mut block = Block4x4::default();
    for (i, pixel) in block.pixels.iter_mut().enumerate() {
        let channel = |base: u8, step: i16| (base as i16 + step * i as i16).clamp(0, 255) as u8;
        *pixel = Color8888::new(
            channel(start.r, step[0]),
            channel(start.g, step[1]),
            channel(start.b, step[2]),
            channel(start.a, step[3]),
        );
    }
    block
}

/// A deterministic, noisy block generated from `seed` with a simple LCG.
pub fn pseudo_random_block(seed: u32) -> Block4x4 {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let mut next = || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 24) as u8
    };
    let mut block = Block4x4::default();
    for pixel in block.pixels.iter_mut() {
        *pixel = Color8888::new(next(), next(), next(), next());
    }
    block
}

/// Largest absolute difference between the blocks over the first `channels` channels (RGBA order).
pub fn max_channel_error(a: &Block4x4, b: &Block4x4, channels: usize) -> u8 {
    a.pixels
        .iter()
        .zip(b.pixels.iter())
        .flat_map(|(x, y)| {
            let x = x.to_rgba_bytes();
            let y = y.to_rgba_bytes();
            (0..channels)
                .map(move |c| x[c].abs_diff(y[c]))
                .collect::<Vec<_>>()
        })
        .max()
        .unwrap_or(0)
}

/// Compresses then decompresses `block` with the native codec.
pub fn round_trip(block: &Block4x4, format: BcFormat, settings: BlockSettings) -> Block4x4 {
    let codec = NativeBlockCodec;
    let mut compressed = [0u8; 16];
    codec.compress_block(block, format, settings, &mut compressed);
    codec.decompress_block(&compressed[..format.bytes_per_block()], format)
}

/// Every combination of metric and speed.
pub fn all_settings() -> Vec<BlockSettings> {
    ErrorMetric::all_values()
        .iter()
        .flat_map(|&metric| {
            CompressionSpeed::all_values()
                .iter()
                .map(move |&speed| BlockSettings::new(metric, speed))
        })
        .collect()
}
