//! The built-in block codec.
//!
//! Compression uses the encoders in this crate; decompression is delegated to `bcdec_rs`,
//! a port of the reference `bcdec` decoder, so encoded output is always checked against an
//! independent implementation.

use crate::bc1::compress_bc1;
use crate::bc2::compress_bc2;
use crate::bc3::compress_bc3;
use crate::bc6h::compress_bc6h;
use crate::bc7::compress_bc7;
use crate::single_channel::{compress_bc4, compress_bc5};
use crate::{BcFormat, BlockCompressor, BlockDecompressor, BlockSettings};
use ddsplus_common::block_4x4::Block4x4;
use ddsplus_common::color_8888::Color8888;

/// Pitch of a decoded 4x4 RGBA8 tile, in bytes.
const RGBA_PITCH: usize = 16;

/// Block codec implemented in pure Rust.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBlockCodec;

impl BlockCompressor for NativeBlockCodec {
    fn compress_block(
        &self,
        block: &Block4x4,
        format: BcFormat,
        settings: BlockSettings,
        output: &mut [u8],
    ) {
        match format {
            BcFormat::Bc1 => compress_bc1(block, settings, output),
            BcFormat::Bc2 => compress_bc2(block, settings, output),
            BcFormat::Bc3 => compress_bc3(block, settings, output),
            BcFormat::Bc4 => compress_bc4(block, settings.speed, output),
            BcFormat::Bc5 => compress_bc5(block, settings.speed, output),
            BcFormat::Bc6h => compress_bc6h(block, settings, output),
            BcFormat::Bc7 => compress_bc7(block, settings, output),
        }
    }
}

impl BlockDecompressor for NativeBlockCodec {
    fn decompress_block(&self, block: &[u8], format: BcFormat) -> Block4x4 {
        let block = &block[..format.bytes_per_block()];
        match format {
            BcFormat::Bc1 | BcFormat::Bc2 | BcFormat::Bc3 | BcFormat::Bc7 => {
                let mut rgba = [0u8; 64];
                match format {
                    BcFormat::Bc1 => bcdec_rs::bc1(block, &mut rgba, RGBA_PITCH),
                    BcFormat::Bc2 => bcdec_rs::bc2(block, &mut rgba, RGBA_PITCH),
                    BcFormat::Bc3 => bcdec_rs::bc3(block, &mut rgba, RGBA_PITCH),
                    _ => bcdec_rs::bc7(block, &mut rgba, RGBA_PITCH),
                }
                from_pixels(|i| Color8888::from_rgba_bytes(&rgba[i * 4..]))
            }
            BcFormat::Bc4 => {
                let mut red = [0u8; 16];
                bcdec_rs::bc4(block, &mut red, 4, false);
                from_pixels(|i| Color8888::new(red[i], red[i], red[i], 255))
            }
            BcFormat::Bc5 => {
                let mut red_green = [0u8; 32];
                bcdec_rs::bc5(block, &mut red_green, 8, false);
                from_pixels(|i| Color8888::new(red_green[i * 2], red_green[i * 2 + 1], 0, 255))
            }
            BcFormat::Bc6h => {
                let mut rgb = [0f32; 48];
                bcdec_rs::bc6h_float(block, &mut rgb, 12, false);
                let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
                from_pixels(|i| {
                    Color8888::new(
                        channel(rgb[i * 3]),
                        channel(rgb[i * 3 + 1]),
                        channel(rgb[i * 3 + 2]),
                        255,
                    )
                })
            }
        }
    }
}

#[inline]
fn from_pixels(pixel: impl Fn(usize) -> Color8888) -> Block4x4 {
    Block4x4 {
        pixels: core::array::from_fn(pixel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    /// Channels that survive a round trip through `format`.
    fn channels(format: BcFormat) -> usize {
        match format {
            BcFormat::Bc4 => 1,
            BcFormat::Bc5 => 2,
            BcFormat::Bc6h => 3,
            _ => 4,
        }
    }

    fn tolerance(format: BcFormat) -> u8 {
        match format {
            BcFormat::Bc6h => 32,
            _ => 16,
        }
    }

    #[rstest]
    fn smooth_gradients_round_trip_within_tolerance(
        #[values(
            BcFormat::Bc1,
            BcFormat::Bc2,
            BcFormat::Bc3,
            BcFormat::Bc4,
            BcFormat::Bc5,
            BcFormat::Bc6h,
            BcFormat::Bc7
        )]
        format: BcFormat,
    ) {
        let blocks = [
            gradient_block(Color8888::new(20, 40, 60, 255), [2, 1, 2, 0]),
            gradient_block(Color8888::new(200, 100, 50, 255), [-2, 1, 0, 0]),
            gradient_block(Color8888::new(128, 128, 128, 255), [1, 1, 1, 0]),
        ];
        for settings in all_settings() {
            for block in &blocks {
                let decoded = round_trip(block, format, settings);
                let error = max_channel_error(block, &decoded, channels(format));
                assert!(
                    error <= tolerance(format),
                    "{format:?} {settings:?}: error {error}"
                );
            }
        }
    }

    #[rstest]
    #[case::bc2(BcFormat::Bc2, 9)]
    #[case::bc3(BcFormat::Bc3, 9)]
    #[case::bc7(BcFormat::Bc7, 6)]
    fn alpha_gradients_round_trip(#[case] format: BcFormat, #[case] max_alpha_error: u8) {
        let block = gradient_block(Color8888::new(90, 90, 90, 60), [0, 0, 0, 8]);
        let decoded = round_trip(&block, format, BlockSettings::default());
        for (source, result) in block.pixels.iter().zip(decoded.pixels.iter()) {
            assert!(source.a.abs_diff(result.a) <= max_alpha_error);
        }
    }

    #[test]
    fn bc1_keeps_punch_through_alpha() {
        let mut block = gradient_block(Color8888::new(10, 60, 110, 255), [3, 3, 3, 0]);
        block.pixels[0].a = 0;
        block.pixels[9].a = 50;
        let decoded = round_trip(&block, BcFormat::Bc1, BlockSettings::default());
        for (i, pixel) in decoded.pixels.iter().enumerate() {
            let expected = if i == 0 || i == 9 { 0 } else { 255 };
            assert_eq!(pixel.a, expected, "pixel {i}");
        }
    }

    #[test]
    fn bc7_keeps_opaque_blocks_opaque() {
        for seed in 0..16 {
            let mut block = pseudo_random_block(seed);
            for pixel in block.pixels.iter_mut() {
                pixel.a = 255;
            }
            let decoded = round_trip(&block, BcFormat::Bc7, BlockSettings::default());
            assert!(decoded.pixels.iter().all(|p| p.a == 255), "seed {seed}");
        }
    }

    #[rstest]
    #[case::bc4(BcFormat::Bc4, Color8888::new(77, 77, 77, 255))]
    #[case::bc5(BcFormat::Bc5, Color8888::new(77, 150, 0, 255))]
    fn missing_channels_decode_to_fixed_values(
        #[case] format: BcFormat,
        #[case] expected: Color8888,
    ) {
        let block = Block4x4::new(Color8888::new(77, 150, 33, 10));
        let decoded = round_trip(&block, format, BlockSettings::default());
        assert_eq!(decoded.pixels[5], expected);
    }

    #[test]
    fn bc6h_decodes_opaque_and_clamped() {
        let block = Block4x4::new(Color8888::new(77, 150, 255, 10));
        let decoded = round_trip(&block, BcFormat::Bc6h, BlockSettings::default());
        for pixel in &decoded.pixels {
            assert_eq!(pixel.a, 255);
            assert!(pixel.r.abs_diff(77) <= 2);
            assert!(pixel.g.abs_diff(150) <= 2);
            assert!(pixel.b >= 251);
        }
    }

    #[rstest]
    fn slow_is_never_much_worse_than_normal(
        #[values(BcFormat::Bc1, BcFormat::Bc3, BcFormat::Bc6h, BcFormat::Bc7)] format: BcFormat,
        #[values(ErrorMetric::Perceptual, ErrorMetric::Uniform)] metric: ErrorMetric,
    ) {
        let mut normal_total = 0.0;
        let mut slow_total = 0.0;
        for seed in 0..24 {
            let block = pseudo_random_block(seed);
            let normal = BlockSettings::new(metric, CompressionSpeed::Normal);
            let slow = BlockSettings::new(metric, CompressionSpeed::Slow);
            let normal = round_trip(&block, format, normal);
            let slow = round_trip(&block, format, slow);
            normal_total += metric.block_error(&block, &normal);
            slow_total += metric.block_error(&block, &slow);
        }
        // Refinement only keeps candidates it scores better, but BC6H scores them in
        // half float space rather than 8-bit space.
        assert!(slow_total <= normal_total * 1.05, "{slow_total} > {normal_total}");
    }

    #[rstest]
    #[case::bc1(BcFormat::Bc1)]
    #[case::bc6h(BcFormat::Bc6h)]
    #[case::bc7(BcFormat::Bc7)]
    fn perceptual_search_scores_best_under_its_own_metric(#[case] format: BcFormat) {
        let perceptual = BlockSettings::new(ErrorMetric::Perceptual, CompressionSpeed::Normal);
        let uniform = BlockSettings::new(ErrorMetric::Uniform, CompressionSpeed::Normal);
        let mut perceptual_total = 0.0;
        let mut uniform_total = 0.0;
        for seed in 0..24 {
            let block = pseudo_random_block(seed);
            let from_perceptual = round_trip(&block, format, perceptual);
            let from_uniform = round_trip(&block, format, uniform);
            perceptual_total += ErrorMetric::Perceptual.block_error(&block, &from_perceptual);
            uniform_total += ErrorMetric::Perceptual.block_error(&block, &from_uniform);
        }
        assert!(
            perceptual_total < uniform_total,
            "{format:?}: perceptual {perceptual_total} >= uniform {uniform_total}"
        );
    }

    #[test]
    fn solid_565_colours_are_exact() {
        let colour = Color8888::new(255, 0, 255, 255);
        let block = Block4x4::new(colour);
        for format in [BcFormat::Bc1, BcFormat::Bc2, BcFormat::Bc3] {
            let decoded = round_trip(&block, format, BlockSettings::default());
            assert!(decoded.has_identical_pixels());
            assert_eq!(decoded.pixels[0], colour, "{format:?}");
        }
    }
}
