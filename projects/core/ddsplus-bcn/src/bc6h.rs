//! # BC6H Block Encoder (unsigned, mode 11)
//!
//! Mode 11 stores a single region with two 10-bit-per-channel endpoints and 4-bit indices:
//!
//! ```text
//! Bits:  0..5   5..35            35..65           65..68     68..128
//!        +------+----------------+----------------+----------+-------------------+
//!        | mode | rw, gw, bw     | rx, gx, bx     | index 0  | indices 1..16     |
//!        | 00011| 3 x 10 bits    | 3 x 10 bits    | 3 bits   | 15 x 4 bits       |
//!        +------+----------------+----------------+----------+-------------------+
//! ```
//!
//! The most significant bit of pixel 0's index is implied to be zero; the encoder swaps the
//! endpoints when needed to satisfy that.
//!
//! A decoder turns each 10-bit endpoint into a 16-bit value, interpolates those, and scales
//! the result by `31/64` to get the bits of an IEEE half float. The encoder therefore does
//! its search in that 16-bit "unquantized" space.

use crate::bits::BitWriter;
use crate::endpoints::{distance_sq, round_clamp, search_endpoints, Fit};
use crate::BlockSettings;
use ddsplus_common::block_4x4::Block4x4;

/// 4-bit interpolation weights, out of 64.
pub(crate) const WEIGHTS_4: [u32; 16] = [
    0, 4, 9, 13, 17, 21, 26, 30, 34, 38, 43, 47, 51, 55, 60, 64,
];

const MODE_11: u32 = 0b00011;
const ENDPOINT_BITS: u32 = 10;
const ENDPOINT_MAX: u32 = (1 << ENDPOINT_BITS) - 1;

/// Compresses the RGB channels of `block` as an unsigned BC6H block.
///
/// 8-bit values map linearly onto `[0, 1]` in half float.
pub(crate) fn compress_bc6h(block: &Block4x4, settings: BlockSettings, output: &mut [u8]) {
    let scale = settings.error_metric.channel_scale();
    let targets: [[f32; 3]; 16] = core::array::from_fn(|i| {
        let rgb = block.pixels[i].rgb();
        core::array::from_fn(|c| half_to_unquantized(f32_to_half_bits(rgb[c] as f32 / 255.0)))
    });
    let points: [[f32; 3]; 16] =
        core::array::from_fn(|i| core::array::from_fn(|c| targets[i][c] * scale[c]));

    let fit = search_endpoints(&points, settings.speed, |start, end| {
        encode_with_endpoints(&points, start, end, scale)
    });
    output[..16].copy_from_slice(&fit.encoded);
}

fn encode_with_endpoints(
    points: &[[f32; 3]; 16],
    start: [f32; 3],
    end: [f32; 3],
    scale: [f32; 3],
) -> Fit<[u8; 16]> {
    let mut e0: [u32; 3] = core::array::from_fn(|c| quantize_endpoint(start[c] / scale[c]));
    let mut e1: [u32; 3] = core::array::from_fn(|c| quantize_endpoint(end[c] / scale[c]));

    // Interpolated palette, in metric space.
    let u0 = e0.map(unquantize);
    let u1 = e1.map(unquantize);
    let palette: [[f32; 3]; 16] = core::array::from_fn(|i| {
        let w = WEIGHTS_4[i];
        core::array::from_fn(|c| ((u0[c] * (64 - w) + u1[c] * w + 32) >> 6) as f32 * scale[c])
    });

    let mut indices = [0u32; 16];
    let mut error = 0.0;
    for (point, index) in points.iter().zip(indices.iter_mut()) {
        let (best, best_error) = closest(&palette, point);
        *index = best;
        error += best_error;
    }

    let swap = indices[0] >= 8;
    if swap {
        core::mem::swap(&mut e0, &mut e1);
        for index in indices.iter_mut() {
            *index = 15 - *index;
        }
    }

    let positions = core::array::from_fn(|i| {
        let position = WEIGHTS_4[indices[i] as usize] as f32 / 64.0;
        if swap {
            1.0 - position
        } else {
            position
        }
    });

    let mut writer = BitWriter::default();
    writer.write(MODE_11, 5);
    for endpoint in [e0, e1] {
        for value in endpoint {
            writer.write(value, ENDPOINT_BITS);
        }
    }
    writer.write(indices[0], 3);
    for &index in &indices[1..] {
        writer.write(index, 4);
    }

    Fit {
        encoded: writer.into_bytes(),
        error,
        positions,
    }
}

/// Index and squared distance of the palette entry closest to `point`.
pub(crate) fn closest<const N: usize>(palette: &[[f32; N]; 16], point: &[f32; N]) -> (u32, f32) {
    let mut best = 0;
    let mut best_error = f32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let error = distance_sq(entry, point);
        if error < best_error {
            best = i as u32;
            best_error = error;
        }
    }
    (best, best_error)
}

/// Expands a 10-bit endpoint to the 16-bit value the decoder interpolates.
#[inline]
fn unquantize(value: u32) -> u32 {
    match value {
        0 => 0,
        ENDPOINT_MAX => 0xFFFF,
        _ => ((value << 16) + 0x8000) >> ENDPOINT_BITS,
    }
}

/// The endpoint whose [`unquantize`]d value is closest to `target`.
#[inline]
fn quantize_endpoint(target: f32) -> u32 {
    let guess = round_clamp((target - 32.0) / 64.0, ENDPOINT_MAX);
    let lower = guess.saturating_sub(1);
    let upper = (guess + 1).min(ENDPOINT_MAX);
    (lower..=upper)
        .min_by_key(|&e| (unquantize(e) as i64 - target as i64).unsigned_abs())
        .unwrap_or(guess)
}

/// The 16-bit interpolation-space value that decodes to the half float `half`.
#[inline]
fn half_to_unquantized(half: u16) -> f32 {
    half as f32 * 64.0 / 31.0
}

/// Converts a value in `[0, 1]` to IEEE 754 half precision bits, rounding to nearest.
pub(crate) fn f32_to_half_bits(value: f32) -> u16 {
    if value <= 0.0 {
        return 0;
    }
    let value = value.min(65504.0);
    let bits = value.to_bits();
    let exponent = ((bits >> 23) & 0xFF) as i32 - 127 + 15;
    if exponent <= 0 {
        // Subnormal half; the unit is 2^-24.
        return (value * 16_777_216.0 + 0.5) as u16;
    }

    let mantissa = bits & 0x7F_FFFF;
    let mut half = ((exponent as u32) << 10) | (mantissa >> 13);
    if mantissa & 0x1000 != 0 {
        half += 1;
    }
    half as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0.0, 0x0000)]
    #[case(1.0, 0x3C00)]
    #[case(0.5, 0x3800)]
    #[case(0.25, 0x3400)]
    #[case(1.0 / 255.0, 0x1C04)]
    fn half_conversion(#[case] value: f32, #[case] expected: u16) {
        assert_eq!(f32_to_half_bits(value), expected);
    }

    #[test]
    fn endpoint_quantization_inverts_unquantize() {
        for e in 0..=ENDPOINT_MAX {
            assert_eq!(quantize_endpoint(unquantize(e) as f32), e);
        }
    }

    #[test]
    fn header_uses_mode_11() {
        let block = gradient_block(Color8888::new(10, 20, 30, 255), [3, 2, 1, 0]);
        let mut output = [0u8; 16];
        compress_bc6h(&block, BlockSettings::default(), &mut output);
        assert_eq!(output[0] & 0x1F, 0b00011);
    }
}
