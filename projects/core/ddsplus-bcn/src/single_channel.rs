//! Interpolated single channel blocks: the alpha half of BC3, BC4, and each half of BC5.
//!
//! ```text
//! Address: 0    1    2                       8
//!          +----+----+-----------------------+
//! Data:    | e0 | e1 | 16 x 3-bit indices    |
//!          +----+----+-----------------------+
//! ```
//!
//! - `e0 > e1`: 8 values, `e0`, `e1` and six evenly spaced values between them.
//! - `e0 <= e1`: 6 values, `e0`, `e1`, four values between them, then `0` and `255`.

use crate::CompressionSpeed;
use ddsplus_common::block_4x4::Block4x4;

/// Radius of the endpoint neighbourhood searched at [`CompressionSpeed::Slow`].
const SLOW_SEARCH_RADIUS: i32 = 2;

/// Compresses the red channel of `block` as a BC4 block.
pub(crate) fn compress_bc4(block: &Block4x4, speed: CompressionSpeed, output: &mut [u8]) {
    output[..8].copy_from_slice(&encode_channel(&channel(block, |p| p.r), speed));
}

/// Compresses the red and green channels of `block` as a BC5 block.
pub(crate) fn compress_bc5(block: &Block4x4, speed: CompressionSpeed, output: &mut [u8]) {
    output[..8].copy_from_slice(&encode_channel(&channel(block, |p| p.r), speed));
    output[8..16].copy_from_slice(&encode_channel(&channel(block, |p| p.g), speed));
}

/// Collects one channel of every pixel of `block`.
pub(crate) fn channel(
    block: &Block4x4,
    select: impl Fn(&ddsplus_common::color_8888::Color8888) -> u8,
) -> [u8; 16] {
    core::array::from_fn(|i| select(&block.pixels[i]))
}

/// Encodes 16 values as an interpolated single channel block.
pub(crate) fn encode_channel(values: &[u8; 16], speed: CompressionSpeed) -> [u8; 8] {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    if min == max {
        // e0 <= e1 selects the 6 value palette, whose entry 0 is e0.
        return [min, max, 0, 0, 0, 0, 0, 0];
    }

    let mut best = encode_with_palette(values, max, min);
    if speed == CompressionSpeed::Fast {
        return best.0;
    }

    let (inner_min, inner_max) = values
        .iter()
        .copied()
        .filter(|&v| v != 0 && v != 255)
        .fold(None, |range: Option<(u8, u8)>, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0, 255));
    let six = encode_with_palette(values, inner_min, inner_max);
    if six.1 < best.1 {
        best = six;
    }

    if speed == CompressionSpeed::Slow {
        for d0 in -SLOW_SEARCH_RADIUS..=SLOW_SEARCH_RADIUS {
            for d1 in -SLOW_SEARCH_RADIUS..=SLOW_SEARCH_RADIUS {
                let e0 = (max as i32 + d0).clamp(0, 255) as u8;
                let e1 = (min as i32 + d1).clamp(0, 255) as u8;
                if e0 <= e1 {
                    continue;
                }
                let candidate = encode_with_palette(values, e0, e1);
                if candidate.1 < best.1 {
                    best = candidate;
                }
            }
        }
    }

    best.0
}

/// The palette decoded from endpoints `e0` and `e1`.
pub(crate) fn palette(e0: u8, e1: u8) -> [u8; 8] {
    let (a, b) = (e0 as u32, e1 as u32);
    let mix = |wa: u32, wb: u32, div: u32| ((wa * a + wb * b + div / 2) / div) as u8;
    if e0 > e1 {
        [
            e0,
            e1,
            mix(6, 1, 7),
            mix(5, 2, 7),
            mix(4, 3, 7),
            mix(3, 4, 7),
            mix(2, 5, 7),
            mix(1, 6, 7),
        ]
    } else {
        [
            e0,
            e1,
            mix(4, 1, 5),
            mix(3, 2, 5),
            mix(2, 3, 5),
            mix(1, 4, 5),
            0,
            255,
        ]
    }
}

/// Encodes `values` against the palette of `(e0, e1)`, returning the block and its squared error.
fn encode_with_palette(values: &[u8; 16], e0: u8, e1: u8) -> ([u8; 8], u32) {
    let palette = palette(e0, e1);
    let mut indices = 0u64;
    let mut error = 0u32;
    for (i, &value) in values.iter().enumerate() {
        let (index, distance) = palette
            .iter()
            .enumerate()
            .map(|(index, &entry)| (index, value.abs_diff(entry) as u32))
            .min_by_key(|&(_, distance)| distance)
            .unwrap_or((0, 0));
        indices |= (index as u64) << (i * 3);
        error += distance * distance;
    }

    let mut encoded = [0u8; 8];
    encoded[0] = e0;
    encoded[1] = e1;
    encoded[2..8].copy_from_slice(&indices.to_le_bytes()[..6]);
    (encoded, error)
}
