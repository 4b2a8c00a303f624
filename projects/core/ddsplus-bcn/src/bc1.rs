//! # BC1 Colour Block Encoder
//!
//! Encodes the 8 byte colour block used by BC1, and by the colour half of BC2 and BC3.
//!
//! ```text
//! Address: 0        2        4       8
//!          +--------+--------+--------+
//! Data:    | Color0 | Color1 | Indices|
//!          +--------+--------+--------+
//! ```
//!
//! `Color0` and `Color1` are RGB565 endpoints; `Indices` holds sixteen 2-bit palette indices,
//! pixel 0 in the least significant bits.
//!
//! In BC1 the endpoint order selects the palette:
//!
//! - `Color0 > Color1`: four colours, `c0`, `c1`, `(2c0 + c1) / 3`, `(c0 + 2c1) / 3`.
//! - `Color0 <= Color1`: three colours, `c0`, `c1`, `(c0 + c1) / 2`, and index 3 is
//!   transparent black.
//!
//! BC2 and BC3 always decode the four colour palette, whatever the endpoint order.

use crate::color_565::Color565;
use crate::endpoints::{round_clamp, search_endpoints, Fit};
use crate::BlockSettings;
use ddsplus_common::block_4x4::Block4x4;
use likely_stable::unlikely;

/// Pixels with an alpha below this value are encoded as transparent in BC1.
pub(crate) const ALPHA_THRESHOLD: u8 = 128;

/// A BC1 block in three colour mode with every pixel using index 3 (transparent black).
const TRANSPARENT_BLOCK: [u8; 8] = [0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Which palettes the colour block may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorMode {
    /// Standalone BC1: four colours, or three colours plus transparency.
    Bc1,
    /// Colour half of BC2/BC3: always four colours, alpha is stored elsewhere.
    FourColor,
}

/// Compresses a BC1 block into the first 8 bytes of `output`.
pub(crate) fn compress_bc1(block: &Block4x4, settings: BlockSettings, output: &mut [u8]) {
    output[..8].copy_from_slice(&encode_color_block(block, settings, ColorMode::Bc1));
}

/// Encodes the colour of `block` as an 8 byte BC1 colour block.
pub(crate) fn encode_color_block(
    block: &Block4x4,
    settings: BlockSettings,
    mode: ColorMode,
) -> [u8; 8] {
    let transparent = mode == ColorMode::Bc1 && block.has_alpha_below(ALPHA_THRESHOLD);
    let scale = settings.error_metric.channel_scale();

    // Metric space colours of the pixels that are not encoded as transparent.
    let mut points = [[0.0f32; 3]; 16];
    let mut count = 0;
    for pixel in &block.pixels {
        if transparent && pixel.a < ALPHA_THRESHOLD {
            continue;
        }
        points[count] = [
            pixel.r as f32 * scale[0],
            pixel.g as f32 * scale[1],
            pixel.b as f32 * scale[2],
        ];
        count += 1;
    }

    if unlikely(count == 0) {
        return TRANSPARENT_BLOCK;
    }

    let points = &points[..count];
    search_endpoints(points, settings.speed, |start, end| {
        encode_with_endpoints(block, start, end, scale, mode, transparent)
    })
    .encoded
}

/// Quantizes a candidate endpoint pair and picks the closest palette entry for every pixel.
fn encode_with_endpoints(
    block: &Block4x4,
    start: [f32; 3],
    end: [f32; 3],
    scale: [f32; 3],
    mode: ColorMode,
    transparent: bool,
) -> Fit<[u8; 8]> {
    let to_565 = |point: [f32; 3]| {
        let channel = |c: usize| round_clamp(point[c] / scale[c], 255) as u8;
        Color565::from_rgb_rounded(channel(0), channel(1), channel(2))
    };
    let mut c0 = to_565(start);
    let mut c1 = to_565(end);

    // Positions reported back to the search are relative to (start, end).
    let mut swapped = false;
    let four_color = match (mode, transparent) {
        (ColorMode::Bc1, true) => {
            if c0 > c1 {
                core::mem::swap(&mut c0, &mut c1);
                swapped = true;
            }
            false
        }
        _ => {
            if c0 < c1 {
                core::mem::swap(&mut c0, &mut c1);
                swapped = true;
            }
            // c0 == c1 decodes as three colour in BC1; all colour entries are equal then.
            mode == ColorMode::FourColor || c0 != c1
        }
    };

    let e0 = c0.to_rgb().map(|v| v as u32);
    let e1 = c1.to_rgb().map(|v| v as u32);
    let mut palette = [[0u32; 3]; 4];
    palette[0] = e0;
    palette[1] = e1;
    let (colors, palette_positions) = if four_color {
        for c in 0..3 {
            palette[2][c] = (2 * e0[c] + e1[c] + 1) / 3;
            palette[3][c] = (e0[c] + 2 * e1[c] + 1) / 3;
        }
        (4, [0.0, 1.0, 1.0 / 3.0, 2.0 / 3.0])
    } else {
        for c in 0..3 {
            palette[2][c] = (e0[c] + e1[c] + 1) / 2;
        }
        (3, [0.0, 1.0, 0.5, 0.0])
    };
    let weights = scale.map(|s| s * s);

    let mut indices = 0u32;
    let mut error = 0.0f32;
    let mut positions = [0.0f32; 16];
    let mut point = 0;
    for (i, pixel) in block.pixels.iter().enumerate() {
        if transparent && pixel.a < ALPHA_THRESHOLD {
            indices |= 3 << (i * 2);
            continue;
        }

        let rgb = pixel.rgb();
        let mut best_index = 0;
        let mut best_error = f32::MAX;
        for (index, entry) in palette.iter().take(colors).enumerate() {
            let mut entry_error = 0.0;
            for c in 0..3 {
                let d = rgb[c] as f32 - entry[c] as f32;
                entry_error += weights[c] * d * d;
            }
            if entry_error < best_error {
                best_error = entry_error;
                best_index = index;
            }
        }

        indices |= (best_index as u32) << (i * 2);
        error += best_error;
        let position = palette_positions[best_index];
        positions[point] = if swapped { 1.0 - position } else { position };
        point += 1;
    }

    let mut encoded = [0u8; 8];
    encoded[0..2].copy_from_slice(&c0.raw_value().to_le_bytes());
    encoded[2..4].copy_from_slice(&c1.raw_value().to_le_bytes());
    encoded[4..8].copy_from_slice(&indices.to_le_bytes());

    Fit {
        encoded,
        error,
        positions,
    }
}
