//! # BC7 Block Encoder (mode 6)
//!
//! Mode 6 stores a single subset with RGBA endpoints and 4-bit indices:
//!
//! ```text
//! Bits:  0..7     7..63                      63..65   65..68    68..128
//!        +--------+--------------------------+--------+---------+-----------------+
//!        | 1000000| R0 R1 G0 G1 B0 B1 A0 A1  | P0 P1  | index 0 | indices 1..16   |
//!        |        | 8 x 7 bits               | 2 bits | 3 bits  | 15 x 4 bits     |
//!        +--------+--------------------------+--------+---------+-----------------+
//! ```
//!
//! Each endpoint channel decodes as `(value << 1) | P`, so the 7-bit values and the shared
//! p-bit together give full 8-bit endpoints.

use crate::bc6h::{closest, WEIGHTS_4};
use crate::bits::BitWriter;
use crate::endpoints::{round_clamp, search_endpoints, Fit};
use crate::BlockSettings;
use ddsplus_common::block_4x4::Block4x4;

const MODE_6: u32 = 1 << 6;

/// An RGBA endpoint as stored: four 7-bit values plus the p-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoint {
    values: [u32; 4],
    p: u32,
}

impl Endpoint {
    /// The 8-bit RGBA colour this endpoint decodes to.
    #[inline]
    fn expanded(self) -> [u32; 4] {
        self.values.map(|v| (v << 1) | self.p)
    }
}

/// Compresses `block` as a mode 6 BC7 block.
pub(crate) fn compress_bc7(block: &Block4x4, settings: BlockSettings, output: &mut [u8]) {
    let [sr, sg, sb] = settings.error_metric.channel_scale();
    let scale = [sr, sg, sb, 1.0];
    let opaque = !block.has_alpha_below(255);

    let points: [[f32; 4]; 16] = core::array::from_fn(|i| {
        let rgba = block.pixels[i].to_rgba_bytes();
        core::array::from_fn(|c| rgba[c] as f32 * scale[c])
    });

    let fit = search_endpoints(&points, settings.speed, |start, end| {
        encode_with_endpoints(&points, start, end, scale, opaque)
    });
    output[..16].copy_from_slice(&fit.encoded);
}

fn encode_with_endpoints(
    points: &[[f32; 4]; 16],
    start: [f32; 4],
    end: [f32; 4],
    scale: [f32; 4],
    opaque: bool,
) -> Fit<[u8; 16]> {
    let unscale = |point: [f32; 4]| -> [f32; 4] { core::array::from_fn(|c| point[c] / scale[c]) };
    let mut e0 = quantize_endpoint(unscale(start), scale, opaque);
    let mut e1 = quantize_endpoint(unscale(end), scale, opaque);

    let c0 = e0.expanded();
    let c1 = e1.expanded();
    let palette: [[f32; 4]; 16] = core::array::from_fn(|i| {
        let w = WEIGHTS_4[i];
        core::array::from_fn(|c| ((c0[c] * (64 - w) + c1[c] * w + 32) >> 6) as f32 * scale[c])
    });

    let mut indices = [0u32; 16];
    let mut error = 0.0;
    for (point, index) in points.iter().zip(indices.iter_mut()) {
        let (best, best_error) = closest(&palette, point);
        *index = best;
        error += best_error;
    }

    // Pixel 0's index has an implicit leading zero.
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
    writer.write(MODE_6, 7);
    for c in 0..4 {
        writer.write(e0.values[c], 7);
        writer.write(e1.values[c], 7);
    }
    writer.write(e0.p, 1);
    writer.write(e1.p, 1);
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

/// Picks the 7-bit values and p-bit whose expansion is closest to `target` (8-bit RGBA).
///
/// Opaque blocks always use `p = 1`, so an alpha of 127 expands to exactly 255.
fn quantize_endpoint(target: [f32; 4], scale: [f32; 4], opaque: bool) -> Endpoint {
    let with_p = |p: u32| {
        let mut values: [u32; 4] =
            core::array::from_fn(|c| round_clamp((target[c] - p as f32) / 2.0, 127));
        if opaque {
            values[3] = 127;
        }
        let endpoint = Endpoint { values, p };
        let expanded = endpoint.expanded();
        let error: f32 = (0..4)
            .map(|c| {
                let d = (expanded[c] as f32 - target[c]) * scale[c];
                d * d
            })
            .sum();
        (endpoint, error)
    };

    let (odd, odd_error) = with_p(1);
    if opaque {
        return odd;
    }
    let (even, even_error) = with_p(0);
    if even_error < odd_error {
        even
    } else {
        odd
    }
}
