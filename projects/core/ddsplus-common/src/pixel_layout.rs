//! Uncompressed DDS pixel layouts.
//!
//! Each [`PixelLayout`] describes how one pixel is stored in an uncompressed DDS surface.
//! Multi-byte layouts are little endian, matching the `DXGI_FORMAT` definitions, e.g.
//! `B5G6R5` keeps blue in the low 5 bits of a `u16`.
//!
//! Reduced precision channels are quantized with rounding on the way in and expanded by
//! bit replication on the way out, so any value that was produced by expansion survives a
//! second round trip unchanged.
//!
//! [`ErrorDiffusion`] encodes rows with Floyd-Steinberg dithering instead, which trades the
//! banding of the 16-bit layouts for noise.

use crate::color_8888::Color8888;
use alloc::vec;
use alloc::vec::Vec;
use derive_enum_all_values::AllValues;

/// The uncompressed layouts a DDS surface can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum PixelLayout {
    /// 32-bit, bytes `[b, g, r, a]`.
    B8G8R8A8,
    /// 32-bit, bytes `[b, g, r, x]`. Alpha is dropped on write and reads back as 255.
    B8G8R8X8,
    /// 32-bit, bytes `[r, g, b, a]`.
    R8G8B8A8,
    /// 16-bit, `a:1 r:5 g:5 b:5` from the most significant bit down.
    B5G5R5A1,
    /// 16-bit, `a:4 r:4 g:4 b:4` from the most significant bit down.
    B4G4R4A4,
    /// 16-bit, `r:5 g:6 b:5` from the most significant bit down.
    B5G6R5,
}

impl PixelLayout {
    /// Number of bytes a single pixel occupies in this layout.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::B8G8R8A8 | PixelLayout::B8G8R8X8 | PixelLayout::R8G8B8A8 => 4,
            PixelLayout::B5G5R5A1 | PixelLayout::B4G4R4A4 | PixelLayout::B5G6R5 => 2,
        }
    }

    /// Whether the layout stores an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        !matches!(self, PixelLayout::B8G8R8X8 | PixelLayout::B5G6R5)
    }

    /// Encodes a single pixel into `dst`, which must hold at least [`Self::bytes_per_pixel`] bytes.
    #[inline]
    pub fn encode_pixel(self, pixel: Color8888, dst: &mut [u8]) {
        let Color8888 { r, g, b, a } = pixel;
        match self {
            PixelLayout::B8G8R8A8 => dst[..4].copy_from_slice(&[b, g, r, a]),
            PixelLayout::B8G8R8X8 => dst[..4].copy_from_slice(&[b, g, r, 255]),
            PixelLayout::R8G8B8A8 => dst[..4].copy_from_slice(&[r, g, b, a]),
            PixelLayout::B5G5R5A1 => {
                let value = ((a >= 128) as u16) << 15
                    | quantize(r, 5) << 10
                    | quantize(g, 5) << 5
                    | quantize(b, 5);
                dst[..2].copy_from_slice(&value.to_le_bytes());
            }
            PixelLayout::B4G4R4A4 => {
                let value = quantize(a, 4) << 12
                    | quantize(r, 4) << 8
                    | quantize(g, 4) << 4
                    | quantize(b, 4);
                dst[..2].copy_from_slice(&value.to_le_bytes());
            }
            PixelLayout::B5G6R5 => {
                let value = quantize(r, 5) << 11 | quantize(g, 6) << 5 | quantize(b, 5);
                dst[..2].copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    /// Decodes a single pixel from `src`, which must hold at least [`Self::bytes_per_pixel`] bytes.
    #[inline]
    pub fn decode_pixel(self, src: &[u8]) -> Color8888 {
        match self {
            PixelLayout::B8G8R8A8 => Color8888::new(src[2], src[1], src[0], src[3]),
            PixelLayout::B8G8R8X8 => Color8888::new(src[2], src[1], src[0], 255),
            PixelLayout::R8G8B8A8 => Color8888::new(src[0], src[1], src[2], src[3]),
            PixelLayout::B5G5R5A1 => {
                let value = u16::from_le_bytes([src[0], src[1]]);
                Color8888::new(
                    expand(value >> 10, 5),
                    expand(value >> 5, 5),
                    expand(value, 5),
                    if value & 0x8000 != 0 { 255 } else { 0 },
                )
            }
            PixelLayout::B4G4R4A4 => {
                let value = u16::from_le_bytes([src[0], src[1]]);
                Color8888::new(
                    expand(value >> 8, 4),
                    expand(value >> 4, 4),
                    expand(value, 4),
                    expand(value >> 12, 4),
                )
            }
            PixelLayout::B5G6R5 => {
                let value = u16::from_le_bytes([src[0], src[1]]);
                Color8888::new(
                    expand(value >> 11, 5),
                    expand(value >> 5, 6),
                    expand(value, 5),
                    255,
                )
            }
        }
    }

    /// Encodes a row of RGBA8 pixels into this layout.
    ///
    /// `src` holds `n * 4` bytes and `dst` holds `n * bytes_per_pixel` bytes; any excess in
    /// either slice is left untouched.
    pub fn encode_row(self, src: &[u8], dst: &mut [u8]) {
        let bpp = self.bytes_per_pixel();
        for (pixel, out) in src.chunks_exact(4).zip(dst.chunks_exact_mut(bpp)) {
            self.encode_pixel(Color8888::from_rgba_bytes(pixel), out);
        }
    }

    /// Decodes a row in this layout into RGBA8 pixels.
    ///
    /// The inverse of [`Self::encode_row`].
    pub fn decode_row(self, src: &[u8], dst: &mut [u8]) {
        let bpp = self.bytes_per_pixel();
        for (pixel, out) in src.chunks_exact(bpp).zip(dst.chunks_exact_mut(4)) {
            out.copy_from_slice(&self.decode_pixel(pixel).to_rgba_bytes());
        }
    }
}

/// Floyd-Steinberg error diffusion across the rows of one image.
///
/// The quantization error of each pixel is pushed to its unencoded neighbours: 7/16 to the
/// right, and 3/16, 5/16 and 1/16 to the row below. Rows must be fed top to bottom.
#[derive(Debug, Clone)]
pub struct ErrorDiffusion {
    layout: PixelLayout,
    /// Pending error for the row being encoded, in 1/16ths of a level, padded by one
    /// pixel on each side.
    current: Vec<[i32; 4]>,
    /// Error collected for the row below.
    next: Vec<[i32; 4]>,
}

impl ErrorDiffusion {
    /// Creates the diffusion state for an image `width` pixels wide.
    pub fn new(layout: PixelLayout, width: usize) -> Self {
        Self {
            layout,
            current: vec![[0; 4]; width + 2],
            next: vec![[0; 4]; width + 2],
        }
    }

    /// Encodes the next row of RGBA8 pixels, like [`PixelLayout::encode_row`].
    pub fn encode_row(&mut self, src: &[u8], dst: &mut [u8]) {
        let layout = self.layout;
        let bpp = layout.bytes_per_pixel();
        let channels = if layout.has_alpha() { 4 } else { 3 };

        for (x, (pixel, out)) in src
            .chunks_exact(4)
            .zip(dst.chunks_exact_mut(bpp))
            .take(self.current.len() - 2)
            .enumerate()
        {
            let mut wanted = [0i32; 4];
            let mut adjusted = [0u8; 4];
            for c in 0..4 {
                let error = if c < channels { self.current[x + 1][c] } else { 0 };
                wanted[c] = (pixel[c] as i32 * 16 + error).clamp(0, 255 * 16);
                adjusted[c] = ((wanted[c] + 8) / 16) as u8;
            }

            layout.encode_pixel(Color8888::from_rgba_bytes(&adjusted), out);
            let stored = layout.decode_pixel(out).to_rgba_bytes();

            for c in 0..channels {
                let error = wanted[c] - stored[c] as i32 * 16;
                self.current[x + 2][c] += error * 7 / 16;
                self.next[x][c] += error * 3 / 16;
                self.next[x + 1][c] += error * 5 / 16;
                self.next[x + 2][c] += error / 16;
            }
        }

        core::mem::swap(&mut self.current, &mut self.next);
        self.next.fill([0; 4]);
    }
}

/// Quantizes an 8-bit value to `bits` bits, rounding to nearest.
#[inline]
fn quantize(value: u8, bits: u32) -> u16 {
    let max = (1u32 << bits) - 1;
    ((value as u32 * max + 127) / 255) as u16
}

/// Expands the low `bits` bits of `value` to 8 bits by replicating the top bits.
#[inline]
fn expand(value: u16, bits: u32) -> u8 {
    let v = (value & ((1 << bits) - 1)) as u32;
    match bits {
        4 => (v * 17) as u8,
        _ => ((v << (8 - bits)) | (v >> (2 * bits - 8))) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case::bgra(PixelLayout::B8G8R8A8, [0x30, 0x20, 0x10, 0x40])]
    #[case::bgrx(PixelLayout::B8G8R8X8, [0x30, 0x20, 0x10, 0xFF])]
    #[case::rgba(PixelLayout::R8G8B8A8, [0x10, 0x20, 0x30, 0x40])]
    fn byte_orders_match_dxgi(#[case] layout: PixelLayout, #[case] expected: [u8; 4]) {
        let mut out = [0u8; 4];
        layout.encode_pixel(Color8888::new(0x10, 0x20, 0x30, 0x40), &mut out);
        assert_eq!(out, expected);
    }

    #[rstest]
    #[case::red_565(PixelLayout::B5G6R5, Color8888::new(255, 0, 0, 255), 0xF800)]
    #[case::green_565(PixelLayout::B5G6R5, Color8888::new(0, 255, 0, 255), 0x07E0)]
    #[case::blue_565(PixelLayout::B5G6R5, Color8888::new(0, 0, 255, 255), 0x001F)]
    #[case::alpha_5551(PixelLayout::B5G5R5A1, Color8888::new(0, 0, 0, 255), 0x8000)]
    #[case::red_5551(PixelLayout::B5G5R5A1, Color8888::new(255, 0, 0, 0), 0x7C00)]
    #[case::alpha_4444(PixelLayout::B4G4R4A4, Color8888::new(0, 0, 0, 255), 0xF000)]
    #[case::red_4444(PixelLayout::B4G4R4A4, Color8888::new(255, 0, 0, 0), 0x0F00)]
    fn packed_layouts_use_expected_bits(
        #[case] layout: PixelLayout,
        #[case] pixel: Color8888,
        #[case] expected: u16,
    ) {
        let mut out = [0u8; 2];
        layout.encode_pixel(pixel, &mut out);
        assert_eq!(u16::from_le_bytes(out), expected);
    }

    /// Every raw 16-bit value must decode and re-encode to itself.
    #[rstest]
    #[case::b5g5r5a1(PixelLayout::B5G5R5A1)]
    #[case::b4g4r4a4(PixelLayout::B4G4R4A4)]
    #[case::b5g6r5(PixelLayout::B5G6R5)]
    fn packed_layouts_round_trip_every_value(#[case] layout: PixelLayout) {
        for raw in 0..=u16::MAX {
            let pixel = layout.decode_pixel(&raw.to_le_bytes());
            let mut out = [0u8; 2];
            layout.encode_pixel(pixel, &mut out);
            assert_eq!(u16::from_le_bytes(out), raw, "{layout:?} raw value {raw:#06X}");
        }
    }

    #[test]
    fn row_transcoding_round_trips_for_all_32bit_layouts() {
        let row = coordinate_image(7, 1);
        for &layout in PixelLayout::all_values() {
            if layout.bytes_per_pixel() != 4 || !layout.has_alpha() {
                continue;
            }
            let mut encoded = vec![0u8; 7 * layout.bytes_per_pixel()];
            let mut decoded = vec![0u8; row.len()];
            layout.encode_row(&row, &mut encoded);
            layout.decode_row(&encoded, &mut decoded);
            assert_eq!(decoded, row, "{layout:?}");
        }
    }

    /// Mean absolute difference between each channel's average in `a` and `b`.
    fn mean_drift(a: &[u8], b: &[u8]) -> f64 {
        let mut drift = 0.0;
        for c in 0..3 {
            let sum = |data: &[u8]| {
                data.iter()
                    .skip(c)
                    .step_by(4)
                    .map(|&v| v as f64)
                    .sum::<f64>()
            };
            drift += (sum(a) - sum(b)).abs() / (a.len() / 4) as f64;
        }
        drift
    }

    #[rstest]
    #[case::b5g6r5(PixelLayout::B5G6R5)]
    #[case::b5g5r5a1(PixelLayout::B5G5R5A1)]
    #[case::b4g4r4a4(PixelLayout::B4G4R4A4)]
    fn dithered_gradient_keeps_the_source_mean(#[case] layout: PixelLayout) {
        // Shallow ramps sitting between quantization steps, which plain rounding flattens.
        let (width, height) = (32, 8);
        let mut source = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                source.extend_from_slice(&[100 + (x / 8) as u8, 150, 37, 255]);
            }
        }

        let bpp = layout.bytes_per_pixel();
        let mut plain = vec![0u8; width * height * bpp];
        let mut dithered = vec![0u8; width * height * bpp];
        let mut diffusion = ErrorDiffusion::new(layout, width);
        for y in 0..height {
            let row = &source[y * width * 4..(y + 1) * width * 4];
            let out = y * width * bpp..(y + 1) * width * bpp;
            layout.encode_row(row, &mut plain[out.clone()]);
            diffusion.encode_row(row, &mut dithered[out]);
        }

        let mut plain_decoded = vec![0u8; source.len()];
        let mut dithered_decoded = vec![0u8; source.len()];
        layout.decode_row(&plain, &mut plain_decoded);
        layout.decode_row(&dithered, &mut dithered_decoded);

        let plain_drift = mean_drift(&source, &plain_decoded);
        let dithered_drift = mean_drift(&source, &dithered_decoded);
        assert!(
            dithered_drift < plain_drift,
            "{layout:?}: dithered {dithered_drift} vs plain {plain_drift}"
        );
    }

    #[test]
    fn dithering_32bit_layouts_is_lossless() {
        let image = coordinate_image(6, 3);
        for &layout in PixelLayout::all_values() {
            if layout.bytes_per_pixel() != 4 {
                continue;
            }
            let mut diffusion = ErrorDiffusion::new(layout, 6);
            for row in image.chunks_exact(6 * 4) {
                let mut plain = [0u8; 6 * 4];
                let mut dithered = [0u8; 6 * 4];
                layout.encode_row(row, &mut plain);
                diffusion.encode_row(row, &mut dithered);
                assert_eq!(dithered, plain, "{layout:?}");
            }
        }
    }

    #[test]
    fn x8_layout_reads_back_opaque() {
        let mut out = [0u8; 4];
        PixelLayout::B8G8R8X8.encode_pixel(Color8888::new(1, 2, 3, 0), &mut out);
        assert_eq!(
            PixelLayout::B8G8R8X8.decode_pixel(&out),
            Color8888::new(1, 2, 3, 255)
        );
    }
}
