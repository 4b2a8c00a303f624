//! # 4x4 Pixel Blocks
//!
//! Every BCn format compresses an image as a grid of 4x4 pixel tiles. This module provides
//! [`Block4x4`], the uncompressed form of one such tile, along with the code that carves
//! tiles out of (and back into) a strided RGBA8 image.
//!
//! ## Memory Layout
//!
//! The pixels are stored in row-major order:
//! ```text
//! [ 0] [ 1] [ 2] [ 3]
//! [ 4] [ 5] [ 6] [ 7]
//! [ 8] [ 9] [10] [11]
//! [12] [13] [14] [15]
//! ```
//!
//! ## Edge Blocks
//!
//! When an image dimension is not a multiple of 4, the blocks on the right and bottom edges
//! hang over the image. [`Block4x4::extract_clamped`] fills the overhanging pixels by
//! clamping the coordinates to the last valid column/row, so the encoder never reads out of
//! bounds and the padding does not introduce colours that are not present in the image.

use crate::color_8888::Color8888;

/// Represents an uncompressed 4x4 block of pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block4x4 {
    /// The 16 pixels in the block (row-major order)
    /// (i.e. `pixels[0]` is top-left, `pixels[3]` is top-right, etc.)
    pub pixels: [Color8888; 16],
}

impl Default for Block4x4 {
    fn default() -> Self {
        Self::new(Color8888::default())
    }
}

impl Block4x4 {
    /// Constructs a new block initialised with 16 copies of the provided pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddsplus_common::color_8888::Color8888;
    /// use ddsplus_common::block_4x4::Block4x4;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// let block = Block4x4::new(pixel);
    /// assert!(block.has_identical_pixels());
    /// ```
    pub const fn new(pixel: Color8888) -> Self {
        Self {
            pixels: [pixel; 16],
        }
    }

    /// Gets the pixel at `(x, y)` within the block.
    ///
    /// # Panics
    ///
    /// If `x >= 4` or `y >= 4`.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color8888 {
        assert!(x < 4 && y < 4);
        self.pixels[y * 4 + x]
    }

    /// Checks if all pixels in the block have the same value.
    #[inline]
    pub fn has_identical_pixels(&self) -> bool {
        let first = self.pixels[0];
        self.pixels.iter().all(|&pixel| pixel == first)
    }

    /// Checks if any pixel in the block has an alpha value below `threshold`.
    #[inline]
    pub fn has_alpha_below(&self, threshold: u8) -> bool {
        self.pixels.iter().any(|pixel| pixel.a < threshold)
    }

    /// Copies the 4x4 block whose top-left pixel is `(block_x * 4, block_y * 4)` out of
    /// a strided RGBA8 image.
    ///
    /// Pixels that fall outside the image are replaced with the nearest pixel on the
    /// image edge.
    ///
    /// # Parameters
    ///
    /// - `image`: RGBA8 pixel data, row `y` starting at `y * stride`
    /// - `width`/`height`: Dimensions of the image in pixels (both non-zero)
    /// - `stride`: Distance between rows, in bytes
    /// - `block_x`/`block_y`: Block coordinates (not pixel coordinates)
    ///
    /// # Panics
    ///
    /// If the image slice is too short for the given geometry.
    pub fn extract_clamped(
        image: &[u8],
        width: usize,
        height: usize,
        stride: usize,
        block_x: usize,
        block_y: usize,
    ) -> Self {
        debug_assert!(width > 0 && height > 0);
        let mut block = Self::default();
        let base_x = block_x * 4;
        let base_y = block_y * 4;

        for y in 0..4 {
            let src_y = (base_y + y).min(height - 1);
            let row = &image[src_y * stride..];
            for x in 0..4 {
                let src_x = (base_x + x).min(width - 1);
                block.pixels[y * 4 + x] = Color8888::from_rgba_bytes(&row[src_x * 4..]);
            }
        }

        block
    }

    /// Writes the part of this block that lies inside the image back into a strided RGBA8 image.
    ///
    /// This is the inverse of [`Block4x4::extract_clamped`]; pixels that would land outside of
    /// the image are discarded.
    pub fn store_cropped(
        &self,
        image: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
        block_x: usize,
        block_y: usize,
    ) {
        let base_x = block_x * 4;
        let base_y = block_y * 4;
        let columns = width.saturating_sub(base_x).min(4);
        let rows = height.saturating_sub(base_y).min(4);

        for y in 0..rows {
            let row_start = (base_y + y) * stride + base_x * 4;
            let row = &mut image[row_start..row_start + columns * 4];
            for (x, dst) in row.chunks_exact_mut(4).enumerate() {
                dst.copy_from_slice(&self.pixels[y * 4 + x].to_rgba_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn interior_block_is_copied_verbatim() {
        let image = coordinate_image(8, 8);
        let block = Block4x4::extract_clamped(&image, 8, 8, 8 * 4, 1, 1);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(block.get_pixel(x, y), coordinate_pixel(4 + x, 4 + y));
            }
        }
    }

    #[rstest]
    #[case::five_by_five(5, 5)]
    #[case::one_by_one(1, 1)]
    #[case::wide(6, 2)]
    #[case::tall(3, 7)]
    fn edge_blocks_clamp_to_last_pixel(#[case] width: usize, #[case] height: usize) {
        let image = coordinate_image(width, height);
        let blocks_x = width.div_ceil(4);
        let blocks_y = height.div_ceil(4);
        let block =
            Block4x4::extract_clamped(&image, width, height, width * 4, blocks_x - 1, blocks_y - 1);

        for y in 0..4 {
            for x in 0..4 {
                let src_x = ((blocks_x - 1) * 4 + x).min(width - 1);
                let src_y = ((blocks_y - 1) * 4 + y).min(height - 1);
                assert_eq!(block.get_pixel(x, y), coordinate_pixel(src_x, src_y));
            }
        }
    }

    #[test]
    fn padded_stride_is_respected() {
        // 2x2 image with 4 bytes of row padding.
        let stride = 12;
        let mut image = vec![0xEE; stride * 2];
        image[0..4].copy_from_slice(&[1, 1, 1, 1]);
        image[4..8].copy_from_slice(&[2, 2, 2, 2]);
        image[12..16].copy_from_slice(&[3, 3, 3, 3]);
        image[16..20].copy_from_slice(&[4, 4, 4, 4]);

        let block = Block4x4::extract_clamped(&image, 2, 2, stride, 0, 0);
        assert_eq!(block.get_pixel(3, 0), Color8888::new(2, 2, 2, 2));
        assert_eq!(block.get_pixel(0, 3), Color8888::new(3, 3, 3, 3));
        assert_eq!(block.get_pixel(3, 3), Color8888::new(4, 4, 4, 4));
    }

    #[test]
    fn store_cropped_inverts_extract() {
        let (width, height) = (5, 6);
        let image = coordinate_image(width, height);
        let mut restored = vec![0u8; image.len()];

        for by in 0..height.div_ceil(4) {
            for bx in 0..width.div_ceil(4) {
                let block = Block4x4::extract_clamped(&image, width, height, width * 4, bx, by);
                block.store_cropped(&mut restored, width, height, width * 4, bx, by);
            }
        }

        assert_eq!(restored, image);
    }

    #[test]
    fn alpha_threshold_detection() {
        let mut block = Block4x4::new(Color8888::new(0, 0, 0, 255));
        assert!(!block.has_alpha_below(128));
        block.pixels[7].a = 127;
        assert!(block.has_alpha_below(128));
    }
}
