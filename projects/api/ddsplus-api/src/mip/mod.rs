//! Mip chain generation.
//!
//! A [`MipChain`] starts with the caller's image and lazily produces each following level by
//! resampling the previous one to half its size (rounded down, never below 1) until both
//! dimensions reach 1.

#[cfg(feature = "image")]
mod image_resampler;

#[cfg(feature = "image")]
pub use image_resampler::ImageResampler;

use crate::request::{MipmapFilter, PixelBuffer};
use alloc::borrow::Cow;
use alloc::vec::Vec;
use ddsplus_dds::max_mip_count;

/// One level of a mip chain: RGBA8 pixels, rows `stride` bytes apart.
///
/// The first level borrows the caller's buffer; every other level owns tightly packed pixels.
#[derive(Debug, Clone)]
pub struct MipLevel<'a> {
    width: u32,
    height: u32,
    stride: usize,
    pixels: Cow<'a, [u8]>,
}

impl<'a> MipLevel<'a> {
    /// Borrows a validated [`PixelBuffer`].
    ///
    /// # Panics
    ///
    /// In debug builds, if the buffer has non-positive dimensions.
    pub fn from_buffer(buffer: &PixelBuffer<'a>) -> Self {
        debug_assert!(buffer.width > 0 && buffer.height > 0);
        Self {
            width: buffer.width as u32,
            height: buffer.height as u32,
            stride: buffer.stride as usize,
            pixels: Cow::Borrowed(buffer.scan0),
        }
    }

    /// Wraps tightly packed RGBA8 pixels.
    ///
    /// # Panics
    ///
    /// In debug builds, if `pixels` is not exactly `width * height * 4` bytes long.
    pub fn from_packed(width: u32, height: u32, pixels: Vec<u8>) -> MipLevel<'static> {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        MipLevel {
            width,
            height,
            stride: width as usize * 4,
            pixels: Cow::Owned(pixels),
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance between rows in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The raw pixel data, including any row padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// The `width * 4` bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize * 4]
    }

    /// The RGBA bytes of the pixel at (`x`, `y`).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = y as usize * self.stride + x as usize * 4;
        [
            self.pixels[start],
            self.pixels[start + 1],
            self.pixels[start + 2],
            self.pixels[start + 3],
        ]
    }
}

/// Resizes images; the capability behind mip level generation.
pub trait Resampler {
    /// Resamples `source` to `width` x `height` with `filter`.
    ///
    /// With `linear_light`, colour channels are converted from sRGB to linear before
    /// filtering and back afterwards. Alpha is always filtered as is.
    fn resize(
        &self,
        source: &MipLevel<'_>,
        width: u32,
        height: u32,
        filter: MipmapFilter,
        linear_light: bool,
    ) -> MipLevel<'static>;
}

impl<T: Resampler + ?Sized> Resampler for &T {
    #[inline]
    fn resize(
        &self,
        source: &MipLevel<'_>,
        width: u32,
        height: u32,
        filter: MipmapFilter,
        linear_light: bool,
    ) -> MipLevel<'static> {
        (**self).resize(source, width, height, filter, linear_light)
    }
}

/// How each level is produced from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResampleOptions {
    /// The resampling filter.
    pub filter: MipmapFilter,
    /// Whether to filter in linear light.
    pub linear_light: bool,
}

/// A lazily generated, finite sequence of mip levels, largest first.
pub struct MipChain<'a, R> {
    current: MipLevel<'a>,
    started: bool,
    remaining: u32,
    options: ResampleOptions,
    resampler: R,
}

impl<'a, R: Resampler> MipChain<'a, R> {
    /// Creates a chain starting at `base`.
    ///
    /// With `generate` set, the chain has [`max_mip_count`] levels; otherwise it holds only
    /// `base`.
    pub fn new(
        base: &PixelBuffer<'a>,
        generate: bool,
        options: ResampleOptions,
        resampler: R,
    ) -> Self {
        let current = MipLevel::from_buffer(base);
        let remaining = if generate {
            max_mip_count(current.width, current.height)
        } else {
            1
        };
        Self {
            current,
            started: false,
            remaining,
            options,
            resampler,
        }
    }

    /// Number of levels not yet produced.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Produces the next level, resampled from the previous one.
    ///
    /// Returns [`None`] once the chain is exhausted.
    pub fn next_level(&mut self) -> Option<&MipLevel<'a>> {
        if self.remaining == 0 {
            return None;
        }

        if self.started {
            let width = (self.current.width / 2).max(1);
            let height = (self.current.height / 2).max(1);
            self.current = self.resampler.resize(
                &self.current,
                width,
                height,
                self.options.filter,
                self.options.linear_light,
            );
        }
        self.started = true;
        self.remaining -= 1;
        Some(&self.current)
    }
}
