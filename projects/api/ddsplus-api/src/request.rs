//! The inputs of a save.

use ddsplus_bcn::{CompressionSpeed, ErrorMetric};
use ddsplus_dds::DdsFileFormat;
use derive_enum_all_values::AllValues;

/// A borrowed grid of R8G8B8A8 pixels with straight alpha.
///
/// Row `y` starts at byte `y * stride`; only the first `width * 4` bytes of each row are read.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    /// Width in pixels, must be positive.
    pub width: i32,
    /// Height in pixels, must be positive.
    pub height: i32,
    /// Distance between rows in bytes, at least `width * 4`.
    pub stride: i32,
    /// The pixel data; at least [`PixelBuffer::required_len`] bytes.
    pub scan0: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Describes `scan0` as a `width` x `height` image with rows `stride` bytes apart.
    pub const fn new(width: i32, height: i32, stride: i32, scan0: &'a [u8]) -> Self {
        Self {
            width,
            height,
            stride,
            scan0,
        }
    }

    /// Bytes needed to hold an image of this geometry: `stride * (height - 1) + width * 4`.
    ///
    /// Returns [`None`] when the geometry is invalid or the size overflows.
    pub fn required_len(width: i32, height: i32, stride: i32) -> Option<usize> {
        if width <= 0 || height <= 0 || (stride as i64) < width as i64 * 4 {
            return None;
        }
        (stride as usize)
            .checked_mul(height as usize - 1)?
            .checked_add(width as usize * 4)
    }
}

/// The filter used to produce each mip level from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum MipmapFilter {
    /// Point sampling.
    Nearest,
    /// Linear interpolation.
    Bilinear,
    /// Cubic interpolation.
    #[default]
    Bicubic,
    /// High quality windowed sinc.
    Fant,
}

/// Everything about a save except the pixels.
///
/// The defaults are BC1, perceptual error metric, normal speed, no mipmaps, bicubic
/// filtering, linear light resampling and no dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// The format to store every level in.
    pub format: DdsFileFormat,
    /// Distance function for endpoint search. Ignored for uncompressed formats.
    pub error_metric: ErrorMetric,
    /// Endpoint search effort. Ignored for uncompressed formats.
    pub compression_speed: CompressionSpeed,
    /// Whether to write a full mip chain, or just the base level.
    pub generate_mipmaps: bool,
    /// How each mip level is resampled from the previous one.
    pub mipmap_filter: MipmapFilter,
    /// Resample mip levels in linear light rather than directly on sRGB values.
    pub linear_light_mipmaps: bool,
    /// Floyd-Steinberg dithering when quantizing to the 16-bit uncompressed layouts.
    /// Other formats are unaffected.
    pub error_diffusion_dithering: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::new(DdsFileFormat::Bc1)
    }
}

impl SaveOptions {
    /// Creates options for saving in `format`, with everything else at its default.
    pub const fn new(format: DdsFileFormat) -> Self {
        Self {
            format,
            error_metric: ErrorMetric::Perceptual,
            compression_speed: CompressionSpeed::Normal,
            generate_mipmaps: false,
            mipmap_filter: MipmapFilter::Bicubic,
            linear_light_mipmaps: true,
            error_diffusion_dithering: false,
        }
    }

    /// Set the output format.
    pub fn format(mut self, format: DdsFileFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the error metric used by block compression.
    pub fn error_metric(mut self, error_metric: ErrorMetric) -> Self {
        self.error_metric = error_metric;
        self
    }

    /// Set the block compression effort.
    pub fn compression_speed(mut self, speed: CompressionSpeed) -> Self {
        self.compression_speed = speed;
        self
    }

    /// Set whether to generate a full mip chain.
    pub fn generate_mipmaps(mut self, generate: bool) -> Self {
        self.generate_mipmaps = generate;
        self
    }

    /// Set the mip level resampling filter.
    pub fn mipmap_filter(mut self, filter: MipmapFilter) -> Self {
        self.mipmap_filter = filter;
        self
    }

    /// Set whether mip levels are resampled in linear light.
    pub fn linear_light_mipmaps(mut self, linear_light: bool) -> Self {
        self.linear_light_mipmaps = linear_light;
        self
    }

    /// Set whether uncompressed levels are written with error diffusion dithering.
    pub fn error_diffusion_dithering(mut self, dithering: bool) -> Self {
        self.error_diffusion_dithering = dithering;
        self
    }
}

/// A request to save `pixels` with `options`.
#[derive(Debug, Clone, Copy)]
pub struct SaveRequest<'a> {
    /// The image to save; borrowed for the duration of the save.
    pub pixels: PixelBuffer<'a>,
    /// Format and compression settings.
    pub options: SaveOptions,
}

impl<'a> SaveRequest<'a> {
    /// Creates a new [`SaveRequest`].
    pub const fn new(pixels: PixelBuffer<'a>, options: SaveOptions) -> Self {
        Self { pixels, options }
    }
}
