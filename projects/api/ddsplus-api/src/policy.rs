//! Turns a [`SaveRequest`] into a [`CompressionPlan`].
//!
//! Validation happens in a fixed order, so that a request with several problems always
//! reports the same one:
//!
//! 1. Dimensions ([`PolicyError::InvalidDimensions`])
//! 2. Format ([`PolicyError::UnsupportedFormat`], raw codes only)
//! 3. Stride ([`PolicyError::StrideTooSmall`])
//! 4. Buffer length ([`PolicyError::BufferTooSmall`])

use crate::error::PolicyError;
use crate::request::{MipmapFilter, PixelBuffer, SaveRequest};
use ddsplus_bcn::{BcFormat, BlockSettings};
use ddsplus_common::pixel_layout::PixelLayout;
use ddsplus_dds::{DdsFileFormat, DdsHeader, SurfaceEncoding, max_mip_count};

/// How every level of a save is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    /// 4x4 blocks through the block compressor.
    Block {
        /// The block format.
        format: BcFormat,
        /// Error metric and speed handed to the compressor.
        settings: BlockSettings,
    },
    /// Pixel by pixel transcoding.
    Pixels {
        /// The target layout.
        layout: PixelLayout,
        /// Whether quantization error is diffused to neighbouring pixels.
        dithering: bool,
    },
}

/// The resolved parameters of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPlan {
    /// The header that will be written.
    pub header: DdsHeader,
    /// How each level is encoded.
    pub encoding: LevelEncoding,
    /// Filter for producing each level from the previous one.
    pub filter: MipmapFilter,
    /// Whether mip levels are resampled in linear light.
    pub linear_light: bool,
    /// Whether the requested error metric influences the output.
    ///
    /// Only colour endpoint searches (BC1, BC2, BC3, BC6H, BC7) weight channels; BC4, BC5
    /// and uncompressed formats ignore it.
    pub metric_affects_search: bool,
    /// Total size of the output, header included.
    pub output_size: u64,
}

impl CompressionPlan {
    /// Number of levels that will be written.
    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.header.mip_count
    }

    /// The storage format of every level.
    #[inline]
    pub fn format(&self) -> DdsFileFormat {
        self.header.format
    }
}

/// Validates `request` and derives its [`CompressionPlan`]. Has no side effects.
pub fn resolve(request: &SaveRequest) -> Result<CompressionPlan, PolicyError> {
    let pixels = &request.pixels;
    let options = &request.options;
    validate_dimensions(pixels)?;
    validate_geometry(pixels)?;

    let width = pixels.width as u32;
    let height = pixels.height as u32;
    let mip_count = if options.generate_mipmaps {
        max_mip_count(width, height)
    } else {
        1
    };
    let header = DdsHeader::new(options.format, width, height, mip_count);
    let output_size = header
        .data_size()
        .and_then(|size| size.checked_add(header.size()))
        .ok_or(PolicyError::InvalidDimensions {
            width: pixels.width,
            height: pixels.height,
        })? as u64;

    let (encoding, metric_affects_search) = match options.format.encoding() {
        SurfaceEncoding::Block(format) => (
            LevelEncoding::Block {
                format,
                settings: BlockSettings::new(options.error_metric, options.compression_speed),
            },
            format.uses_color_endpoints(),
        ),
        SurfaceEncoding::Pixels(layout) => (
            LevelEncoding::Pixels {
                layout,
                dithering: options.error_diffusion_dithering,
            },
            false,
        ),
    };

    Ok(CompressionPlan {
        header,
        encoding,
        filter: options.mipmap_filter,
        linear_light: options.linear_light_mipmaps,
        metric_affects_search,
        output_size,
    })
}

/// Maps a raw format code (as used by the C API) to a [`DdsFileFormat`].
///
/// Invalid dimensions take precedence over an invalid code.
pub fn resolve_format_code(pixels: &PixelBuffer, code: u32) -> Result<DdsFileFormat, PolicyError> {
    validate_dimensions(pixels)?;
    DdsFileFormat::try_from(code).map_err(|e| PolicyError::UnsupportedFormat(e.0))
}

fn validate_dimensions(pixels: &PixelBuffer) -> Result<(), PolicyError> {
    if pixels.width <= 0 || pixels.height <= 0 {
        return Err(PolicyError::InvalidDimensions {
            width: pixels.width,
            height: pixels.height,
        });
    }
    Ok(())
}

fn validate_geometry(pixels: &PixelBuffer) -> Result<(), PolicyError> {
    let minimum = pixels.width as u64 * 4;
    if (pixels.stride as i64) < minimum as i64 {
        return Err(PolicyError::StrideTooSmall {
            stride: pixels.stride,
            minimum,
        });
    }

    let required = PixelBuffer::required_len(pixels.width, pixels.height, pixels.stride)
        .unwrap_or(usize::MAX);
    if pixels.scan0.len() < required {
        return Err(PolicyError::BufferTooSmall {
            required,
            actual: pixels.scan0.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SaveOptions;
    use crate::test_prelude::*;
    use ddsplus_bcn::{CompressionSpeed, ErrorMetric};

    fn request(pixels: PixelBuffer, options: SaveOptions) -> SaveRequest {
        SaveRequest::new(pixels, options)
    }

    #[test]
    fn block_formats_resolve_to_block_encoding() {
        let data = vec![0u8; 16 * 16 * 4];
        let options = SaveOptions::new(DdsFileFormat::Bc3Srgb)
            .error_metric(ErrorMetric::Uniform)
            .compression_speed(CompressionSpeed::Slow);
        let plan = resolve(&request(PixelBuffer::new(16, 16, 64, &data), options)).unwrap();

        assert_eq!(
            plan.encoding,
            LevelEncoding::Block {
                format: BcFormat::Bc3,
                settings: BlockSettings::new(ErrorMetric::Uniform, CompressionSpeed::Slow),
            }
        );
        assert_eq!(plan.mip_count(), 1);
        assert!(plan.metric_affects_search);
        // DX10 header + 16 blocks of 16 bytes.
        assert_eq!(plan.output_size, 148 + 256);
    }

    #[rstest]
    #[case::bc4(DdsFileFormat::Bc4, false)]
    #[case::bc5(DdsFileFormat::Bc5, false)]
    #[case::bc6h(DdsFileFormat::Bc6h, true)]
    #[case::bc7(DdsFileFormat::Bc7, true)]
    #[case::bgra(DdsFileFormat::B8G8R8A8, false)]
    #[case::rgb565(DdsFileFormat::B5G6R5, false)]
    fn metric_only_affects_colour_endpoint_formats(
        #[case] format: DdsFileFormat,
        #[case] expected: bool,
    ) {
        let data = vec![0u8; 4 * 4 * 4];
        let plan = resolve(&request(PixelBuffer::new(4, 4, 16, &data), SaveOptions::new(format)))
            .unwrap();
        assert_eq!(plan.metric_affects_search, expected);
    }

    #[rstest]
    #[case(256, 256, 9)]
    #[case(256, 16, 9)]
    #[case(5, 3, 3)]
    #[case(1, 1, 1)]
    fn mip_count_follows_the_largest_dimension(
        #[case] width: i32,
        #[case] height: i32,
        #[case] expected: u32,
    ) {
        let data = vec![0u8; (width * height * 4) as usize];
        let options = SaveOptions::new(DdsFileFormat::R8G8B8A8).generate_mipmaps(true);
        let plan = resolve(&request(PixelBuffer::new(width, height, width * 4, &data), options))
            .unwrap();
        assert_eq!(plan.mip_count(), expected);
    }

    #[test]
    fn uncompressed_formats_ignore_metric_and_speed() {
        let data = vec![0u8; 2 * 2 * 4];
        let options = SaveOptions::new(DdsFileFormat::B4G4R4A4)
            .error_metric(ErrorMetric::Uniform)
            .compression_speed(CompressionSpeed::Fast);
        let plan = resolve(&request(PixelBuffer::new(2, 2, 8, &data), options)).unwrap();
        assert_eq!(
            plan.encoding,
            LevelEncoding::Pixels {
                layout: PixelLayout::B4G4R4A4,
                dithering: false,
            }
        );
    }

    #[test]
    fn dithering_reaches_uncompressed_plans_only() {
        let data = vec![0u8; 4 * 4 * 4];
        let pixels = PixelBuffer::new(4, 4, 16, &data);
        let dithered = |format| SaveOptions::new(format).error_diffusion_dithering(true);

        let plan = resolve(&request(pixels, dithered(DdsFileFormat::B5G6R5))).unwrap();
        assert_eq!(
            plan.encoding,
            LevelEncoding::Pixels {
                layout: PixelLayout::B5G6R5,
                dithering: true,
            }
        );

        let plan = resolve(&request(pixels, dithered(DdsFileFormat::Bc1))).unwrap();
        assert!(matches!(plan.encoding, LevelEncoding::Block { .. }));
    }

    #[rstest]
    #[case::zero_width(0, 4, 16, 64, PolicyError::InvalidDimensions { width: 0, height: 4 })]
    #[case::negative_height(4, -2, 16, 64, PolicyError::InvalidDimensions { width: 4, height: -2 })]
    #[case::stride(4, 4, 12, 64, PolicyError::StrideTooSmall { stride: 12, minimum: 16 })]
    #[case::buffer(4, 4, 20, 64, PolicyError::BufferTooSmall { required: 76, actual: 64 })]
    fn invalid_requests_are_rejected(
        #[case] width: i32,
        #[case] height: i32,
        #[case] stride: i32,
        #[case] len: usize,
        #[case] expected: PolicyError,
    ) {
        let data = vec![0u8; len];
        let result = resolve(&request(
            PixelBuffer::new(width, height, stride, &data),
            SaveOptions::default(),
        ));
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn dimensions_are_checked_before_format_codes() {
        let pixels = PixelBuffer::new(0, 4, 0, &[]);
        assert!(matches!(
            resolve_format_code(&pixels, 99),
            Err(PolicyError::InvalidDimensions { .. })
        ));

        let pixels = PixelBuffer::new(4, 4, 0, &[]);
        assert_eq!(
            resolve_format_code(&pixels, 99),
            Err(PolicyError::UnsupportedFormat(99))
        );
        assert_eq!(resolve_format_code(&pixels, 9), Ok(DdsFileFormat::Bc7));
    }
}
