//! # DDS Header
//!
//! ```text
//! Offset  Size  Field
//! 0x00    4     Magic, 'DDS '
//! 0x04    124   DDS_HEADER
//!   0x08          flags, height, width, pitchOrLinearSize, depth, mipMapCount
//!   0x4C          DDS_PIXELFORMAT (size, flags, fourCC, bit count, R/G/B/A masks)
//!   0x6C          caps, caps2, caps3, caps4
//! 0x80    20    DDS_HEADER_DXT10, only when fourCC is 'DX10'
//!                 dxgiFormat, resourceDimension, miscFlag, arraySize, miscFlags2
//! ```
//!
//! [`DdsHeader`] writes a header for one of the [`DdsFileFormat`]s; [`parse_header`] reads
//! one back, rejecting anything that is not a single 2D surface in a supported format.

use crate::constants::*;
use crate::format::{DdsFileFormat, HeaderStyle, PixelMasks, SurfaceEncoding};
use crate::level::{level_size, max_mip_count, row_pitch};
use crate::likely_dds::likely_dds;
use endian_writer::{EndianReader, EndianWriter, LittleEndianReader, LittleEndianWriter};
use likely_stable::unlikely;
use thiserror::Error;

/// Errors found while parsing a DDS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The data ends before the header (or the surface data it declares) does.
    #[error("Truncated file: {required} bytes required, {available} available")]
    Truncated {
        /// Bytes needed.
        required: usize,
        /// Bytes available.
        available: usize,
    },

    /// The file does not start with `DDS `.
    #[error("Invalid DDS magic")]
    InvalidMagic,

    /// `DDS_HEADER.dwSize` is not 124.
    #[error("Invalid header size: {0}")]
    InvalidHeaderSize(u32),

    /// `DDS_PIXELFORMAT.dwSize` is not 32.
    #[error("Invalid pixel format size: {0}")]
    InvalidPixelFormatSize(u32),

    /// Width or height is zero.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },

    /// The mip count exceeds the length of a full mip chain.
    #[error("Invalid mip count {mip_count} for a {width}x{height} surface")]
    InvalidMipCount {
        /// Declared mip count
        mip_count: u32,
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },

    /// The surface data is too large to address.
    #[error("Surface data size overflows")]
    SizeOverflow,

    /// The pixel format is not one of the supported formats.
    #[error("Unsupported pixel format (fourCC {fourcc:#010X}, DXGI format {dxgi_format})")]
    UnsupportedFormat {
        /// FourCC field of the legacy pixel format, 0 if none.
        fourcc: u32,
        /// DXGI format of the DX10 header, 0 if none.
        dxgi_format: u32,
    },

    /// The file is a texture array, cube map or volume texture.
    #[error("Unsupported surface layout (arrays, cube maps and volume textures are not supported)")]
    UnsupportedLayout,
}

impl HeaderError {
    /// Whether the header is well formed but describes something this crate does not read.
    ///
    /// All other errors indicate a malformed (or truncated) file.
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            HeaderError::UnsupportedFormat { .. } | HeaderError::UnsupportedLayout
        )
    }
}

/// The header of a single 2D surface with its mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdsHeader {
    /// Storage format of every level.
    pub format: DdsFileFormat,
    /// Width of the first level, in pixels.
    pub width: u32,
    /// Height of the first level, in pixels.
    pub height: u32,
    /// Number of levels in the file, at least 1.
    pub mip_count: u32,
}

/// A serialized header, up to [`DDS_DX10_TOTAL_HEADER_SIZE`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedHeader {
    bytes: [u8; DDS_DX10_TOTAL_HEADER_SIZE],
    len: usize,
}

impl EncodedHeader {
    /// The header bytes, magic included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// A header read back from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedHeader {
    /// Dimensions, format and mip count.
    pub header: DdsHeader,
    /// Offset of the first level's data from the start of the file.
    pub data_offset: usize,
    /// Whether the colour channels are premultiplied by alpha (`DXT2`, `DXT4`, or the DX10
    /// premultiplied alpha mode).
    pub premultiplied: bool,
}

impl DdsHeader {
    /// Creates a header for `mip_count` levels of a `width` x `height` surface.
    #[inline]
    pub const fn new(format: DdsFileFormat, width: u32, height: u32, mip_count: u32) -> Self {
        Self {
            format,
            width,
            height,
            mip_count,
        }
    }

    /// Size of the serialized header, magic included.
    #[inline]
    pub const fn size(&self) -> usize {
        match self.format.header_style() {
            HeaderStyle::Dx10 => DDS_DX10_TOTAL_HEADER_SIZE,
            _ => DDS_HEADER_SIZE,
        }
    }

    /// Serializes the header.
    pub fn encode(&self) -> EncodedHeader {
        let mut bytes = [0u8; DDS_DX10_TOTAL_HEADER_SIZE];
        let len = self.size();
        let is_block = matches!(self.format.encoding(), SurfaceEncoding::Block(_));

        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
        let pitch_or_linear_size = if is_block {
            flags |= DDSD_LINEARSIZE;
            level_size(self.format, self.width, self.height)
        } else {
            flags |= DDSD_PITCH;
            row_pitch(self.format, self.width)
        };
        // Informational only; readers recompute sizes from the dimensions.
        let pitch_or_linear_size = pitch_or_linear_size
            .and_then(|size| u32::try_from(size).ok())
            .unwrap_or(0);

        let mut caps = DDSCAPS_TEXTURE;
        if self.mip_count > 1 {
            flags |= DDSD_MIPMAPCOUNT;
            caps |= DDSCAPS_COMPLEX | DDSCAPS_MIPMAP;
        }

        // SAFETY: `bytes` is DDS_DX10_TOTAL_HEADER_SIZE (148) bytes long and every offset
        // written below is at most 0x90 + 4.
        let mut writer = unsafe { LittleEndianWriter::new(bytes.as_mut_ptr()) };
        unsafe {
            writer.write_u32_at(DDS_MAGIC, 0);
            writer.write_u32_at(DDS_HEADER_STRUCT_SIZE, DDS_SIZE_OFFSET as isize);
            writer.write_u32_at(flags, DDS_FLAGS_OFFSET as isize);
            writer.write_u32_at(self.height, DDS_HEIGHT_OFFSET as isize);
            writer.write_u32_at(self.width, DDS_WIDTH_OFFSET as isize);
            writer.write_u32_at(pitch_or_linear_size, DDS_PITCH_OR_LINEAR_SIZE_OFFSET as isize);
            writer.write_u32_at(self.mip_count, DDS_MIPMAP_COUNT_OFFSET as isize);
            writer.write_u32_at(DDS_PIXELFORMAT_STRUCT_SIZE, DDS_PIXELFORMAT_OFFSET as isize);
            writer.write_u32_at(caps, DDS_CAPS_OFFSET as isize);
        }

        match self.format.header_style() {
            HeaderStyle::FourCc(fourcc) => unsafe {
                writer.write_u32_at(DDPF_FOURCC, DDS_PIXELFORMAT_FLAGS_OFFSET as isize);
                writer.write_u32_at(fourcc, FOURCC_OFFSET as isize);
            },
            HeaderStyle::Masks(masks) => unsafe {
                writer.write_u32_at(masks.flags, DDS_PIXELFORMAT_FLAGS_OFFSET as isize);
                writer.write_u32_at(masks.bit_count, DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET as isize);
                writer.write_u32_at(masks.red, DDS_PIXELFORMAT_RBITMASK_OFFSET as isize);
                writer.write_u32_at(masks.green, DDS_PIXELFORMAT_GBITMASK_OFFSET as isize);
                writer.write_u32_at(masks.blue, DDS_PIXELFORMAT_BBITMASK_OFFSET as isize);
                writer.write_u32_at(masks.alpha, DDS_PIXELFORMAT_ABITMASK_OFFSET as isize);
            },
            HeaderStyle::Dx10 => {
                let alpha_mode = if self.format.has_alpha() {
                    DDS_ALPHA_MODE_STRAIGHT
                } else {
                    DDS_ALPHA_MODE_OPAQUE
                };
                unsafe {
                    writer.write_u32_at(DDPF_FOURCC, DDS_PIXELFORMAT_FLAGS_OFFSET as isize);
                    writer.write_u32_at(FOURCC_DX10, FOURCC_OFFSET as isize);
                    writer.write_u32_at(self.format.dxgi_format(), DX10_FORMAT_OFFSET as isize);
                    writer.write_u32_at(
                        D3D10_RESOURCE_DIMENSION_TEXTURE2D,
                        DX10_RESOURCE_DIMENSION_OFFSET as isize,
                    );
                    writer.write_u32_at(0, DX10_MISC_FLAG_OFFSET as isize);
                    writer.write_u32_at(1, DX10_ARRAY_SIZE_OFFSET as isize);
                    writer.write_u32_at(alpha_mode, DX10_MISC_FLAGS2_OFFSET as isize);
                }
            }
        }

        EncodedHeader { bytes, len }
    }

    /// Total size of the surface data following the header.
    #[inline]
    pub fn data_size(&self) -> Option<usize> {
        crate::level::surface_size(self.format, self.width, self.height, self.mip_count)
    }
}

/// Returns the size of the header at the start of `data`, i.e. whether a DX10 extension
/// follows the regular header.
///
/// Only the first [`DDS_HEADER_SIZE`] bytes are needed.
pub fn header_size(data: &[u8]) -> Result<usize, HeaderError> {
    if unlikely(data.len() < DDS_HEADER_SIZE) {
        return Err(HeaderError::Truncated {
            required: DDS_HEADER_SIZE,
            available: data.len(),
        });
    }
    if !likely_dds(data) {
        return Err(HeaderError::InvalidMagic);
    }

    // SAFETY: We checked data.len() >= DDS_HEADER_SIZE (128), so FOURCC_OFFSET (0x54) + 4 is safe
    let mut reader = unsafe { LittleEndianReader::new(data.as_ptr()) };
    let fourcc = unsafe { reader.read_u32_at(FOURCC_OFFSET as isize) };
    let flags = unsafe { reader.read_u32_at(DDS_PIXELFORMAT_FLAGS_OFFSET as isize) };
    Ok(if flags & DDPF_FOURCC != 0 && fourcc == FOURCC_DX10 {
        DDS_DX10_TOTAL_HEADER_SIZE
    } else {
        DDS_HEADER_SIZE
    })
}

/// Parses the header at the start of `data`.
///
/// `data` must contain at least [`header_size`] bytes; surface data is not required.
pub fn parse_header(data: &[u8]) -> Result<ParsedHeader, HeaderError> {
    let data_offset = header_size(data)?;
    if unlikely(data.len() < data_offset) {
        return Err(HeaderError::Truncated {
            required: data_offset,
            available: data.len(),
        });
    }

    // SAFETY: header_size checked data.len() >= DDS_HEADER_SIZE (128), and every offset read
    // below is at most 0x70 + 4.
    let mut reader = unsafe { LittleEndianReader::new(data.as_ptr()) };
    let (size, flags, height, width, depth, raw_mip_count, pf_size, pf_flags, fourcc, caps2) =
        unsafe {
            (
                reader.read_u32_at(DDS_SIZE_OFFSET as isize),
                reader.read_u32_at(DDS_FLAGS_OFFSET as isize),
                reader.read_u32_at(DDS_HEIGHT_OFFSET as isize),
                reader.read_u32_at(DDS_WIDTH_OFFSET as isize),
                reader.read_u32_at(DDS_DEPTH_OFFSET as isize),
                reader.read_u32_at(DDS_MIPMAP_COUNT_OFFSET as isize),
                reader.read_u32_at(DDS_PIXELFORMAT_OFFSET as isize),
                reader.read_u32_at(DDS_PIXELFORMAT_FLAGS_OFFSET as isize),
                reader.read_u32_at(FOURCC_OFFSET as isize),
                reader.read_u32_at(DDS_CAPS2_OFFSET as isize),
            )
        };

    if size != DDS_HEADER_STRUCT_SIZE {
        return Err(HeaderError::InvalidHeaderSize(size));
    }
    if pf_size != DDS_PIXELFORMAT_STRUCT_SIZE {
        return Err(HeaderError::InvalidPixelFormatSize(pf_size));
    }
    if width == 0 || height == 0 {
        return Err(HeaderError::InvalidDimensions { width, height });
    }
    if caps2 & (DDSCAPS2_CUBEMAP | DDSCAPS2_VOLUME) != 0 || (flags & DDSD_DEPTH != 0 && depth > 1)
    {
        return Err(HeaderError::UnsupportedLayout);
    }

    let mut premultiplied = false;
    let format = if data_offset == DDS_DX10_TOTAL_HEADER_SIZE {
        // SAFETY: data.len() >= data_offset (148), so every DX10 field (up to 0x90 + 4) is in
        // bounds.
        let (dxgi_format, dimension, misc_flag, array_size, misc_flags2) = unsafe {
            (
                reader.read_u32_at(DX10_FORMAT_OFFSET as isize),
                reader.read_u32_at(DX10_RESOURCE_DIMENSION_OFFSET as isize),
                reader.read_u32_at(DX10_MISC_FLAG_OFFSET as isize),
                reader.read_u32_at(DX10_ARRAY_SIZE_OFFSET as isize),
                reader.read_u32_at(DX10_MISC_FLAGS2_OFFSET as isize),
            )
        };
        if array_size > 1
            || dimension == D3D10_RESOURCE_DIMENSION_TEXTURE3D
            || misc_flag & DDS_RESOURCE_MISC_TEXTURECUBE != 0
        {
            return Err(HeaderError::UnsupportedLayout);
        }
        premultiplied = misc_flags2 & DDS_ALPHA_MODE_MASK == DDS_ALPHA_MODE_PREMULTIPLIED;
        DdsFileFormat::from_dxgi_format(dxgi_format).ok_or(HeaderError::UnsupportedFormat {
            fourcc,
            dxgi_format,
        })?
    } else if pf_flags & DDPF_FOURCC != 0 {
        let (format, is_premultiplied) = match fourcc {
            FOURCC_DXT1 => (DdsFileFormat::Bc1, false),
            FOURCC_DXT2 => (DdsFileFormat::Bc2, true),
            FOURCC_DXT3 => (DdsFileFormat::Bc2, false),
            FOURCC_DXT4 => (DdsFileFormat::Bc3, true),
            FOURCC_DXT5 => (DdsFileFormat::Bc3, false),
            FOURCC_ATI1 | FOURCC_BC4U => (DdsFileFormat::Bc4, false),
            FOURCC_ATI2 | FOURCC_BC5U => (DdsFileFormat::Bc5, false),
            _ => {
                return Err(HeaderError::UnsupportedFormat {
                    fourcc,
                    dxgi_format: 0,
                })
            }
        };
        premultiplied = is_premultiplied;
        format
    } else if pf_flags & DDPF_RGB != 0 {
        // SAFETY: the masks end at 0x6C, within the 128 bytes checked above.
        let masks = unsafe {
            PixelMasks {
                flags: pf_flags,
                bit_count: reader.read_u32_at(DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET as isize),
                red: reader.read_u32_at(DDS_PIXELFORMAT_RBITMASK_OFFSET as isize),
                green: reader.read_u32_at(DDS_PIXELFORMAT_GBITMASK_OFFSET as isize),
                blue: reader.read_u32_at(DDS_PIXELFORMAT_BBITMASK_OFFSET as isize),
                alpha: if pf_flags & DDPF_ALPHAPIXELS != 0 {
                    reader.read_u32_at(DDS_PIXELFORMAT_ABITMASK_OFFSET as isize)
                } else {
                    0
                },
            }
        };
        DdsFileFormat::from_masks(&masks).ok_or(HeaderError::UnsupportedFormat {
            fourcc: 0,
            dxgi_format: 0,
        })?
    } else {
        // Luminance, YUV, alpha-only etc.
        return Err(HeaderError::UnsupportedFormat {
            fourcc,
            dxgi_format: 0,
        });
    };

    let mip_count = if flags & DDSD_MIPMAPCOUNT != 0 {
        raw_mip_count.max(1)
    } else {
        1
    };
    if mip_count > max_mip_count(width, height) {
        return Err(HeaderError::InvalidMipCount {
            mip_count,
            width,
            height,
        });
    }

    let header = DdsHeader::new(format, width, height, mip_count);
    if header.data_size().is_none() {
        return Err(HeaderError::SizeOverflow);
    }

    Ok(ParsedHeader {
        header,
        data_offset,
        premultiplied,
    })
}
