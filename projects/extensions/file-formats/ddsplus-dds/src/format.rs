use crate::constants::*;
use ddsplus_bcn::BcFormat;
use ddsplus_common::pixel_layout::PixelLayout;
use derive_enum_all_values::AllValues;
use thiserror::Error;

/// A format a DDS file can be saved in.
///
/// The discriminants are the raw format codes used by the C API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u32)]
pub enum DdsFileFormat {
    /// a.k.a. DXT1
    Bc1 = 0,
    /// BC1 in the sRGB colour space (DX10 header)
    Bc1Srgb = 1,
    /// a.k.a. DXT3
    Bc2 = 2,
    /// BC2 in the sRGB colour space (DX10 header)
    Bc2Srgb = 3,
    /// a.k.a. DXT5
    Bc3 = 4,
    /// BC3 in the sRGB colour space (DX10 header)
    Bc3Srgb = 5,
    /// Single channel, a.k.a. ATI1
    Bc4 = 6,
    /// Two channel, a.k.a. ATI2
    Bc5 = 7,
    /// Unsigned half float RGB (DX10 header)
    Bc6h = 8,
    /// (DX10 header)
    Bc7 = 9,
    /// BC7 in the sRGB colour space (DX10 header)
    Bc7Srgb = 10,
    /// 32-bit BGRA
    B8G8R8A8 = 11,
    /// 32-bit BGR with an unused byte
    B8G8R8X8 = 12,
    /// 32-bit RGBA
    R8G8B8A8 = 13,
    /// 16-bit, 5 bits per colour channel and 1 bit alpha
    B5G5R5A1 = 14,
    /// 16-bit, 4 bits per channel
    B4G4R4A4 = 15,
    /// 16-bit, 5/6/5 bits colour, no alpha
    B5G6R5 = 16,
}

/// A raw format code outside the known [`DdsFileFormat`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown DDS file format code: {0}")]
pub struct InvalidFormatCode(pub u32);

/// How the pixels of a surface are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEncoding {
    /// 4x4 blocks of a BCn format.
    Block(BcFormat),
    /// One pixel at a time, in an uncompressed layout.
    Pixels(PixelLayout),
}

/// The `DDS_PIXELFORMAT` bit masks describing an uncompressed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelMasks {
    /// `DDPF_*` flags; always contains `DDPF_RGB`.
    pub flags: u32,
    /// Bits per pixel.
    pub bit_count: u32,
    /// Red channel mask
    pub red: u32,
    /// Green channel mask
    pub green: u32,
    /// Blue channel mask
    pub blue: u32,
    /// Alpha channel mask, zero when the layout has no alpha.
    pub alpha: u32,
}

/// How a format is identified in the DDS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// A FourCC code in the legacy pixel format.
    FourCc(u32),
    /// Bit masks in the legacy pixel format.
    Masks(PixelMasks),
    /// `DX10` FourCC followed by the extended header carrying the DXGI format.
    Dx10,
}

impl DdsFileFormat {
    /// How the surface data of this format is stored.
    #[inline]
    pub const fn encoding(self) -> SurfaceEncoding {
        use SurfaceEncoding::*;
        match self {
            DdsFileFormat::Bc1 | DdsFileFormat::Bc1Srgb => Block(BcFormat::Bc1),
            DdsFileFormat::Bc2 | DdsFileFormat::Bc2Srgb => Block(BcFormat::Bc2),
            DdsFileFormat::Bc3 | DdsFileFormat::Bc3Srgb => Block(BcFormat::Bc3),
            DdsFileFormat::Bc4 => Block(BcFormat::Bc4),
            DdsFileFormat::Bc5 => Block(BcFormat::Bc5),
            DdsFileFormat::Bc6h => Block(BcFormat::Bc6h),
            DdsFileFormat::Bc7 | DdsFileFormat::Bc7Srgb => Block(BcFormat::Bc7),
            DdsFileFormat::B8G8R8A8 => Pixels(PixelLayout::B8G8R8A8),
            DdsFileFormat::B8G8R8X8 => Pixels(PixelLayout::B8G8R8X8),
            DdsFileFormat::R8G8B8A8 => Pixels(PixelLayout::R8G8B8A8),
            DdsFileFormat::B5G5R5A1 => Pixels(PixelLayout::B5G5R5A1),
            DdsFileFormat::B4G4R4A4 => Pixels(PixelLayout::B4G4R4A4),
            DdsFileFormat::B5G6R5 => Pixels(PixelLayout::B5G6R5),
        }
    }

    /// The block format, if this is a block compressed format.
    #[inline]
    pub const fn block_format(self) -> Option<BcFormat> {
        match self.encoding() {
            SurfaceEncoding::Block(format) => Some(format),
            SurfaceEncoding::Pixels(_) => None,
        }
    }

    /// The pixel layout, if this is an uncompressed format.
    #[inline]
    pub const fn pixel_layout(self) -> Option<PixelLayout> {
        match self.encoding() {
            SurfaceEncoding::Block(_) => None,
            SurfaceEncoding::Pixels(layout) => Some(layout),
        }
    }

    /// Whether the colour data is stored in the sRGB colour space.
    #[inline]
    pub const fn is_srgb(self) -> bool {
        matches!(
            self,
            DdsFileFormat::Bc1Srgb
                | DdsFileFormat::Bc2Srgb
                | DdsFileFormat::Bc3Srgb
                | DdsFileFormat::Bc7Srgb
        )
    }

    /// Whether decoded surfaces can contain alpha other than 255.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        match self.encoding() {
            SurfaceEncoding::Block(format) => {
                !matches!(format, BcFormat::Bc4 | BcFormat::Bc5 | BcFormat::Bc6h)
            }
            SurfaceEncoding::Pixels(layout) => layout.has_alpha(),
        }
    }

    /// The `DXGI_FORMAT` equivalent of this format.
    pub const fn dxgi_format(self) -> u32 {
        match self {
            DdsFileFormat::Bc1 => DXGI_FORMAT_BC1_UNORM,
            DdsFileFormat::Bc1Srgb => DXGI_FORMAT_BC1_UNORM_SRGB,
            DdsFileFormat::Bc2 => DXGI_FORMAT_BC2_UNORM,
            DdsFileFormat::Bc2Srgb => DXGI_FORMAT_BC2_UNORM_SRGB,
            DdsFileFormat::Bc3 => DXGI_FORMAT_BC3_UNORM,
            DdsFileFormat::Bc3Srgb => DXGI_FORMAT_BC3_UNORM_SRGB,
            DdsFileFormat::Bc4 => DXGI_FORMAT_BC4_UNORM,
            DdsFileFormat::Bc5 => DXGI_FORMAT_BC5_UNORM,
            DdsFileFormat::Bc6h => DXGI_FORMAT_BC6H_UF16,
            DdsFileFormat::Bc7 => DXGI_FORMAT_BC7_UNORM,
            DdsFileFormat::Bc7Srgb => DXGI_FORMAT_BC7_UNORM_SRGB,
            DdsFileFormat::B8G8R8A8 => DXGI_FORMAT_B8G8R8A8_UNORM,
            DdsFileFormat::B8G8R8X8 => DXGI_FORMAT_B8G8R8X8_UNORM,
            DdsFileFormat::R8G8B8A8 => DXGI_FORMAT_R8G8B8A8_UNORM,
            DdsFileFormat::B5G5R5A1 => DXGI_FORMAT_B5G5R5A1_UNORM,
            DdsFileFormat::B4G4R4A4 => DXGI_FORMAT_B4G4R4A4_UNORM,
            DdsFileFormat::B5G6R5 => DXGI_FORMAT_B5G6R5_UNORM,
        }
    }

    /// Maps a `DXGI_FORMAT` found in a DX10 header to the format used to read it.
    ///
    /// Typeless and sRGB codes map to the format sharing their storage; signed formats
    /// (`BC4_SNORM`, `BC5_SNORM`, `BC6H_SF16`) are not supported.
    pub const fn from_dxgi_format(dxgi_format: u32) -> Option<Self> {
        Some(match dxgi_format {
            DXGI_FORMAT_BC1_TYPELESS | DXGI_FORMAT_BC1_UNORM => DdsFileFormat::Bc1,
            DXGI_FORMAT_BC1_UNORM_SRGB => DdsFileFormat::Bc1Srgb,
            DXGI_FORMAT_BC2_TYPELESS | DXGI_FORMAT_BC2_UNORM => DdsFileFormat::Bc2,
            DXGI_FORMAT_BC2_UNORM_SRGB => DdsFileFormat::Bc2Srgb,
            DXGI_FORMAT_BC3_TYPELESS | DXGI_FORMAT_BC3_UNORM => DdsFileFormat::Bc3,
            DXGI_FORMAT_BC3_UNORM_SRGB => DdsFileFormat::Bc3Srgb,
            DXGI_FORMAT_BC4_TYPELESS | DXGI_FORMAT_BC4_UNORM => DdsFileFormat::Bc4,
            DXGI_FORMAT_BC5_TYPELESS | DXGI_FORMAT_BC5_UNORM => DdsFileFormat::Bc5,
            DXGI_FORMAT_BC6H_TYPELESS | DXGI_FORMAT_BC6H_UF16 => DdsFileFormat::Bc6h,
            DXGI_FORMAT_BC7_TYPELESS | DXGI_FORMAT_BC7_UNORM => DdsFileFormat::Bc7,
            DXGI_FORMAT_BC7_UNORM_SRGB => DdsFileFormat::Bc7Srgb,
            DXGI_FORMAT_B8G8R8A8_TYPELESS
            | DXGI_FORMAT_B8G8R8A8_UNORM
            | DXGI_FORMAT_B8G8R8A8_UNORM_SRGB => DdsFileFormat::B8G8R8A8,
            DXGI_FORMAT_B8G8R8X8_TYPELESS
            | DXGI_FORMAT_B8G8R8X8_UNORM
            | DXGI_FORMAT_B8G8R8X8_UNORM_SRGB => DdsFileFormat::B8G8R8X8,
            DXGI_FORMAT_R8G8B8A8_TYPELESS
            | DXGI_FORMAT_R8G8B8A8_UNORM
            | DXGI_FORMAT_R8G8B8A8_UNORM_SRGB => DdsFileFormat::R8G8B8A8,
            DXGI_FORMAT_B5G5R5A1_UNORM => DdsFileFormat::B5G5R5A1,
            DXGI_FORMAT_B4G4R4A4_UNORM => DdsFileFormat::B4G4R4A4,
            DXGI_FORMAT_B5G6R5_UNORM => DdsFileFormat::B5G6R5,
            _ => return None,
        })
    }

    /// How this format is written to the DDS header.
    ///
    /// Formats that a DX9 era reader understands use the legacy pixel format; sRGB, BC6H and
    /// BC7 need the DX10 extension.
    pub const fn header_style(self) -> HeaderStyle {
        match self {
            DdsFileFormat::Bc1 => HeaderStyle::FourCc(FOURCC_DXT1),
            DdsFileFormat::Bc2 => HeaderStyle::FourCc(FOURCC_DXT3),
            DdsFileFormat::Bc3 => HeaderStyle::FourCc(FOURCC_DXT5),
            DdsFileFormat::Bc4 => HeaderStyle::FourCc(FOURCC_BC4U),
            DdsFileFormat::Bc5 => HeaderStyle::FourCc(FOURCC_BC5U),
            DdsFileFormat::Bc1Srgb
            | DdsFileFormat::Bc2Srgb
            | DdsFileFormat::Bc3Srgb
            | DdsFileFormat::Bc6h
            | DdsFileFormat::Bc7
            | DdsFileFormat::Bc7Srgb => HeaderStyle::Dx10,
            DdsFileFormat::B8G8R8A8 => HeaderStyle::Masks(PixelMasks::rgba(
                32,
                BGRA8888_RED_MASK,
                BGRA8888_GREEN_MASK,
                BGRA8888_BLUE_MASK,
                BGRA8888_ALPHA_MASK,
            )),
            DdsFileFormat::B8G8R8X8 => HeaderStyle::Masks(PixelMasks::rgba(
                32,
                BGRA8888_RED_MASK,
                BGRA8888_GREEN_MASK,
                BGRA8888_BLUE_MASK,
                0,
            )),
            DdsFileFormat::R8G8B8A8 => HeaderStyle::Masks(PixelMasks::rgba(
                32,
                RGBA8888_RED_MASK,
                RGBA8888_GREEN_MASK,
                RGBA8888_BLUE_MASK,
                RGBA8888_ALPHA_MASK,
            )),
            DdsFileFormat::B5G5R5A1 => {
                HeaderStyle::Masks(PixelMasks::rgba(16, 0x7C00, 0x03E0, 0x001F, 0x8000))
            }
            DdsFileFormat::B4G4R4A4 => {
                HeaderStyle::Masks(PixelMasks::rgba(16, 0x0F00, 0x00F0, 0x000F, 0xF000))
            }
            DdsFileFormat::B5G6R5 => {
                HeaderStyle::Masks(PixelMasks::rgba(16, 0xF800, 0x07E0, 0x001F, 0))
            }
        }
    }

    /// Finds the uncompressed format whose legacy bit masks are `masks`.
    ///
    /// Only the bit count and channel masks are compared; the `DDPF_ALPHAPIXELS` flag is
    /// implied by a non-zero alpha mask.
    pub fn from_masks(masks: &PixelMasks) -> Option<Self> {
        Self::all_values().iter().copied().find(|format| {
            matches!(
                format.header_style(),
                HeaderStyle::Masks(known)
                    if known.bit_count == masks.bit_count
                        && known.red == masks.red
                        && known.green == masks.green
                        && known.blue == masks.blue
                        && known.alpha == masks.alpha
            )
        })
    }
}

impl PixelMasks {
    /// Masks for an RGB layout; adds `DDPF_ALPHAPIXELS` when `alpha` is non-zero.
    pub const fn rgba(bit_count: u32, red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        Self {
            flags: if alpha != 0 {
                DDPF_RGB | DDPF_ALPHAPIXELS
            } else {
                DDPF_RGB
            },
            bit_count,
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl TryFrom<u32> for DdsFileFormat {
    type Error = InvalidFormatCode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::all_values()
            .iter()
            .copied()
            .find(|&format| format as u32 == value)
            .ok_or(InvalidFormatCode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn raw_codes_round_trip() {
        for &format in DdsFileFormat::all_values() {
            assert_eq!(DdsFileFormat::try_from(format as u32), Ok(format));
        }
        assert_eq!(DdsFileFormat::try_from(17), Err(InvalidFormatCode(17)));
        assert_eq!(
            DdsFileFormat::try_from(u32::MAX),
            Err(InvalidFormatCode(u32::MAX))
        );
    }

    #[test]
    fn dxgi_codes_map_back_to_the_same_format() {
        for &format in DdsFileFormat::all_values() {
            assert_eq!(
                DdsFileFormat::from_dxgi_format(format.dxgi_format()),
                Some(format)
            );
        }
    }

    #[rstest]
    #[case::bc4_snorm(DXGI_FORMAT_BC4_SNORM)]
    #[case::bc5_snorm(DXGI_FORMAT_BC5_SNORM)]
    #[case::bc6h_signed(DXGI_FORMAT_BC6H_SF16)]
    #[case::unknown(0)]
    fn signed_and_unknown_dxgi_codes_are_rejected(#[case] dxgi_format: u32) {
        assert_eq!(DdsFileFormat::from_dxgi_format(dxgi_format), None);
    }

    #[rstest]
    #[case(DXGI_FORMAT_BC1_TYPELESS, DdsFileFormat::Bc1)]
    #[case(DXGI_FORMAT_BC7_TYPELESS, DdsFileFormat::Bc7)]
    #[case(DXGI_FORMAT_B8G8R8A8_UNORM_SRGB, DdsFileFormat::B8G8R8A8)]
    #[case(DXGI_FORMAT_R8G8B8A8_TYPELESS, DdsFileFormat::R8G8B8A8)]
    fn alternate_dxgi_codes_are_accepted(
        #[case] dxgi_format: u32,
        #[case] expected: DdsFileFormat,
    ) {
        assert_eq!(DdsFileFormat::from_dxgi_format(dxgi_format), Some(expected));
    }

    #[test]
    fn every_format_is_block_or_pixels() {
        for &format in DdsFileFormat::all_values() {
            assert_ne!(
                format.block_format().is_some(),
                format.pixel_layout().is_some(),
                "{format:?}"
            );
        }
    }

    #[test]
    fn masks_identify_uncompressed_formats() {
        for &format in DdsFileFormat::all_values() {
            match format.header_style() {
                HeaderStyle::Masks(masks) => {
                    assert_eq!(DdsFileFormat::from_masks(&masks), Some(format));
                    assert_eq!(
                        masks.bit_count as usize / 8,
                        format.pixel_layout().unwrap().bytes_per_pixel()
                    );
                }
                _ => assert!(format.block_format().is_some(), "{format:?}"),
            }
        }
    }

    #[test]
    fn srgb_formats_use_dx10_headers() {
        for &format in DdsFileFormat::all_values().iter().filter(|f| f.is_srgb()) {
            assert_eq!(format.header_style(), HeaderStyle::Dx10);
        }
    }
}
