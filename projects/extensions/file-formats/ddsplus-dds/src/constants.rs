//! DDS format constants and definitions
//!
//! Offsets are relative to the start of the file, i.e. they include the 4 byte magic.
#![allow(missing_docs)]

/// Magic header for DDS files
pub const DDS_MAGIC: u32 = 0x44445320_u32.to_be();

/// Size of the regular DDS header, magic included.
pub const DDS_HEADER_SIZE: usize = 0x80;
/// Size of the `DDS_HEADER_DXT10` extension.
pub const DX10_HEADER_SIZE: usize = 20;
/// Largest possible header, i.e. regular header plus the DX10 extension.
pub const DDS_DX10_TOTAL_HEADER_SIZE: usize = DDS_HEADER_SIZE + DX10_HEADER_SIZE;

/// Value of the `dwSize` field of `DDS_HEADER`.
pub const DDS_HEADER_STRUCT_SIZE: u32 = 124;
/// Value of the `dwSize` field of `DDS_PIXELFORMAT`.
pub const DDS_PIXELFORMAT_STRUCT_SIZE: u32 = 32;

// DDS header field offsets
pub const DDS_SIZE_OFFSET: usize = 0x04;
pub const DDS_FLAGS_OFFSET: usize = 0x08;
pub const DDS_HEIGHT_OFFSET: usize = 0x0C;
pub const DDS_WIDTH_OFFSET: usize = 0x10;
pub const DDS_PITCH_OR_LINEAR_SIZE_OFFSET: usize = 0x14;
pub const DDS_DEPTH_OFFSET: usize = 0x18;
pub const DDS_MIPMAP_COUNT_OFFSET: usize = 0x1C;
pub const DDS_CAPS_OFFSET: usize = 0x6C;
pub const DDS_CAPS2_OFFSET: usize = 0x70;

// DDS pixel format offsets (within the 32-byte DDSPIXELFORMAT structure at offset 0x4C)
pub const DDS_PIXELFORMAT_OFFSET: usize = 0x4C;
pub const DDS_PIXELFORMAT_FLAGS_OFFSET: usize = 0x50;
/// Offset of the FOURCC header used in DX9 and below.
pub const FOURCC_OFFSET: usize = 0x54;
pub const DDS_PIXELFORMAT_RGBBITCOUNT_OFFSET: usize = 0x58;
pub const DDS_PIXELFORMAT_RBITMASK_OFFSET: usize = 0x5C;
pub const DDS_PIXELFORMAT_GBITMASK_OFFSET: usize = 0x60;
pub const DDS_PIXELFORMAT_BBITMASK_OFFSET: usize = 0x64;
pub const DDS_PIXELFORMAT_ABITMASK_OFFSET: usize = 0x68;

// DX10 header field offsets
/// Offset of the DXGI format header used in DX10 and above.
pub const DX10_FORMAT_OFFSET: usize = 0x80;
pub const DX10_RESOURCE_DIMENSION_OFFSET: usize = 0x84;
pub const DX10_MISC_FLAG_OFFSET: usize = 0x88;
pub const DX10_ARRAY_SIZE_OFFSET: usize = 0x8C;
pub const DX10_MISC_FLAGS2_OFFSET: usize = 0x90;

// FourCC codes
pub const FOURCC_DXT1: u32 = 0x31545844_u32.to_le(); // 'DXT1'
pub const FOURCC_DXT2: u32 = 0x32545844_u32.to_le(); // 'DXT2'
pub const FOURCC_DXT3: u32 = 0x33545844_u32.to_le(); // 'DXT3'
pub const FOURCC_DXT4: u32 = 0x34545844_u32.to_le(); // 'DXT4'
pub const FOURCC_DXT5: u32 = 0x35545844_u32.to_le(); // 'DXT5'
pub const FOURCC_ATI1: u32 = 0x31495441_u32.to_le(); // 'ATI1'
pub const FOURCC_BC4U: u32 = 0x55344342_u32.to_le(); // 'BC4U'
pub const FOURCC_ATI2: u32 = 0x32495441_u32.to_le(); // 'ATI2'
pub const FOURCC_BC5U: u32 = 0x55354342_u32.to_le(); // 'BC5U'
pub const FOURCC_DX10: u32 = 0x30315844_u32.to_le(); // 'DX10'

// DXGI format constants for DX10 header
pub const DXGI_FORMAT_R8G8B8A8_TYPELESS: u32 = 27;
pub const DXGI_FORMAT_R8G8B8A8_UNORM: u32 = 28;
pub const DXGI_FORMAT_R8G8B8A8_UNORM_SRGB: u32 = 29;

pub const DXGI_FORMAT_BC1_TYPELESS: u32 = 70;
pub const DXGI_FORMAT_BC1_UNORM: u32 = 71;
pub const DXGI_FORMAT_BC1_UNORM_SRGB: u32 = 72;

pub const DXGI_FORMAT_BC2_TYPELESS: u32 = 73;
pub const DXGI_FORMAT_BC2_UNORM: u32 = 74;
pub const DXGI_FORMAT_BC2_UNORM_SRGB: u32 = 75;

pub const DXGI_FORMAT_BC3_TYPELESS: u32 = 76;
pub const DXGI_FORMAT_BC3_UNORM: u32 = 77;
pub const DXGI_FORMAT_BC3_UNORM_SRGB: u32 = 78;

pub const DXGI_FORMAT_BC4_TYPELESS: u32 = 79;
pub const DXGI_FORMAT_BC4_UNORM: u32 = 80;
pub const DXGI_FORMAT_BC4_SNORM: u32 = 81;

pub const DXGI_FORMAT_BC5_TYPELESS: u32 = 82;
pub const DXGI_FORMAT_BC5_UNORM: u32 = 83;
pub const DXGI_FORMAT_BC5_SNORM: u32 = 84;

pub const DXGI_FORMAT_B5G6R5_UNORM: u32 = 85;
pub const DXGI_FORMAT_B5G5R5A1_UNORM: u32 = 86;
pub const DXGI_FORMAT_B8G8R8A8_UNORM: u32 = 87;
pub const DXGI_FORMAT_B8G8R8X8_UNORM: u32 = 88;
pub const DXGI_FORMAT_B8G8R8A8_TYPELESS: u32 = 90;
pub const DXGI_FORMAT_B8G8R8A8_UNORM_SRGB: u32 = 91;
pub const DXGI_FORMAT_B8G8R8X8_TYPELESS: u32 = 92;
pub const DXGI_FORMAT_B8G8R8X8_UNORM_SRGB: u32 = 93;

pub const DXGI_FORMAT_BC6H_TYPELESS: u32 = 94;
pub const DXGI_FORMAT_BC6H_UF16: u32 = 95;
pub const DXGI_FORMAT_BC6H_SF16: u32 = 96;

pub const DXGI_FORMAT_BC7_TYPELESS: u32 = 97;
pub const DXGI_FORMAT_BC7_UNORM: u32 = 98;
pub const DXGI_FORMAT_BC7_UNORM_SRGB: u32 = 99;

pub const DXGI_FORMAT_B4G4R4A4_UNORM: u32 = 115;

// DDS header flags
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;
pub const DDSD_DEPTH: u32 = 0x800000;

// DDS pixel format flags
pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;

// DDS caps
pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x400000;
pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_VOLUME: u32 = 0x200000;

// DX10 header values
pub const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;
pub const D3D10_RESOURCE_DIMENSION_TEXTURE3D: u32 = 4;
pub const DDS_RESOURCE_MISC_TEXTURECUBE: u32 = 0x4;
pub const DDS_ALPHA_MODE_MASK: u32 = 0x7;
pub const DDS_ALPHA_MODE_STRAIGHT: u32 = 1;
pub const DDS_ALPHA_MODE_PREMULTIPLIED: u32 = 2;
pub const DDS_ALPHA_MODE_OPAQUE: u32 = 3;

// B8G8R8A8_UNORM: R=byte2, G=byte1, B=byte0, A=byte3 (0xAARRGGBB)
pub const BGRA8888_RED_MASK: u32 = 0x00FF0000;
pub const BGRA8888_GREEN_MASK: u32 = 0x0000FF00;
pub const BGRA8888_BLUE_MASK: u32 = 0x000000FF;
pub const BGRA8888_ALPHA_MASK: u32 = 0xFF000000;

// R8G8B8A8_UNORM: R=byte0, G=byte1, B=byte2, A=byte3 (0xAABBGGRR)
pub const RGBA8888_RED_MASK: u32 = 0x000000FF;
pub const RGBA8888_GREEN_MASK: u32 = 0x0000FF00;
pub const RGBA8888_BLUE_MASK: u32 = 0x00FF0000;
pub const RGBA8888_ALPHA_MASK: u32 = 0xFF000000;
