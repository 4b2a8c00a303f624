#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Shared constants between modules.
pub mod constants;

/// The closed set of formats a DDS file can be saved in.
pub mod format;

/// Serializing and parsing DDS headers.
pub mod header;

/// Size calculations for surface levels.
pub mod level;

/// Determine if a file is a DDS file.
pub mod likely_dds;

#[cfg(test)]
pub(crate) mod test_prelude;

pub use format::{DdsFileFormat, HeaderStyle, InvalidFormatCode, PixelMasks, SurfaceEncoding};
pub use header::{header_size, parse_header, DdsHeader, EncodedHeader, HeaderError, ParsedHeader};
pub use level::{level_dimension, level_size, max_mip_count, row_pitch, surface_size};
pub use likely_dds::likely_dds;
