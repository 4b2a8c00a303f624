//! Common test imports and DDS header builders.
#![allow(unused_imports)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use derive_enum_all_values::AllValues;
pub use rstest::rstest;

use crate::constants::*;
use endian_writer::{EndianWriter, LittleEndianWriter};

/// Overwrites the little endian `u32` at `offset`.
pub fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    assert!(offset + 4 <= data.len());
    // SAFETY: bounds asserted above.
    unsafe {
        let mut writer = LittleEndianWriter::new(data.as_mut_ptr());
        writer.write_u32_at(value, offset as isize);
    }
}

/// Builds a legacy header with the given FourCC, without surface data.
///
/// Used for FourCCs that are read but never written, e.g. `DXT2` and `ATI1`.
pub fn create_fourcc_header(fourcc: &[u8; 4], width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0u8; DDS_HEADER_SIZE];
    write_u32(&mut data, 0, DDS_MAGIC);
    write_u32(&mut data, DDS_SIZE_OFFSET, DDS_HEADER_STRUCT_SIZE);
    write_u32(
        &mut data,
        DDS_FLAGS_OFFSET,
        DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE,
    );
    write_u32(&mut data, DDS_HEIGHT_OFFSET, height);
    write_u32(&mut data, DDS_WIDTH_OFFSET, width);
    write_u32(&mut data, DDS_PIXELFORMAT_OFFSET, DDS_PIXELFORMAT_STRUCT_SIZE);
    write_u32(&mut data, DDS_PIXELFORMAT_FLAGS_OFFSET, DDPF_FOURCC);
    data[FOURCC_OFFSET..FOURCC_OFFSET + 4].copy_from_slice(fourcc);
    write_u32(&mut data, DDS_CAPS_OFFSET, DDSCAPS_TEXTURE);
    data
}
