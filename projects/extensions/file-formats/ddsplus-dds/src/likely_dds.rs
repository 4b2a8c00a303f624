use crate::constants::*;

/// Determines if the given data likely represents a DDS texture.
///
/// Only the `DDS ` magic and the minimum header length are checked; use
/// [`parse_header`] to validate the rest of the header.
///
/// [`parse_header`]: crate::header::parse_header
#[inline(always)]
pub fn likely_dds(data: &[u8]) -> bool {
    data.len() >= DDS_HEADER_SIZE
        && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == DDS_MAGIC
}
