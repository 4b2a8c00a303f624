use crate::format::{DdsFileFormat, SurfaceEncoding};
use ddsplus_bcn::format::BLOCK_DIMENSION;

/// Number of levels in a full mip chain for a `width` x `height` surface,
/// i.e. `floor(log2(max(width, height))) + 1`.
///
/// Returns 0 when either dimension is 0.
#[inline]
pub const fn max_mip_count(width: u32, height: u32) -> u32 {
    if width == 0 || height == 0 {
        return 0;
    }
    let largest = if width > height { width } else { height };
    u32::BITS - largest.leading_zeros()
}

/// Size of `base` at mip `level`; halved per level, never below 1.
#[inline]
pub const fn level_dimension(base: u32, level: u32) -> u32 {
    let value = if level >= u32::BITS { 0 } else { base >> level };
    if value == 0 {
        1
    } else {
        value
    }
}

/// Size in bytes of one `width` x `height` level stored in `format`.
///
/// Returns [`None`] if the size does not fit in a `usize`.
#[inline]
pub fn level_size(format: DdsFileFormat, width: u32, height: u32) -> Option<usize> {
    match format.encoding() {
        SurfaceEncoding::Block(block) => {
            let blocks_x = (width as usize).div_ceil(BLOCK_DIMENSION);
            let blocks_y = (height as usize).div_ceil(BLOCK_DIMENSION);
            blocks_x
                .checked_mul(blocks_y)?
                .checked_mul(block.bytes_per_block())
        }
        SurfaceEncoding::Pixels(layout) => (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(layout.bytes_per_pixel()),
    }
}

/// Size in bytes of a row of pixels (uncompressed) or a row of blocks (compressed).
#[inline]
pub fn row_pitch(format: DdsFileFormat, width: u32) -> Option<usize> {
    match format.encoding() {
        SurfaceEncoding::Block(block) => (width as usize)
            .div_ceil(BLOCK_DIMENSION)
            .checked_mul(block.bytes_per_block()),
        SurfaceEncoding::Pixels(layout) => (width as usize).checked_mul(layout.bytes_per_pixel()),
    }
}

/// Total size in bytes of `mip_count` levels, starting at `width` x `height`.
///
/// Returns [`None`] if the size does not fit in a `usize`.
pub fn surface_size(
    format: DdsFileFormat,
    width: u32,
    height: u32,
    mip_count: u32,
) -> Option<usize> {
    (0..mip_count).try_fold(0usize, |total, level| {
        let size = level_size(
            format,
            level_dimension(width, level),
            level_dimension(height, level),
        )?;
        total.checked_add(size)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(1, 1, 1)]
    #[case(2, 1, 2)]
    #[case(256, 256, 9)]
    #[case(256, 16, 9)]
    #[case(300, 17, 9)]
    #[case(5, 5, 3)]
    #[case(0, 5, 0)]
    #[case(u32::MAX, 1, 32)]
    fn mip_count_matches_log2(#[case] width: u32, #[case] height: u32, #[case] expected: u32) {
        assert_eq!(max_mip_count(width, height), expected);
    }

    #[rstest]
    #[case(256, 0, 256)]
    #[case(256, 8, 1)]
    #[case(256, 9, 1)]
    #[case(5, 1, 2)]
    #[case(5, 2, 1)]
    #[case(7, 40, 1)]
    fn level_dimension_halves_down_to_one(
        #[case] base: u32,
        #[case] level: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(level_dimension(base, level), expected);
    }

    #[rstest]
    #[case(DdsFileFormat::Bc1, 4, 4, 8)]
    #[case(DdsFileFormat::Bc1, 5, 5, 32)]
    #[case(DdsFileFormat::Bc1, 1, 1, 8)]
    #[case(DdsFileFormat::Bc7, 8, 4, 32)]
    #[case(DdsFileFormat::Bc4, 16, 16, 128)]
    #[case(DdsFileFormat::B8G8R8A8, 3, 2, 24)]
    #[case(DdsFileFormat::B5G6R5, 3, 2, 12)]
    fn level_sizes(
        #[case] format: DdsFileFormat,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: usize,
    ) {
        assert_eq!(level_size(format, width, height), Some(expected));
    }

    #[test]
    fn surface_size_sums_every_level() {
        // 8x8 is 4 blocks; every smaller level is a single block.
        assert_eq!(surface_size(DdsFileFormat::Bc1, 8, 8, 4), Some(8 * (4 + 1 + 1 + 1)));
        // 4x2 -> 2x1 -> 1x1
        assert_eq!(
            surface_size(DdsFileFormat::R8G8B8A8, 4, 2, 3),
            Some((8 + 2 + 1) * 4)
        );
    }

    #[test]
    fn row_pitch_counts_blocks_or_pixels() {
        assert_eq!(row_pitch(DdsFileFormat::Bc3, 9), Some(48));
        assert_eq!(row_pitch(DdsFileFormat::B4G4R4A4, 9), Some(18));
    }
}
