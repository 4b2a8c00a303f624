//! The decode pipeline.
//!
//! Only the first level of a file is decoded. The remaining levels are validated to be
//! present and skipped, leaving the channel positioned at the end of the declared data.

use crate::error::LoadError;
use crate::io::IoChannel;
use crate::load_result::LoadResult;
use ddsplus_bcn::format::BLOCK_DIMENSION;
use ddsplus_bcn::{BlockDecompressor, NativeBlockCodec};
use ddsplus_common::allocate::allocate_align_64_zeroed;
use ddsplus_common::color_8888::Color8888;
use ddsplus_dds::constants::DDS_DX10_TOTAL_HEADER_SIZE;
use ddsplus_dds::{DdsHeader, HeaderError, SurfaceEncoding, level_size, parse_header};
use tracing::debug;

/// Loads images through a block decompressor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder<D> {
    decompressor: D,
}

impl<D: BlockDecompressor> Decoder<D> {
    /// Creates a decoder using `decompressor` for block formats.
    pub const fn new(decompressor: D) -> Self {
        Self { decompressor }
    }

    /// Loads the first level of the DDS file at the current position of `channel`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::MalformedHeader`] if the header is invalid, or the file is shorter than
    ///   its header declares.
    /// - [`LoadError::UnsupportedFormat`] for formats outside the supported set, arrays, cube
    ///   maps and volume textures.
    /// - [`LoadError::Io`] if the channel fails.
    /// - [`LoadError::AllocationFailed`] if the output buffer cannot be allocated.
    pub fn load<C>(&self, channel: &mut C) -> Result<LoadResult, LoadError<C::Error>>
    where
        C: IoChannel + ?Sized,
    {
        let start = channel.position().map_err(LoadError::Io)?;
        let mut header_bytes = [0u8; DDS_DX10_TOTAL_HEADER_SIZE];
        let read = channel.read_full(&mut header_bytes).map_err(LoadError::Io)?;
        let parsed = parse_header(&header_bytes[..read])?;
        let header = parsed.header;
        debug!(
            format = ?header.format,
            width = header.width,
            height = header.height,
            mip_count = header.mip_count,
            premultiplied = parsed.premultiplied,
            "loading DDS"
        );

        // `parse_header` rejects headers whose data size overflows.
        let data_size = header.data_size().ok_or(HeaderError::SizeOverflow)? as u64;
        let data_start = start + parsed.data_offset as u64;
        let data_end = data_start + data_size;
        let size = channel.size().map_err(LoadError::Io)?;
        if size < data_end {
            return Err(HeaderError::Truncated {
                required: (data_end - start) as usize,
                available: size.saturating_sub(start) as usize,
            }
            .into());
        }

        let (stride, pixels_size) = output_geometry(&header).ok_or(HeaderError::SizeOverflow)?;
        let base_size = level_size(header.format, header.width, header.height)
            .ok_or(HeaderError::SizeOverflow)?;

        channel.seek(data_start).map_err(LoadError::Io)?;
        let mut encoded = allocate_align_64_zeroed(base_size)?;
        let read = channel
            .read_full(encoded.as_mut_slice())
            .map_err(LoadError::Io)?;
        if read < base_size {
            return Err(HeaderError::Truncated {
                required: parsed.data_offset + base_size,
                available: parsed.data_offset + read,
            }
            .into());
        }

        let mut pixels = allocate_align_64_zeroed(pixels_size)?;
        self.decode_level(&header, encoded.as_slice(), pixels.as_mut_slice(), stride);
        if parsed.premultiplied {
            for pixel in pixels.as_mut_slice().chunks_exact_mut(4) {
                let straight = Color8888::from_rgba_bytes(pixel).unpremultiply();
                pixel.copy_from_slice(&straight.to_rgba_bytes());
            }
        }

        channel.seek(data_end).map_err(LoadError::Io)?;
        debug!(bytes = data_end - start, "loaded DDS");
        Ok(LoadResult::new(
            header.width,
            header.height,
            stride as u32,
            pixels,
        ))
    }

    fn decode_level(&self, header: &DdsHeader, encoded: &[u8], output: &mut [u8], stride: usize) {
        let width = header.width as usize;
        let height = header.height as usize;
        match header.format.encoding() {
            SurfaceEncoding::Block(format) => {
                let block_size = format.bytes_per_block();
                let row_size = width.div_ceil(BLOCK_DIMENSION) * block_size;
                for (block_y, row) in encoded.chunks_exact(row_size).enumerate() {
                    for (block_x, block) in row.chunks_exact(block_size).enumerate() {
                        self.decompressor
                            .decompress_block(block, format)
                            .store_cropped(output, width, height, stride, block_x, block_y);
                    }
                }
            }
            SurfaceEncoding::Pixels(layout) => {
                let row_size = width * layout.bytes_per_pixel();
                for (source, destination) in encoded
                    .chunks_exact(row_size)
                    .zip(output.chunks_exact_mut(stride))
                {
                    layout.decode_row(source, destination);
                }
            }
        }
    }
}

/// Stride and total size of the RGBA8 output, if both fit.
fn output_geometry(header: &DdsHeader) -> Option<(usize, usize)> {
    let stride = (header.width as usize).checked_mul(4)?;
    u32::try_from(stride).ok()?;
    Some((stride, stride.checked_mul(header.height as usize)?))
}

/// Loads the first level of a DDS file with the built-in block decoder.
///
/// See [`Decoder::load`].
pub fn load<C>(channel: &mut C) -> Result<LoadResult, LoadError<C::Error>>
where
    C: IoChannel + ?Sized,
{
    Decoder::new(NativeBlockCodec).load(channel)
}
