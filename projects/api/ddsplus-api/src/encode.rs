//! The encode pipeline.
//!
//! A save writes, in order:
//!
//! 1. The DDS header, with the final format, dimensions and mip count.
//! 2. Every level, largest first, each as a single write.
//!
//! Progress is reported after every level as the share of the output written so far.
//! Cancellation is checked before the first level, after each row of blocks (or pixels)
//! and after each level. A cancel seen part way through a level lets that level finish and
//! be written, so the output always ends on a level boundary.

use crate::error::SaveError;
use crate::io::IoChannel;
use crate::mip::{MipChain, MipLevel, ResampleOptions, Resampler};
use crate::policy::{CompressionPlan, LevelEncoding, resolve};
use crate::progress::{ProgressAction, ProgressSink, SaveOutcome};
use crate::request::SaveRequest;
use alloc::vec::Vec;
use ddsplus_bcn::BlockCompressor;
use ddsplus_bcn::format::BLOCK_DIMENSION;
use ddsplus_common::block_4x4::Block4x4;
use ddsplus_common::pixel_layout::ErrorDiffusion;
use ddsplus_dds::level_size;
use tracing::{debug, trace};

/// Saves images through a block compressor and a resampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder<C, R> {
    compressor: C,
    resampler: R,
}

impl<C: BlockCompressor, R: Resampler> Encoder<C, R> {
    /// Creates an encoder using `compressor` for block formats and `resampler` for mip levels.
    pub const fn new(compressor: C, resampler: R) -> Self {
        Self {
            compressor,
            resampler,
        }
    }

    /// Saves `request` to `channel`.
    ///
    /// # Returns
    ///
    /// - [`SaveOutcome::Completed`] once every level was written.
    /// - [`SaveOutcome::Cancelled`] if `progress` cancelled the save. The output holds the
    ///   header and the levels finished before the cancellation.
    ///
    /// # Errors
    ///
    /// - [`SaveError::Policy`] if the request is invalid. Nothing is written.
    /// - [`SaveError::Io`] if the channel fails. Output written before the failure is left as is.
    pub fn save<W, P>(
        &self,
        request: &SaveRequest,
        channel: &mut W,
        progress: &mut P,
    ) -> Result<SaveOutcome, SaveError<W::Error>>
    where
        W: IoChannel + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let plan = resolve(request)?;
        debug!(
            format = ?plan.format(),
            width = plan.header.width,
            height = plan.header.height,
            mip_count = plan.mip_count(),
            output_size = plan.output_size,
            "saving DDS"
        );

        let header = plan.header.encode();
        channel.write(header.as_bytes()).map_err(SaveError::Io)?;
        let mut written = header.as_bytes().len() as u64;

        let mut chain = MipChain::new(
            &request.pixels,
            request.options.generate_mipmaps,
            ResampleOptions {
                filter: plan.filter,
                linear_light: plan.linear_light,
            },
            &self.resampler,
        );
        let mut buffer = Vec::new();
        let mut index = 0u32;

        if progress.is_cancelled() {
            debug!("save cancelled before the first level");
            return Ok(SaveOutcome::Cancelled);
        }

        while let Some(level) = chain.next_level() {
            let cancelled_during_level = self.encode_level(&plan, level, &mut buffer, progress);

            channel.write(&buffer).map_err(SaveError::Io)?;
            written += buffer.len() as u64;
            trace!(
                level = index,
                width = level.width(),
                height = level.height(),
                bytes = buffer.len(),
                "wrote level"
            );

            let is_last = index + 1 == plan.mip_count();
            let percent = if is_last {
                100.0
            } else {
                written as f64 * 100.0 / plan.output_size as f64
            };
            let cancelled = progress.report(percent) == ProgressAction::Cancel
                || cancelled_during_level
                || progress.is_cancelled();
            if cancelled && !is_last {
                debug!(level = index, "save cancelled after level");
                return Ok(SaveOutcome::Cancelled);
            }
            index += 1;
        }

        debug!(bytes = written, "saved DDS");
        Ok(SaveOutcome::Completed)
    }

    /// Encodes `level` into `buffer`, replacing its contents.
    ///
    /// The level is always encoded in full. Returns `true` if cancellation was requested
    /// part way through.
    fn encode_level<P: ProgressSink + ?Sized>(
        &self,
        plan: &CompressionPlan,
        level: &MipLevel,
        buffer: &mut Vec<u8>,
        progress: &P,
    ) -> bool {
        let width = level.width() as usize;
        let height = level.height() as usize;
        // Sizes of every level are bounded by `plan.output_size`, which resolved without overflow.
        let size = level_size(plan.format(), level.width(), level.height()).unwrap_or(0);
        buffer.clear();
        buffer.resize(size, 0);
        let mut cancelled = false;
        let mut poll = || {
            if !cancelled && progress.is_cancelled() {
                trace!("cancel requested, finishing level");
                cancelled = true;
            }
        };

        match plan.encoding {
            LevelEncoding::Block { format, settings } => {
                let block_size = format.bytes_per_block();
                let blocks_x = width.div_ceil(BLOCK_DIMENSION);
                let row_size = blocks_x * block_size;

                for (block_y, row) in buffer.chunks_exact_mut(row_size).enumerate() {
                    for (block_x, output) in row.chunks_exact_mut(block_size).enumerate() {
                        let block = Block4x4::extract_clamped(
                            level.data(),
                            width,
                            height,
                            level.stride(),
                            block_x,
                            block_y,
                        );
                        self.compressor
                            .compress_block(&block, format, settings, output);
                    }
                    poll();
                }
            }
            LevelEncoding::Pixels { layout, dithering } => {
                let row_size = width * layout.bytes_per_pixel();
                let mut diffusion = dithering.then(|| ErrorDiffusion::new(layout, width));
                for (y, row) in buffer.chunks_exact_mut(row_size).enumerate() {
                    match diffusion.as_mut() {
                        Some(diffusion) => diffusion.encode_row(level.row(y as u32), row),
                        None => layout.encode_row(level.row(y as u32), row),
                    }
                    poll();
                }
            }
        }
        cancelled
    }
}

/// Saves `request` with the built-in block compressor and [`ImageResampler`].
///
/// See [`Encoder::save`].
///
/// [`ImageResampler`]: crate::mip::ImageResampler
#[cfg(feature = "image")]
pub fn save<W, P>(
    request: &SaveRequest,
    channel: &mut W,
    progress: &mut P,
) -> Result<SaveOutcome, SaveError<W::Error>>
where
    W: IoChannel + ?Sized,
    P: ProgressSink + ?Sized,
{
    Encoder::new(ddsplus_bcn::NativeBlockCodec, crate::mip::ImageResampler).save(
        request, channel, progress,
    )
}
