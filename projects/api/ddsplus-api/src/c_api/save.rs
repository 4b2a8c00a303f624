//! `ddsplus_save`.

use super::io_callbacks::DdsIoCallbacks;
use super::status::DdsStatus;
use crate::encode::save;
use crate::error::PolicyError;
use crate::policy::resolve_format_code;
use crate::progress::{ProgressAction, ProgressSink};
use crate::request::{MipmapFilter, PixelBuffer, SaveOptions, SaveRequest};
use core::ffi::c_void;
use ddsplus_bcn::{CompressionSpeed, ErrorMetric};
use ddsplus_dds::DdsFileFormat;
use tracing::debug;

/// Progress callback. Receives the percentage of the output written so far (0 to 100).
///
/// Return `true` to continue, `false` to cancel the save.
pub type DdsProgressFn = Option<unsafe extern "C" fn(context: *mut c_void, percent: f64) -> bool>;

/// An image to save, and how to save it.
///
/// See the [module documentation](super) for the meaning of the raw codes. `error_metric` and
/// `compression_speed` are ignored for uncompressed formats, `mipmap_filter` when
/// `generate_mipmaps` is unset; out of range codes are only rejected where they are used.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DdsSaveInfo {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Distance between rows in bytes, at least `width * 4`
    pub stride: i32,
    /// Output format code
    pub format: u32,
    /// Error metric code
    pub error_metric: u32,
    /// Compression speed code
    pub compression_speed: u32,
    /// Whether to write a full mip chain
    pub generate_mipmaps: bool,
    /// Mip level filter code
    pub mipmap_filter: u32,
    /// Whether to resample mip levels in linear light
    pub linear_light_mipmaps: bool,
    /// Whether to dither when writing the 16-bit uncompressed formats
    pub error_diffusion_dithering: bool,
    /// R8G8B8A8 pixels with straight alpha, `stride * (height - 1) + width * 4` bytes
    pub scan0: *const u8,
}

/// Forwards progress to a [`DdsProgressFn`].
struct CallbackProgress {
    callback: DdsProgressFn,
    context: *mut c_void,
}

impl ProgressSink for CallbackProgress {
    fn report(&mut self, percent: f64) -> ProgressAction {
        match self.callback {
            Some(callback) if !unsafe { callback(self.context, percent) } => ProgressAction::Cancel,
            _ => ProgressAction::Continue,
        }
    }
}

/// Looks up the value at index `code`; codes for unused options fall back to the default.
fn option_from_code<T: Copy + Default>(values: &[T], code: u32, used: bool) -> Option<T> {
    match values.get(code as usize) {
        Some(&value) => Some(value),
        None if !used => Some(T::default()),
        None => None,
    }
}

fn save_options(info: &DdsSaveInfo, format: DdsFileFormat) -> Option<SaveOptions> {
    let is_block = format.block_format().is_some();
    Some(
        SaveOptions::new(format)
            .error_metric(option_from_code(
                ErrorMetric::all_values(),
                info.error_metric,
                is_block,
            )?)
            .compression_speed(option_from_code(
                CompressionSpeed::all_values(),
                info.compression_speed,
                is_block,
            )?)
            .generate_mipmaps(info.generate_mipmaps)
            .mipmap_filter(option_from_code(
                MipmapFilter::all_values(),
                info.mipmap_filter,
                info.generate_mipmaps,
            )?)
            .linear_light_mipmaps(info.linear_light_mipmaps)
            .error_diffusion_dithering(info.error_diffusion_dithering),
    )
}

/// Save an image as a DDS file through the host's I/O callbacks.
///
/// Nothing is written unless the request is valid. Progress is reported once per mip level;
/// returning `false` from `progress` stops the save after the current level and yields
/// [`DdsStatus::Cancelled`], leaving the header and finished levels in the output.
///
/// # Parameters
/// - `info`: The image and save options.
/// - `io`: The host's I/O callbacks; only `write` is used.
/// - `progress`: Optional progress callback.
/// - `progress_context`: Passed to `progress` unchanged.
///
/// # Returns
/// [`DdsStatus::Ok`], [`DdsStatus::Cancelled`], or the reason the save failed. Validation
/// happens in order: dimensions, format, options, stride.
///
/// # Safety
/// - `info` and `io` must be null or valid.
/// - `info.scan0` must be null or valid for reads of
///   `stride * (height - 1) + width * 4` bytes for the duration of the call.
/// - `progress`, when set, must be safe to call with `progress_context`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ddsplus_save(
    info: *const DdsSaveInfo,
    io: *const DdsIoCallbacks,
    progress: DdsProgressFn,
    progress_context: *mut c_void,
) -> DdsStatus {
    if info.is_null() || io.is_null() {
        return DdsStatus::InvalidArgument;
    }

    // SAFETY: Both pointers were checked for null; validity is the caller's contract.
    let (info, mut channel) = unsafe { (*info, *io) };
    let geometry = PixelBuffer::new(info.width, info.height, info.stride, &[]);
    let format = match resolve_format_code(&geometry, info.format) {
        Ok(format) => format,
        Err(error) => return error.into(),
    };
    let Some(options) = save_options(&info, format) else {
        debug!(?info, "ddsplus_save received an out of range option code");
        return DdsStatus::InvalidArgument;
    };
    let Some(len) = PixelBuffer::required_len(info.width, info.height, info.stride) else {
        // Dimensions are valid at this point, so the stride is at fault.
        return PolicyError::StrideTooSmall {
            stride: info.stride,
            minimum: info.width as u64 * 4,
        }
        .into();
    };
    if info.scan0.is_null() {
        return DdsStatus::InvalidArgument;
    }

    // SAFETY: The caller guarantees `scan0` covers the geometry it describes.
    let scan0 = unsafe { core::slice::from_raw_parts(info.scan0, len) };
    let request = SaveRequest::new(
        PixelBuffer::new(info.width, info.height, info.stride, scan0),
        options,
    );
    let mut progress = CallbackProgress {
        callback: progress,
        context: progress_context,
    };

    match save(&request, &mut channel, &mut progress) {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            debug!(%error, "ddsplus_save failed");
            error.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::io_callbacks::test_callbacks::{callbacks, Stream};
    use crate::c_api::load::{ddsplus_free_load_info, ddsplus_load, DdsLoadInfo};
    use crate::test_prelude::*;
    use core::ptr;
    use ddsplus_dds::parse_header;

    fn save_info(pixels: &[u8], width: i32, height: i32, format: DdsFileFormat) -> DdsSaveInfo {
        DdsSaveInfo {
            width,
            height,
            stride: width * 4,
            format: format as u32,
            error_metric: 0,
            compression_speed: 1,
            generate_mipmaps: false,
            mipmap_filter: 2,
            linear_light_mipmaps: true,
            error_diffusion_dithering: false,
            scan0: pixels.as_ptr(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let pixels = coordinate_pixels(6, 3);
        let info = save_info(&pixels, 6, 3, DdsFileFormat::B8G8R8A8);
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);

        let status = unsafe { ddsplus_save(&info, &io, None, ptr::null_mut()) };
        assert_eq!(status, DdsStatus::Ok);

        stream.position = 0;
        let io = callbacks(&mut stream);
        let mut loaded = DdsLoadInfo::EMPTY;
        assert_eq!(unsafe { ddsplus_load(&io, &mut loaded) }, DdsStatus::Ok);
        let output = unsafe { core::slice::from_raw_parts(loaded.scan0, pixels.len()) };
        assert_eq!(output, &pixels[..]);
        unsafe { ddsplus_free_load_info(&mut loaded) };
    }

    #[rstest]
    #[case::zero_width(0, 4, 0, 0, DdsStatus::InvalidDimensions)]
    #[case::dimensions_before_format(-1, 4, 99, 0, DdsStatus::InvalidDimensions)]
    #[case::unknown_format(4, 4, 17, 16, DdsStatus::UnsupportedFormat)]
    #[case::short_stride(4, 4, 0, 15, DdsStatus::StrideTooSmall)]
    fn invalid_requests_write_nothing(
        #[case] width: i32,
        #[case] height: i32,
        #[case] format: u32,
        #[case] stride: i32,
        #[case] expected: DdsStatus,
    ) {
        let pixels = vec![0u8; 256];
        let info = DdsSaveInfo {
            stride,
            format,
            ..save_info(&pixels, width, height, DdsFileFormat::Bc1)
        };
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);

        assert_eq!(unsafe { ddsplus_save(&info, &io, None, ptr::null_mut()) }, expected);
        assert!(stream.data.is_empty());
    }

    #[test]
    fn option_codes_are_only_checked_where_used() {
        let pixels = vec![0u8; 4 * 4 * 4];
        let mut info = save_info(&pixels, 4, 4, DdsFileFormat::R8G8B8A8);
        info.error_metric = 9;
        info.compression_speed = 9;
        info.mipmap_filter = 9;
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);
        assert_eq!(
            unsafe { ddsplus_save(&info, &io, None, ptr::null_mut()) },
            DdsStatus::Ok
        );

        info.format = DdsFileFormat::Bc3 as u32;
        assert_eq!(
            unsafe { ddsplus_save(&info, &io, None, ptr::null_mut()) },
            DdsStatus::InvalidArgument
        );
    }

    #[test]
    fn dithering_flag_is_forwarded() {
        let pixels = vec![0u8; 4 * 4 * 4];
        let mut info = save_info(&pixels, 4, 4, DdsFileFormat::B5G6R5);
        let options = save_options(&info, DdsFileFormat::B5G6R5).unwrap();
        assert!(!options.error_diffusion_dithering);

        info.error_diffusion_dithering = true;
        let options = save_options(&info, DdsFileFormat::B5G6R5).unwrap();
        assert!(options.error_diffusion_dithering);
    }

    unsafe extern "C" fn cancel_after_first(context: *mut c_void, percent: f64) -> bool {
        let reports = unsafe { &mut *(context as *mut Vec<f64>) };
        reports.push(percent);
        reports.len() < 2
    }

    #[test]
    fn progress_callback_can_cancel() {
        let pixels = vec![0u8; 8 * 8 * 4];
        let mut info = save_info(&pixels, 8, 8, DdsFileFormat::R8G8B8A8);
        info.generate_mipmaps = true;
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);
        let mut reports: Vec<f64> = Vec::new();

        let status = unsafe {
            ddsplus_save(
                &info,
                &io,
                Some(cancel_after_first),
                &mut reports as *mut Vec<f64> as *mut c_void,
            )
        };
        assert_eq!(status, DdsStatus::Cancelled);
        assert_eq!(reports.len(), 2);
        // Header, 8x8 and 4x4.
        let parsed = parse_header(&stream.data).unwrap();
        assert_eq!(parsed.header.mip_count, 4);
        assert_eq!(stream.data.len(), parsed.data_offset + (64 + 16) * 4);
    }

    #[test]
    fn null_pointers_are_rejected() {
        let pixels = [0u8; 4];
        let mut info = save_info(&pixels, 1, 1, DdsFileFormat::R8G8B8A8);
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);
        assert_eq!(
            unsafe { ddsplus_save(ptr::null(), &io, None, ptr::null_mut()) },
            DdsStatus::InvalidArgument
        );
        assert_eq!(
            unsafe { ddsplus_save(&info, ptr::null(), None, ptr::null_mut()) },
            DdsStatus::InvalidArgument
        );
        info.scan0 = ptr::null();
        assert_eq!(
            unsafe { ddsplus_save(&info, &io, None, ptr::null_mut()) },
            DdsStatus::InvalidArgument
        );
    }
}
