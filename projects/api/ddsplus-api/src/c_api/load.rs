//! `ddsplus_load` and `ddsplus_free_load_info`.

use super::io_callbacks::DdsIoCallbacks;
use super::status::DdsStatus;
use crate::decode::load;
use alloc::boxed::Box;
use core::ffi::c_void;
use core::ptr;
use safe_allocator_api::RawAlloc;
use tracing::debug;

/// A decoded image owned by the library.
///
/// `scan0` points to `height` rows of `stride` bytes of R8G8B8A8 pixels with straight alpha,
/// 64 byte aligned. It stays valid until the struct is passed to [`ddsplus_free_load_info`].
///
/// The trailing `owner` field is part of the ABI; see the [module documentation](super).
#[repr(C)]
#[derive(Debug)]
pub struct DdsLoadInfo {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Distance between rows in bytes
    pub stride: i32,
    /// The pixels
    pub scan0: *mut u8,
    /// Opaque handle to the allocation; do not modify
    pub owner: *mut c_void,
}

impl DdsLoadInfo {
    /// A released (or never filled) load info.
    pub const EMPTY: Self = Self {
        width: 0,
        height: 0,
        stride: 0,
        scan0: ptr::null_mut(),
        owner: ptr::null_mut(),
    };
}

/// Load the first level of the DDS file at the current position of `io`.
///
/// On success `info` owns a pixel buffer that must be released with
/// [`ddsplus_free_load_info`]. On failure `info` is left zeroed.
///
/// # Parameters
/// - `io`: The host's I/O callbacks.
/// - `info`: Receives the decoded image.
///
/// # Returns
/// [`DdsStatus::Ok`], or the reason the file could not be loaded.
/// [`DdsStatus::InvalidArgument`] if either pointer is null.
///
/// # Safety
/// - `io` must be null or point to a valid [`DdsIoCallbacks`] whose callbacks are safe to call
///   with its context.
/// - `info` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ddsplus_load(
    io: *const DdsIoCallbacks,
    info: *mut DdsLoadInfo,
) -> DdsStatus {
    if io.is_null() || info.is_null() {
        return DdsStatus::InvalidArgument;
    }

    // SAFETY: Both pointers were checked for null; validity is the caller's contract.
    let (mut channel, info) = unsafe { (*io, &mut *info) };
    *info = DdsLoadInfo::EMPTY;

    let mut result = match load(&mut channel) {
        Ok(result) => result,
        Err(error) => {
            debug!(%error, "ddsplus_load failed");
            return error.into();
        }
    };

    let (Ok(width), Ok(height), Ok(stride)) = (
        i32::try_from(result.width()),
        i32::try_from(result.height()),
        i32::try_from(result.stride()),
    ) else {
        debug!(
            width = result.width(),
            height = result.height(),
            "image does not fit the C API's dimensions"
        );
        return DdsStatus::MalformedHeader;
    };

    let Some(pixels) = result.take() else {
        return DdsStatus::AllocationFailed;
    };
    let mut owner = Box::new(pixels);
    *info = DdsLoadInfo {
        width,
        height,
        stride,
        scan0: owner.as_mut_ptr(),
        owner: Box::into_raw(owner) as *mut c_void,
    };
    DdsStatus::Ok
}

/// Release the pixel buffer of a [`DdsLoadInfo`] and zero every field.
///
/// Calling this on an already released or zeroed struct does nothing.
///
/// # Safety
/// `info` must be null, or point to a [`DdsLoadInfo`] that is zeroed or was filled by
/// [`ddsplus_load`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ddsplus_free_load_info(info: *mut DdsLoadInfo) {
    if info.is_null() {
        return;
    }

    // SAFETY: Checked for null above.
    let info = unsafe { &mut *info };
    if !info.owner.is_null() {
        // SAFETY: `owner` was produced by `Box::into_raw` in `ddsplus_load` and is cleared below,
        // so it is reclaimed exactly once.
        drop(unsafe { Box::from_raw(info.owner as *mut RawAlloc) });
    }
    *info = DdsLoadInfo::EMPTY;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::io_callbacks::test_callbacks::{callbacks, Stream};
    use crate::test_prelude::*;
    use ddsplus_dds::{DdsFileFormat, DdsHeader};

    fn dds_stream(format: DdsFileFormat, width: u32, height: u32, data: &[u8]) -> Stream {
        let mut bytes = DdsHeader::new(format, width, height, 1)
            .encode()
            .as_bytes()
            .to_vec();
        bytes.extend_from_slice(data);
        Stream {
            data: bytes,
            ..Stream::default()
        }
    }

    #[test]
    fn load_info_keeps_the_image_fields_first() {
        use core::mem::{offset_of, size_of};

        let pointer = size_of::<*mut u8>();
        let scan0 = 12usize.next_multiple_of(pointer);
        assert_eq!(offset_of!(DdsLoadInfo, width), 0);
        assert_eq!(offset_of!(DdsLoadInfo, height), 4);
        assert_eq!(offset_of!(DdsLoadInfo, stride), 8);
        assert_eq!(offset_of!(DdsLoadInfo, scan0), scan0);
        assert_eq!(offset_of!(DdsLoadInfo, owner), scan0 + pointer);
        assert_eq!(size_of::<DdsLoadInfo>(), scan0 + 2 * pointer);
    }

    #[test]
    fn load_then_free() {
        let mut stream = dds_stream(DdsFileFormat::R8G8B8A8, 2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let io = callbacks(&mut stream);
        let mut info = DdsLoadInfo::EMPTY;

        let status = unsafe { ddsplus_load(&io, &mut info) };
        assert_eq!(status, DdsStatus::Ok);
        assert_eq!((info.width, info.height, info.stride), (2, 1, 8));
        assert_eq!(info.scan0 as usize % 64, 0);
        let pixels = unsafe { core::slice::from_raw_parts(info.scan0, 8) };
        assert_eq!(pixels, &[1, 2, 3, 4, 5, 6, 7, 8]);

        unsafe { ddsplus_free_load_info(&mut info) };
        assert_eq!((info.width, info.height, info.stride), (0, 0, 0));
        assert!(info.scan0.is_null() && info.owner.is_null());

        // Releasing again is a no-op.
        unsafe { ddsplus_free_load_info(&mut info) };
        unsafe { ddsplus_free_load_info(ptr::null_mut()) };
    }

    #[test]
    fn failures_leave_info_zeroed() {
        let mut stream = Stream {
            data: b"not a dds file".repeat(16),
            ..Stream::default()
        };
        let io = callbacks(&mut stream);
        let mut info = DdsLoadInfo {
            width: 7,
            ..DdsLoadInfo::EMPTY
        };

        let status = unsafe { ddsplus_load(&io, &mut info) };
        assert_eq!(status, DdsStatus::MalformedHeader);
        assert_eq!(info.width, 0);
        assert!(info.owner.is_null());
        unsafe { ddsplus_free_load_info(&mut info) };
    }

    #[test]
    fn callback_failures_are_io_errors() {
        let mut stream = Stream {
            fail_with: -1,
            ..dds_stream(DdsFileFormat::Bc1, 4, 4, &[0; 8])
        };
        let io = callbacks(&mut stream);
        let mut info = DdsLoadInfo::EMPTY;
        assert_eq!(unsafe { ddsplus_load(&io, &mut info) }, DdsStatus::IoError);
    }

    #[test]
    fn null_pointers_are_rejected() {
        let mut stream = Stream::default();
        let io = callbacks(&mut stream);
        let mut info = DdsLoadInfo::EMPTY;
        assert_eq!(
            unsafe { ddsplus_load(ptr::null(), &mut info) },
            DdsStatus::InvalidArgument
        );
        assert_eq!(
            unsafe { ddsplus_load(&io, ptr::null_mut()) },
            DdsStatus::InvalidArgument
        );
    }
}
