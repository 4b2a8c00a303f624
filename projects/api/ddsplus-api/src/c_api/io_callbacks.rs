//! Host supplied I/O, as an [`IoChannel`].

use crate::io::IoChannel;
use core::ffi::c_void;
use thiserror::Error;

/// Reads up to `len` bytes into `buffer`, storing the number of bytes read in `out_read`.
///
/// A read of 0 bytes means end of stream.
///
/// # Returns
/// 0 on success, non-zero error code on failure
pub type DdsReadFn = unsafe extern "C" fn(
    context: *mut c_void,
    buffer: *mut u8,
    len: usize,
    out_read: *mut usize,
) -> i32;

/// Writes all `len` bytes of `buffer`.
///
/// # Returns
/// 0 on success, non-zero error code on failure
pub type DdsWriteFn =
    unsafe extern "C" fn(context: *mut c_void, buffer: *const u8, len: usize) -> i32;

/// Moves to the absolute byte offset `position`.
///
/// # Returns
/// 0 on success, non-zero error code on failure
pub type DdsSeekFn = unsafe extern "C" fn(context: *mut c_void, position: u64) -> i32;

/// Stores the current absolute byte offset in `out_position`.
///
/// # Returns
/// 0 on success, non-zero error code on failure
pub type DdsPositionFn = unsafe extern "C" fn(context: *mut c_void, out_position: *mut u64) -> i32;

/// Stores the total stream length in bytes in `out_size`.
///
/// # Returns
/// 0 on success, non-zero error code on failure
pub type DdsSizeFn = unsafe extern "C" fn(context: *mut c_void, out_size: *mut u64) -> i32;

/// C-compatible I/O channel that wraps function pointers.
///
/// `write` is only called by `ddsplus_save`; `read` and `size` only by `ddsplus_load`. Every
/// function pointer must still be valid.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct DdsIoCallbacks {
    /// User-provided context passed to all callbacks
    pub context: *mut c_void,
    /// Reads bytes
    pub read: DdsReadFn,
    /// Writes bytes
    pub write: DdsWriteFn,
    /// Seeks to an absolute offset
    pub seek: DdsSeekFn,
    /// Gets the current offset
    pub position: DdsPositionFn,
    /// Gets the stream length
    pub size: DdsSizeFn,
}

/// A callback in [`DdsIoCallbacks`] returned a non-zero status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("I/O callback failed with code {code}")]
pub struct CallbackError {
    /// The status returned by the callback
    pub code: i32,
}

#[inline]
fn check(code: i32) -> Result<(), CallbackError> {
    if code == 0 {
        Ok(())
    } else {
        Err(CallbackError { code })
    }
}

impl IoChannel for DdsIoCallbacks {
    type Error = CallbackError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut read = 0;
        check(unsafe { (self.read)(self.context, buf.as_mut_ptr(), buf.len(), &mut read) })?;
        // The count comes from the host; clamp it to the buffer.
        Ok(read.min(buf.len()))
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        check(unsafe { (self.write)(self.context, buf.as_ptr(), buf.len()) })
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        check(unsafe { (self.seek)(self.context, position) })
    }

    fn position(&mut self) -> Result<u64, Self::Error> {
        let mut position = 0;
        check(unsafe { (self.position)(self.context, &mut position) })?;
        Ok(position)
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        let mut size = 0;
        check(unsafe { (self.size)(self.context, &mut size) })?;
        Ok(size)
    }
}
