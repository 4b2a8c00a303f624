//! C-compatible status codes.

use crate::error::{LoadError, PolicyError, SaveError};
use crate::progress::SaveOutcome;
use core::ffi::c_char;

/// Result of a C API call. Negative values are errors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdsStatus {
    /// Operation succeeded
    Ok = 0,
    /// The save was cancelled through the progress callback
    Cancelled = 1,
    /// Width or height is not positive
    InvalidDimensions = -1,
    /// The format code is unknown, or the file stores a format that cannot be loaded
    UnsupportedFormat = -2,
    /// The stride is smaller than `width * 4`
    StrideTooSmall = -3,
    /// An I/O callback reported failure
    IoError = -4,
    /// The file is not a valid DDS file, or it is truncated
    MalformedHeader = -5,
    /// Memory allocation failed
    AllocationFailed = -6,
    /// A required pointer was null, or an option code is out of range
    InvalidArgument = -7,
}

impl DdsStatus {
    /// Whether the call succeeded (including a cancelled save).
    pub const fn is_success(self) -> bool {
        matches!(self, DdsStatus::Ok | DdsStatus::Cancelled)
    }
}

impl From<PolicyError> for DdsStatus {
    fn from(error: PolicyError) -> Self {
        match error {
            PolicyError::InvalidDimensions { .. } => DdsStatus::InvalidDimensions,
            PolicyError::UnsupportedFormat(_) => DdsStatus::UnsupportedFormat,
            PolicyError::StrideTooSmall { .. } => DdsStatus::StrideTooSmall,
            PolicyError::BufferTooSmall { .. } => DdsStatus::InvalidArgument,
        }
    }
}

impl<E> From<SaveError<E>> for DdsStatus
where
    E: core::fmt::Debug,
{
    fn from(error: SaveError<E>) -> Self {
        match error {
            SaveError::Policy(policy) => policy.into(),
            SaveError::Io(_) => DdsStatus::IoError,
        }
    }
}

impl<E> From<LoadError<E>> for DdsStatus
where
    E: core::fmt::Debug,
{
    fn from(error: LoadError<E>) -> Self {
        match error {
            LoadError::MalformedHeader(_) => DdsStatus::MalformedHeader,
            LoadError::UnsupportedFormat(_) => DdsStatus::UnsupportedFormat,
            LoadError::Io(_) => DdsStatus::IoError,
            LoadError::AllocationFailed(_) => DdsStatus::AllocationFailed,
        }
    }
}

impl From<SaveOutcome> for DdsStatus {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Completed => DdsStatus::Ok,
            SaveOutcome::Cancelled => DdsStatus::Cancelled,
        }
    }
}

/// Get a null-terminated string description of a status code.
///
/// The returned string is a static string literal that does not need to be freed.
///
/// # Safety
/// This function is safe to call with any status value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ddsplus_status_message(status: DdsStatus) -> *const c_char {
    match status {
        DdsStatus::Ok => c"Success".as_ptr(),
        DdsStatus::Cancelled => c"Cancelled".as_ptr(),
        DdsStatus::InvalidDimensions => {
            c"Invalid dimensions: width and height must be greater than 0".as_ptr()
        }
        DdsStatus::UnsupportedFormat => c"Unsupported format".as_ptr(),
        DdsStatus::StrideTooSmall => c"Stride too small: must be at least width * 4".as_ptr(),
        DdsStatus::IoError => c"I/O callback failed".as_ptr(),
        DdsStatus::MalformedHeader => c"Malformed or truncated DDS file".as_ptr(),
        DdsStatus::AllocationFailed => c"Memory allocation failed".as_ptr(),
        DdsStatus::InvalidArgument => c"Invalid argument".as_ptr(),
    }
}
