//! Error types for load and save operations.
//!
//! [`SaveError`] and [`LoadError`] are generic over the error type of the [`IoChannel`] in
//! use, so failures reported by the host's stream surface unchanged.
//!
//! [`IoChannel`]: crate::IoChannel

use ddsplus_common::allocate::AllocateError;
use ddsplus_dds::HeaderError;
use thiserror::Error;

/// A save request that cannot be turned into a compression plan.
///
/// These are reported before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Width or height is not positive.
    #[error("Invalid dimensions: {width}x{height}. Both must be greater than 0.")]
    InvalidDimensions {
        /// The requested width
        width: i32,
        /// The requested height
        height: i32,
    },

    /// The raw format code does not name a supported format.
    #[error("Unsupported format code: {0}")]
    UnsupportedFormat(u32),

    /// The stride is smaller than a row of pixels.
    #[error("Stride too small: {stride} bytes, but a row needs at least {minimum} bytes.")]
    StrideTooSmall {
        /// The requested stride
        stride: i32,
        /// `width * 4`
        minimum: u64,
    },

    /// The pixel slice is shorter than the geometry it is described with.
    #[error("Pixel buffer too small: need {required} bytes, but only {actual} bytes available.")]
    BufferTooSmall {
        /// `stride * (height - 1) + width * 4`
        required: usize,
        /// Length of the pixel slice
        actual: usize,
    },
}

/// Errors that can occur while saving a DDS file.
#[derive(Debug, Error)]
pub enum SaveError<E>
where
    E: core::fmt::Debug,
{
    /// The request was rejected before any output was written.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The channel failed to write.
    #[error("I/O error: {0:?}")]
    Io(E),
}

/// Errors that can occur while loading a DDS file.
#[derive(Debug, Error)]
pub enum LoadError<E>
where
    E: core::fmt::Debug,
{
    /// The file is not a valid DDS file, or it is truncated.
    #[error("Malformed DDS file: {0}")]
    MalformedHeader(HeaderError),

    /// The file is valid but stores a format or layout that cannot be loaded.
    #[error("Unsupported DDS file: {0}")]
    UnsupportedFormat(HeaderError),

    /// The channel failed to read or seek.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The output buffer could not be allocated.
    #[error("Memory allocation failed: {0}")]
    AllocationFailed(#[from] AllocateError),
}

impl<E> From<HeaderError> for LoadError<E>
where
    E: core::fmt::Debug,
{
    fn from(error: HeaderError) -> Self {
        if error.is_unsupported() {
            LoadError::UnsupportedFormat(error)
        } else {
            LoadError::MalformedHeader(error)
        }
    }
}
