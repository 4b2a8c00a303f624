//! Memory allocation utilities for the ddsplus crates.
//!
//! Decoded images are handed to callers in buffers with a 64 byte alignment, so that
//! hosts can run SIMD-heavy filters over them without realigning.
//!
//! ## Useful APIs
//!
//! [`allocate_align_64`]: Allocates uninitialized memory aligned to 64-bytes.
//! [`allocate_align_64_zeroed`]: Same as above, but the memory is zero-filled.

use core::alloc::{Layout, LayoutError};
use safe_allocator_api::prelude::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let layout = Layout::from_size_align(num_bytes, 64)?;
    Ok(RawAlloc::new(layout)?)
}

/// Allocates zero-filled data with an alignment of 64 bytes.
///
/// Use this when the buffer is going to be exposed as a slice before every
/// byte has been written.
pub fn allocate_align_64_zeroed(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let mut alloc = allocate_align_64(num_bytes)?;
    // SAFETY: `alloc` owns exactly `num_bytes` writable bytes.
    unsafe { core::ptr::write_bytes(alloc.as_mut_ptr(), 0, num_bytes) };
    Ok(alloc)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),
}
