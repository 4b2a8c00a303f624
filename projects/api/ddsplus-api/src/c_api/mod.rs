//! # C API (FFI) Documentation
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! The `c-exports` feature exports `ddsplus_load`, `ddsplus_free_load_info` and `ddsplus_save`
//! for use from C, C++, or other languages that support C FFI.
//!
//! All I/O goes through a [`DdsIoCallbacks`] table supplied by the host. Every callback returns
//! `0` on success; any other value aborts the operation with [`DdsStatus::IoError`].
//!
//! ## Example Usage
//!
//! ### Loading
//!
//! ```c
//! DdsIoCallbacks io = { &file, file_read, file_write, file_seek, file_position, file_size };
//! DdsLoadInfo info;
//!
//! DdsStatus status = ddsplus_load(&io, &info);
//! if (status == DDS_STATUS_OK) {
//!     upload_rgba(info.scan0, info.width, info.height, info.stride);
//!     ddsplus_free_load_info(&info);
//! } else {
//!     printf("Load failed: %s\n", ddsplus_status_message(status));
//! }
//! ```
//!
//! ### Saving
//!
//! ```c
//! DdsSaveInfo save = {
//!     .width = width, .height = height, .stride = width * 4,
//!     .format = 9, // BC7
//!     .error_metric = 0, .compression_speed = 1,
//!     .generate_mipmaps = true, .mipmap_filter = 2, .linear_light_mipmaps = true,
//!     .error_diffusion_dithering = false,
//!     .scan0 = rgba,
//! };
//!
//! // Return false from the progress callback to cancel.
//! DdsStatus status = ddsplus_save(&save, &io, on_progress, &dialog);
//! ```
//!
//! ## Struct layout
//!
//! [`DdsLoadInfo`] starts with `width`, `height`, `stride` and `scan0` at the usual C offsets,
//! followed by an extra `owner` pointer that holds the allocation until
//! `ddsplus_free_load_info`. Hosts must declare the full struct: a declaration without `owner`
//! is too small for `ddsplus_load` to fill, and the buffer cannot be freed without it.
//!
//! [`DdsSaveInfo`] carries `linear_light_mipmaps` and `error_diffusion_dithering` after
//! `mipmap_filter`, ahead of `scan0`.
//!
//! ## Raw codes
//!
//! | Field               | Codes                                                      |
//! | ------------------- | ---------------------------------------------------------- |
//! | `format`            | discriminants of [`DdsFileFormat`] (`0` = BC1 .. `16` = B5G6R5) |
//! | `error_metric`      | `0` perceptual, `1` uniform                                |
//! | `compression_speed` | `0` fast, `1` normal, `2` slow                             |
//! | `mipmap_filter`     | `0` nearest, `1` bilinear, `2` bicubic, `3` Fant           |
//!
//! [`DdsFileFormat`]: ddsplus_dds::DdsFileFormat

pub mod io_callbacks;
pub mod load;
pub mod save;
pub mod status;

pub use io_callbacks::{
    CallbackError, DdsIoCallbacks, DdsPositionFn, DdsReadFn, DdsSeekFn, DdsSizeFn, DdsWriteFn,
};
pub use load::{ddsplus_free_load_info, ddsplus_load, DdsLoadInfo};
pub use save::{ddsplus_save, DdsProgressFn, DdsSaveInfo};
pub use status::{ddsplus_status_message, DdsStatus};
