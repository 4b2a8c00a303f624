#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod decode;
pub mod encode;
pub mod error;
pub mod io;
pub mod load_result;
pub mod mip;
pub mod policy;
pub mod progress;
pub mod request;

#[cfg(feature = "c-exports")]
pub mod c_api;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export main functionality at crate root
pub use decode::{load, Decoder};
#[cfg(feature = "image")]
pub use encode::save;
pub use encode::Encoder;
pub use error::{LoadError, PolicyError, SaveError};
#[cfg(feature = "std")]
pub use io::StreamChannel;
pub use io::{IoChannel, MemoryChannelError, SliceChannel, VecChannel};
pub use load_result::{free_load_info, LoadResult};
#[cfg(feature = "image")]
pub use mip::ImageResampler;
pub use mip::{MipChain, MipLevel, ResampleOptions, Resampler};
pub use policy::{resolve, resolve_format_code, CompressionPlan, LevelEncoding};
pub use progress::{
    CancellableProgress, CancellationToken, NoProgress, ProgressAction, ProgressSink, SaveOutcome,
};
pub use request::{MipmapFilter, PixelBuffer, SaveOptions, SaveRequest};

// Types callers need to fill in a request.
pub use ddsplus_bcn::{CompressionSpeed, ErrorMetric};
pub use ddsplus_dds::DdsFileFormat;
