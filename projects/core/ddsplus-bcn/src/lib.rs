#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod color_565;
pub mod format;
pub mod metric;
pub mod native;
pub mod settings;
pub mod traits;

mod bc1;
mod bc2;
mod bc3;
mod bc6h;
mod bc7;
mod bits;
mod endpoints;
mod single_channel;

#[cfg(test)]
pub(crate) mod test_prelude;

pub use format::BcFormat;
pub use metric::ErrorMetric;
pub use native::NativeBlockCodec;
pub use settings::{BlockSettings, CompressionSpeed};
pub use traits::{BlockCompressor, BlockDecompressor};
