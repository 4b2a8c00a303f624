#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocate;
pub mod block_4x4;
pub mod color_8888;
pub mod pixel_layout;

#[cfg(test)]
pub(crate) mod test_prelude;
