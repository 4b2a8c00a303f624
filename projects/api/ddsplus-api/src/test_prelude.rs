//! Common test imports and pixel builders.
#![allow(unused_imports)]

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use crate::progress::NoProgress;
pub use derive_enum_all_values::AllValues;
pub use rstest::rstest;

/// Tightly packed RGBA8 pixels where each pixel holds `[x, y, x ^ y, 255]` (wrapping).
pub fn coordinate_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    pixels
}
