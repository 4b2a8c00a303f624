//! Common test imports and utilities for the shared pixel code
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use alloc::{boxed::Box, format, string::String, vec, vec::Vec};

pub use rstest::rstest;

use crate::color_8888::Color8888;

/// Builds a tightly packed RGBA8 image where every pixel encodes its own coordinates.
///
/// Red is `x * 16`, green is `y * 16`, blue is `x ^ y` and alpha is fixed at 255,
/// which makes clamping and transposition mistakes easy to spot.
pub fn coordinate_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, (x ^ y) as u8, 255]);
        }
    }
    data
}

/// The colour [`coordinate_image`] stores at `(x, y)`.
pub fn coordinate_pixel(x: usize, y: usize) -> Color8888 {
    Color8888::new((x * 16) as u8, (y * 16) as u8, (x ^ y) as u8, 255)
}
