use super::{MipLevel, Resampler};
use crate::request::MipmapFilter;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, Rgba32FImage, RgbaImage};
use std::sync::OnceLock;

/// The default [`Resampler`], backed by [`image::imageops::resize`].
///
/// | [`MipmapFilter`] | [`FilterType`]   |
/// | ---------------- | ---------------- |
/// | `Nearest`        | `Nearest`        |
/// | `Bilinear`       | `Triangle`       |
/// | `Bicubic`        | `CatmullRom`     |
/// | `Fant`           | `Lanczos3`       |
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResampler;

impl Resampler for ImageResampler {
    fn resize(
        &self,
        source: &MipLevel<'_>,
        width: u32,
        height: u32,
        filter: MipmapFilter,
        linear_light: bool,
    ) -> MipLevel<'static> {
        let filter = filter_type(filter);
        let pixels = if linear_light {
            let decode = srgb_to_linear_table();
            let image: Rgba32FImage = ImageBuffer::from_fn(source.width(), source.height(), |x, y| {
                let [r, g, b, a] = source.pixel(x, y);
                Rgba([
                    decode[r as usize],
                    decode[g as usize],
                    decode[b as usize],
                    a as f32 / 255.0,
                ])
            });
            imageops::resize(&image, width, height, filter)
                .pixels()
                .flat_map(|&Rgba([r, g, b, a])| {
                    [
                        linear_to_srgb(r),
                        linear_to_srgb(g),
                        linear_to_srgb(b),
                        unorm_to_u8(a),
                    ]
                })
                .collect()
        } else {
            let image: RgbaImage = ImageBuffer::from_fn(source.width(), source.height(), |x, y| {
                Rgba(source.pixel(x, y))
            });
            imageops::resize(&image, width, height, filter).into_raw()
        };

        MipLevel::from_packed(width, height, pixels)
    }
}

fn filter_type(filter: MipmapFilter) -> FilterType {
    match filter {
        MipmapFilter::Nearest => FilterType::Nearest,
        MipmapFilter::Bilinear => FilterType::Triangle,
        MipmapFilter::Bicubic => FilterType::CatmullRom,
        MipmapFilter::Fant => FilterType::Lanczos3,
    }
}

fn srgb_to_linear_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        core::array::from_fn(|i| {
            let value = i as f32 / 255.0;
            if value <= 0.04045 {
                value / 12.92
            } else {
                ((value + 0.055) / 1.055).powf(2.4)
            }
        })
    })
}

#[inline]
fn linear_to_srgb(value: f32) -> u8 {
    // Sharpening kernels overshoot; clamp before the transfer function.
    let value = value.clamp(0.0, 1.0);
    let encoded = if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    };
    unorm_to_u8(encoded)
}

#[inline]
fn unorm_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
