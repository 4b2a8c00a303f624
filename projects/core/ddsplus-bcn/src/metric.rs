//! Error metrics used during endpoint search.
//!
//! Both metrics are weighted squared errors. They differ only in the weight given to
//! each colour channel:
//!
//! | Metric       | Red    | Green  | Blue   | Alpha |
//! | ------------ | ------ | ------ | ------ | ----- |
//! | `Perceptual` | 0.6378 | 2.1456 | 0.2166 | 1.0   |
//! | `Uniform`    | 1.0    | 1.0    | 1.0    | 1.0   |
//!
//! The perceptual weights are the Rec. 709 luma coefficients scaled to sum to 3, so both
//! metrics have the same total colour weight and only the distribution between channels
//! changes.
//!
//! Encoders work in a "metric space" where each channel has been multiplied by the square
//! root of its weight ([`ErrorMetric::channel_scale`]). Plain squared euclidean distance in
//! that space equals the weighted error in RGB space.

use ddsplus_common::block_4x4::Block4x4;
use ddsplus_common::color_8888::Color8888;
use derive_enum_all_values::AllValues;

/// The distance function used to compare a compressed block against its source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum ErrorMetric {
    /// Luminance weighted squared error. Favours green, then red, then blue.
    #[default]
    Perceptual,
    /// Unweighted squared error.
    Uniform,
}

impl ErrorMetric {
    /// Per-channel multipliers that map RGB into this metric's space.
    #[inline]
    pub const fn channel_scale(self) -> [f32; 3] {
        match self {
            ErrorMetric::Perceptual => [0.798_624_6, 1.464_786_6, 0.465_403_1],
            ErrorMetric::Uniform => [1.0, 1.0, 1.0],
        }
    }

    /// Per-channel weights of the squared error.
    #[inline]
    pub fn channel_weights(self) -> [f32; 3] {
        self.channel_scale().map(|s| s * s)
    }

    /// Weighted squared error between two pixels, alpha included with a weight of 1.
    #[inline]
    pub fn pixel_error(self, a: Color8888, b: Color8888) -> f32 {
        let [wr, wg, wb] = self.channel_weights();
        let d = |x: u8, y: u8| {
            let d = x as f32 - y as f32;
            d * d
        };
        wr * d(a.r, b.r) + wg * d(a.g, b.g) + wb * d(a.b, b.b) + d(a.a, b.a)
    }

    /// Sum of [`Self::pixel_error`] over a whole block.
    pub fn block_error(self, a: &Block4x4, b: &Block4x4) -> f32 {
        a.pixels
            .iter()
            .zip(b.pixels.iter())
            .map(|(&x, &y)| self.pixel_error(x, y))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case::perceptual(ErrorMetric::Perceptual)]
    #[case::uniform(ErrorMetric::Uniform)]
    fn weights_sum_to_three(#[case] metric: ErrorMetric) {
        let sum: f32 = metric.channel_weights().iter().sum();
        assert!((sum - 3.0).abs() < 1e-3, "{metric:?} sums to {sum}");
    }

    #[test]
    fn perceptual_penalises_green_over_blue() {
        let metric = ErrorMetric::Perceptual;
        let base = Color8888::new(100, 100, 100, 255);
        let green_off = Color8888::new(100, 110, 100, 255);
        let blue_off = Color8888::new(100, 100, 110, 255);
        assert!(metric.pixel_error(base, green_off) > metric.pixel_error(base, blue_off));
    }

    #[test]
    fn uniform_treats_channels_equally() {
        let metric = ErrorMetric::Uniform;
        let base = Color8888::new(100, 100, 100, 255);
        let green_off = Color8888::new(100, 110, 100, 255);
        let blue_off = Color8888::new(100, 100, 110, 255);
        assert_eq!(
            metric.pixel_error(base, green_off),
            metric.pixel_error(base, blue_off)
        );
    }

    #[test]
    fn identical_blocks_have_zero_error() {
        let block = Block4x4::new(Color8888::new(1, 2, 3, 4));
        for &metric in ErrorMetric::all_values() {
            assert_eq!(metric.block_error(&block, &block), 0.0);
        }
    }
}
