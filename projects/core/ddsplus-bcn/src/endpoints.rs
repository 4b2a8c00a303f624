//! Endpoint search shared by the interpolating block encoders.
//!
//! Every format this crate encodes stores a block as two endpoints plus, for each pixel,
//! an index into a palette interpolated between them. Finding good endpoints is the same
//! problem for all of them, so it lives here and works on points of any dimension.
//!
//! Points are expected in metric space (see [`crate::metric`]), so plain squared distance
//! is the error being minimised.

use crate::CompressionSpeed;

/// Number of power iterations used to find the principal axis.
const POWER_ITERATIONS: usize = 8;

/// Upper bound on least squares refinement passes at [`CompressionSpeed::Slow`].
const REFINEMENT_PASSES: usize = 2;

/// The outcome of encoding a block with one pair of endpoints.
pub(crate) struct Fit<T> {
    /// The encoded block.
    pub(crate) encoded: T,
    /// Total squared error of the encoding, in metric space.
    pub(crate) error: f32,
    /// For every input point, its position between the two endpoints as chosen by the
    /// encoder; `0.0` is the first endpoint, `1.0` the second.
    pub(crate) positions: [f32; 16],
}

/// Finds endpoints for `points` with the effort implied by `speed`, and returns the best
/// encoding produced by `encode`.
///
/// `encode` receives a candidate pair of endpoints in metric space. It is free to
/// quantize, reorder or swap them, as long as the returned positions are relative to
/// the endpoint order it was given.
pub(crate) fn search_endpoints<const N: usize, T>(
    points: &[[f32; N]],
    speed: CompressionSpeed,
    mut encode: impl FnMut([f32; N], [f32; N]) -> Fit<T>,
) -> Fit<T> {
    match speed {
        CompressionSpeed::Fast => {
            let (a, b) = bounding_box(points);
            encode(a, b)
        }
        CompressionSpeed::Normal => {
            let (a, b) = principal_axis(points);
            encode(a, b)
        }
        CompressionSpeed::Slow => {
            let (a, b) = principal_axis(points);
            let mut best = encode(a, b);

            let (a, b) = bounding_box(points);
            let candidate = encode(a, b);
            if candidate.error < best.error {
                best = candidate;
            }

            for _ in 0..REFINEMENT_PASSES {
                let Some((a, b)) = least_squares(points, &best.positions[..points.len()]) else {
                    break;
                };
                let candidate = encode(a, b);
                if candidate.error >= best.error {
                    break;
                }
                best = candidate;
            }

            best
        }
    }
}

/// Endpoints spanning the axis aligned bounding box of `points`.
///
/// The diagonal is picked using the sign of each channel's covariance with the channel of
/// largest extent, so negatively correlated channels run against the others.
pub(crate) fn bounding_box<const N: usize>(points: &[[f32; N]]) -> ([f32; N], [f32; N]) {
    let mut min = [f32::MAX; N];
    let mut max = [f32::MIN; N];
    for point in points {
        for c in 0..N {
            min[c] = min[c].min(point[c]);
            max[c] = max[c].max(point[c]);
        }
    }

    let mut dominant = 0;
    for c in 1..N {
        if max[c] - min[c] > max[dominant] - min[dominant] {
            dominant = c;
        }
    }

    let mean = mean(points);
    for c in 0..N {
        if c == dominant {
            continue;
        }
        let covariance: f32 = points
            .iter()
            .map(|p| (p[c] - mean[c]) * (p[dominant] - mean[dominant]))
            .sum();
        if covariance < 0.0 {
            core::mem::swap(&mut min[c], &mut max[c]);
        }
    }

    (min, max)
}

/// Endpoints at the extremes of `points` projected onto their principal axis.
///
/// Falls back to [`bounding_box`] when the points have no dominant direction.
pub(crate) fn principal_axis<const N: usize>(points: &[[f32; N]]) -> ([f32; N], [f32; N]) {
    let mean = mean(points);

    let mut covariance = [[0.0f32; N]; N];
    for point in points {
        for i in 0..N {
            let di = point[i] - mean[i];
            for j in i..N {
                covariance[i][j] += di * (point[j] - mean[j]);
            }
        }
    }
    for i in 0..N {
        for j in 0..i {
            covariance[i][j] = covariance[j][i];
        }
    }

    // Seed with the row of the channel with the largest variance.
    let mut seed = 0;
    for c in 1..N {
        if covariance[c][c] > covariance[seed][seed] {
            seed = c;
        }
    }
    if covariance[seed][seed] <= f32::EPSILON {
        return (mean, mean);
    }

    let mut axis = covariance[seed];
    for _ in 0..POWER_ITERATIONS {
        let mut next = [0.0f32; N];
        for (i, value) in next.iter_mut().enumerate() {
            *value = dot(&covariance[i], &axis);
        }
        let magnitude = next.iter().fold(0.0f32, |acc, &v| acc.max(abs(v)));
        if magnitude <= f32::EPSILON {
            break;
        }
        axis = next.map(|v| v / magnitude);
    }

    let length_sq = dot(&axis, &axis);
    if length_sq <= f32::EPSILON {
        return bounding_box(points);
    }

    let mut t_min = f32::MAX;
    let mut t_max = f32::MIN;
    for point in points {
        let mut offset = *point;
        for c in 0..N {
            offset[c] -= mean[c];
        }
        let t = dot(&offset, &axis) / length_sq;
        t_min = t_min.min(t);
        t_max = t_max.max(t);
    }

    let mut start = mean;
    let mut end = mean;
    for c in 0..N {
        start[c] += axis[c] * t_min;
        end[c] += axis[c] * t_max;
    }
    (start, end)
}

/// Solves for the endpoint pair that minimises the squared error of `points`, given the
/// position of each point between the endpoints.
///
/// Returns [`None`] when the positions do not constrain both endpoints
/// (e.g. every point uses the same palette entry).
pub(crate) fn least_squares<const N: usize>(
    points: &[[f32; N]],
    positions: &[f32],
) -> Option<([f32; N], [f32; N])> {
    let (mut aa, mut ab, mut bb) = (0.0f32, 0.0f32, 0.0f32);
    let mut ax = [0.0f32; N];
    let mut bx = [0.0f32; N];

    for (point, &t) in points.iter().zip(positions) {
        let s = 1.0 - t;
        aa += s * s;
        ab += s * t;
        bb += t * t;
        for c in 0..N {
            ax[c] += s * point[c];
            bx[c] += t * point[c];
        }
    }

    let determinant = aa * bb - ab * ab;
    if determinant <= 1e-6 {
        return None;
    }

    let mut start = [0.0f32; N];
    let mut end = [0.0f32; N];
    for c in 0..N {
        start[c] = (bb * ax[c] - ab * bx[c]) / determinant;
        end[c] = (aa * bx[c] - ab * ax[c]) / determinant;
    }
    Some((start, end))
}

/// Rounds `value` to the nearest integer in `0..=max`.
#[inline]
pub(crate) fn round_clamp(value: f32, max: u32) -> u32 {
    (value.clamp(0.0, max as f32) + 0.5) as u32
}

/// Squared euclidean distance.
#[inline]
pub(crate) fn distance_sq<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
    let mut sum = 0.0;
    for c in 0..N {
        let d = a[c] - b[c];
        sum += d * d;
    }
    sum
}

#[inline]
fn dot<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
    let mut sum = 0.0;
    for c in 0..N {
        sum += a[c] * b[c];
    }
    sum
}

#[inline]
fn abs(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

fn mean<const N: usize>(points: &[[f32; N]]) -> [f32; N] {
    let mut mean = [0.0f32; N];
    for point in points {
        for c in 0..N {
            mean[c] += point[c];
        }
    }
    let count = points.len().max(1) as f32;
    mean.map(|v| v / count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn line(count: usize, start: [f32; 3], step: [f32; 3]) -> Vec<[f32; 3]> {
        (0..count)
            .map(|i| {
                let t = i as f32;
                [
                    start[0] + step[0] * t,
                    start[1] + step[1] * t,
                    start[2] + step[2] * t,
                ]
            })
            .collect()
    }

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() < 0.5,
                "{actual:?} != {expected:?}"
            );
        }
    }

    #[test]
    fn principal_axis_recovers_line_extremes() {
        let points = line(16, [10.0, 200.0, 50.0], [4.0, -8.0, 2.0]);
        let (a, b) = principal_axis(&points);
        let (lo, hi) = if a[0] < b[0] { (a, b) } else { (b, a) };
        assert_close(lo, [10.0, 200.0, 50.0]);
        assert_close(hi, [70.0, 80.0, 80.0]);
    }

    #[test]
    fn bounding_box_follows_negative_correlation() {
        let points = line(16, [10.0, 200.0, 50.0], [4.0, -8.0, 2.0]);
        let (a, b) = bounding_box(&points);
        // Green is the dominant channel and falls while red and blue rise.
        assert_close(a, [70.0, 80.0, 80.0]);
        assert_close(b, [10.0, 200.0, 50.0]);
    }

    #[test]
    fn identical_points_collapse_to_a_single_endpoint() {
        let points = vec![[42.0, 42.0, 42.0]; 16];
        let (a, b) = principal_axis(&points);
        assert_eq!(a, b);
        assert_eq!(a, [42.0, 42.0, 42.0]);
    }

    #[test]
    fn least_squares_solves_exact_interpolation() {
        let start = [0.0, 100.0, 20.0];
        let end = [90.0, 10.0, 200.0];
        let positions = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
        let points: Vec<[f32; 3]> = positions
            .iter()
            .map(|&t| {
                [
                    start[0] + (end[0] - start[0]) * t,
                    start[1] + (end[1] - start[1]) * t,
                    start[2] + (end[2] - start[2]) * t,
                ]
            })
            .collect();

        let (a, b) = least_squares(&points, &positions).unwrap();
        assert_close(a, start);
        assert_close(b, end);
    }

    #[test]
    fn least_squares_rejects_degenerate_positions() {
        let points = vec![[1.0, 2.0, 3.0]; 4];
        assert!(least_squares(&points, &[0.5; 4]).is_none());
    }

    #[rstest]
    #[case(-3.0, 255, 0)]
    #[case(0.49, 255, 0)]
    #[case(0.5, 255, 1)]
    #[case(300.0, 255, 255)]
    #[case(1023.4, 1023, 1023)]
    fn round_clamp_saturates(#[case] value: f32, #[case] max: u32, #[case] expected: u32) {
        assert_eq!(round_clamp(value, max), expected);
    }
}
