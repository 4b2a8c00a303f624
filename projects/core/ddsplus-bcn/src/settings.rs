//! Per-block encoder settings.

use crate::metric::ErrorMetric;
use derive_enum_all_values::AllValues;

/// How much effort the encoder spends searching for block endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum CompressionSpeed {
    /// Bounding box endpoints.
    Fast,
    /// Principal axis endpoints.
    #[default]
    Normal,
    /// Principal axis and bounding box candidates, refined with least squares.
    Slow,
}

/// Settings handed to a [`BlockCompressor`](crate::BlockCompressor) for every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockSettings {
    /// Distance function used when comparing candidate encodings.
    pub error_metric: ErrorMetric,
    /// Endpoint search effort.
    pub speed: CompressionSpeed,
}

impl BlockSettings {
    /// Creates a new [`BlockSettings`].
    pub const fn new(error_metric: ErrorMetric, speed: CompressionSpeed) -> Self {
        Self {
            error_metric,
            speed,
        }
    }
}
