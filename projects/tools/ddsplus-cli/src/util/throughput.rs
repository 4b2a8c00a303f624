use bytesize::ByteSize;
use std::fmt;

/// Bytes processed per second, printed as a human readable size.
#[derive(Debug, Clone, Copy)]
pub struct Throughput(pub ByteSize);

impl Throughput {
    /// Creates a new [`Throughput`] from a byte count and the seconds it took.
    pub fn new(bytes: u64, seconds: f64) -> Self {
        if seconds > 0.0 {
            Self(ByteSize((bytes as f64 / seconds) as u64))
        } else {
            Self(ByteSize(0))
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", self.0)
    }
}
