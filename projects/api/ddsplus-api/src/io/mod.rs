//! Byte level access to the host's storage.
//!
//! The pipelines never open files; every byte goes through an [`IoChannel`]. The encode
//! pipeline only writes, sequentially, one header followed by one write per level. The
//! decode pipeline reads, queries the size, and seeks forward.

mod slice_channel;
#[cfg(feature = "std")]
mod stream_channel;
mod vec_channel;

pub use slice_channel::SliceChannel;
#[cfg(feature = "std")]
pub use stream_channel::StreamChannel;
pub use vec_channel::VecChannel;

use thiserror::Error;

/// A seekable byte stream supplied by the host.
pub trait IoChannel {
    /// The error type of the underlying stream. Surfaced verbatim in
    /// [`SaveError::Io`](crate::SaveError::Io) and [`LoadError::Io`](crate::LoadError::Io).
    type Error: core::fmt::Debug;

    /// Reads up to `buf.len()` bytes, returning how many were read.
    ///
    /// Returns 0 only at the end of the stream (or for an empty `buf`).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Writes all of `buf` at the current position.
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Moves to the absolute `position`.
    fn seek(&mut self, position: u64) -> Result<(), Self::Error>;

    /// The current absolute position.
    fn position(&mut self) -> Result<u64, Self::Error>;

    /// The total length of the stream.
    fn size(&mut self) -> Result<u64, Self::Error>;

    /// Reads until `buf` is full or the stream ends, returning how many bytes were read.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => break,
                read => filled += read,
            }
        }
        Ok(filled)
    }
}

impl<T: IoChannel + ?Sized> IoChannel for &mut T {
    type Error = T::Error;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }

    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        (**self).write(buf)
    }

    #[inline]
    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        (**self).seek(position)
    }

    #[inline]
    fn position(&mut self) -> Result<u64, Self::Error> {
        (**self).position()
    }

    #[inline]
    fn size(&mut self) -> Result<u64, Self::Error> {
        (**self).size()
    }
}

/// Errors raised by the in-memory channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryChannelError {
    /// Attempted to write to a [`SliceChannel`].
    #[error("Channel is read-only")]
    ReadOnly,

    /// A seek or write would move past the addressable range.
    #[error("Position {0} is out of range")]
    PositionOutOfRange(u64),
}
