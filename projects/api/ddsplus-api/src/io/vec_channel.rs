use super::{IoChannel, MemoryChannelError};
use alloc::vec::Vec;

/// A growable in-memory channel.
///
/// Writes overwrite existing bytes at the current position and extend the buffer as needed;
/// writing after seeking past the end zero fills the gap.
#[derive(Debug, Clone, Default)]
pub struct VecChannel {
    data: Vec<u8>,
    position: usize,
}

impl VecChannel {
    /// Creates an empty channel.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            position: 0,
        }
    }

    /// Creates a channel over existing bytes, positioned at the start.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    /// Everything written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the channel, returning its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl IoChannel for VecChannel {
    type Error = MemoryChannelError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.get(self.position..).unwrap_or(&[]);
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Ok(count)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        let end = self
            .position
            .checked_add(buf.len())
            .ok_or(MemoryChannelError::PositionOutOfRange(self.position as u64))?;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(buf);
        self.position = end;
        Ok(())
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        self.position = usize::try_from(position)
            .map_err(|_| MemoryChannelError::PositionOutOfRange(position))?;
        Ok(())
    }

    fn position(&mut self) -> Result<u64, Self::Error> {
        Ok(self.position as u64)
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        Ok(self.data.len() as u64)
    }
}
