use super::{IoChannel, MemoryChannelError};

/// A read-only channel over a byte slice, e.g. a memory mapped file.
#[derive(Debug, Clone)]
pub struct SliceChannel<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceChannel<'a> {
    /// Creates a channel positioned at the start of `data`.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The bytes not yet read.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.position..).unwrap_or(&[])
    }
}

impl IoChannel for SliceChannel<'_> {
    type Error = MemoryChannelError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.remaining();
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Ok(count)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<(), Self::Error> {
        Err(MemoryChannelError::ReadOnly)
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        // Seeking past the end is allowed; reads there return 0 bytes.
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
