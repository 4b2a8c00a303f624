use super::IoChannel;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// A channel over any `std::io` stream, e.g. a [`File`](std::fs::File).
#[derive(Debug)]
pub struct StreamChannel<S> {
    stream: S,
}

impl<S> StreamChannel<S> {
    /// Wraps `stream`.
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write + Seek> IoChannel for StreamChannel<S> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.stream.write_all(buf)
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        self.stream.seek(SeekFrom::Start(position)).map(|_| ())
    }

    fn position(&mut self) -> Result<u64, Self::Error> {
        self.stream.stream_position()
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        let position = self.stream.stream_position()?;
        let size = self.stream.seek(SeekFrom::End(0))?;
        self.stream.seek(SeekFrom::Start(position))?;
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn size_keeps_the_position() {
        let mut channel = StreamChannel::new(Cursor::new(vec![0u8; 10]));
        channel.seek(4).unwrap();
        assert_eq!(channel.size().unwrap(), 10);
        assert_eq!(channel.position().unwrap(), 4);
    }

    #[test]
    fn writes_go_to_the_stream() {
        let mut channel = StreamChannel::new(Cursor::new(Vec::new()));
        channel.write(b"DDS ").unwrap();
        assert_eq!(channel.into_inner().into_inner(), b"DDS ");
    }
}
