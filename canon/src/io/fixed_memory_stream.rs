use super::stream::{Read, Write};
use crate::error::{Error, ErrorKind};

/// A stream with an in-memory buffer that has a fixed size.
///
/// You may pass a vector, an in-memory slice, or a memory mapped file, mutable or not.
/// The size of the buffer will never be changed, even if the type you passed is
/// resizable. Reads and writes outside the buffer will result in an error.
#[derive(Debug)]
pub struct FixedMemoryStream<Buffer> {
    buffer: Buffer,
    stream_pos: usize,
}

impl<Buffer> FixedMemoryStream<Buffer> {
    /// Create a stream from the given buffer.
    pub fn new(buffer: Buffer) -> Self {
        Self { buffer, stream_pos: 0 }
    }

    /// The number of bytes read or written so far.
    pub fn position(&self) -> usize {
        self.stream_pos
    }

    /// Take the buffer of the stream.
    pub fn take(self) -> Buffer {
        self.buffer
    }
}

impl<Buffer: AsRef<[u8]>> FixedMemoryStream<Buffer> {
    /// The bytes that have been written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.stream_pos]
    }

    fn range(&self, len: usize) -> Result<core::ops::Range<usize>, Error> {
        match self.stream_pos.checked_add(len) {
            Some(end) if end <= self.buffer.as_ref().len() => Ok(self.stream_pos..end),
            _ => Err(ErrorKind::UnexpectedEof.into()),
        }
    }
}

impl<Buffer: AsRef<[u8]>> Read for FixedMemoryStream<Buffer> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        let range = self.range(bytes.len())?;
        bytes.copy_from_slice(&self.buffer.as_ref()[range]);
        self.stream_pos += bytes.len();
        Ok(())
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], Error> {
        let range = self.range(len)?;
        self.stream_pos += len;
        Ok(&self.buffer.as_ref()[range])
    }
}

impl<Buffer: AsRef<[u8]> + AsMut<[u8]>> Write for FixedMemoryStream<Buffer> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let range = self.range(bytes.len())?;
        self.buffer.as_mut()[range].copy_from_slice(bytes);
        self.stream_pos += bytes.len();
        Ok(())
    }
}
