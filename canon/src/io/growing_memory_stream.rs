use super::stream::{Read, Write};
use crate::error::{Error, ErrorKind};
use alloc::vec::Vec;

/// A stream with an in-memory buffer that grows on demand.
///
/// Writes append to the end of the buffer. Reads start at the beginning of
/// the buffer and fail past its end. There is no limit on the size of the
/// buffer.
#[derive(Debug, Default)]
pub struct GrowingMemoryStream {
    buffer: Vec<u8>,
    read_pos: usize,
}

impl GrowingMemoryStream {
    /// Create a stream with a zero-sized buffer.
    pub fn new() -> Self {
        Self { buffer: Vec::new(), read_pos: 0 }
    }

    /// Take the buffer of the stream.
    pub fn take(self) -> Vec<u8> {
        self.buffer
    }

    /// The number of bytes read so far.
    pub fn position(&self) -> usize {
        self.read_pos
    }

    fn range(&self, len: usize) -> Result<core::ops::Range<usize>, Error> {
        match self.read_pos.checked_add(len) {
            Some(end) if end <= self.buffer.len() => Ok(self.read_pos..end),
            _ => Err(ErrorKind::UnexpectedEof.into()),
        }
    }
}

impl From<Vec<u8>> for GrowingMemoryStream {
    fn from(value: Vec<u8>) -> Self {
        Self { buffer: value, read_pos: 0 }
    }
}

impl From<&[u8]> for GrowingMemoryStream {
    fn from(value: &[u8]) -> Self {
        Self { buffer: value.into(), read_pos: 0 }
    }
}

impl Read for GrowingMemoryStream {
    fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        let range = self.range(bytes.len())?;
        bytes.copy_from_slice(&self.buffer[range]);
        self.read_pos += bytes.len();
        Ok(())
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], Error> {
        let range = self.range(len)?;
        self.read_pos += len;
        Ok(&self.buffer[range])
    }
}

impl Write for GrowingMemoryStream {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newly_created() {
        let stream = GrowingMemoryStream::from(vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.take(), [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn read_well_within_bounds() -> Result<(), Error> {
        let mut stream = GrowingMemoryStream::from(vec![1, 2, 3, 4, 5, 6, 7]);
        let mut values = [0u8; 3];
        stream.read(&mut values)?;
        assert_eq!(stream.position(), 3);
        assert_eq!(values, [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn read_outside_bounds() {
        let mut stream = GrowingMemoryStream::from(vec![1, 2, 3, 4, 5, 6, 7]);
        let mut values = [0u8; 8];
        assert_eq!(stream.read(&mut values), Err(ErrorKind::UnexpectedEof.into()));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn read_slice() -> Result<(), Error> {
        let mut stream = GrowingMemoryStream::from(&[1u8, 2, 3][..]);
        assert_eq!(stream.read_slice(2)?, [1, 2]);
        assert_eq!(stream.read_slice(2), Err(ErrorKind::UnexpectedEof.into()));
        Ok(())
    }

    #[test]
    fn write_appends() -> Result<(), Error> {
        let mut stream = GrowingMemoryStream::from(vec![1, 2]);
        stream.write(&[3, 4])?;
        stream.write(&[])?;
        stream.write(&[5])?;
        assert_eq!(stream.take(), [1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn read_after_write() -> Result<(), Error> {
        let mut stream = GrowingMemoryStream::new();
        stream.write(&[9, 8])?;
        let mut values = [0u8; 2];
        stream.read(&mut values)?;
        assert_eq!(values, [9, 8]);
        Ok(())
    }
}
