use crate::error::Error;

/// This trait allows for reading bytes from a source.
///
/// This trait is used by the [`crate::stream::StreamDeserializer`] to read
/// from a plain byte stream.
pub trait Read {
    /// Read exactly as many bytes as fits in `bytes`.
    fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error>;

    /// Read exactly `len` bytes and return them as a slice.
    ///
    /// The slice is only valid until the stream is used again. Memory
    /// streams return a view of their buffer, other streams a view of an
    /// internal scratch buffer.
    fn read_slice(&mut self, len: usize) -> Result<&[u8], Error>;
}

/// This trait allows for writing bytes into a sink.
///
/// This trait is used by the [`crate::stream::StreamSerializer`] to write
/// into a plain byte stream.
pub trait Write {
    /// Write exactly as many bytes as there are in `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

impl<T: Read + ?Sized> Read for &mut T {
    fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        (**self).read(bytes)
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], Error> {
        (**self).read_slice(len)
    }
}

impl<T: Write + ?Sized> Write for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).write(bytes)
    }
}
