use std::io::Read as _;
use std::vec::Vec;

use super::stream::{Read, Write};
use crate::error::{Error, ErrorKind};

/// Adapts a [`std::io::Read`] or [`std::io::Write`] object to the streams of
/// this crate.
///
/// Slices are read into an internal scratch buffer that grows with the data
/// actually read, not with the requested length. The scratch buffer lives on
/// the global heap, outside the budget of any [`crate::allocator::Allocator`].
/// Bound it with [`StdStream::max_slice`] when reading untrusted input.
#[derive(Debug)]
pub struct StdStream<S> {
    inner: S,
    scratch: Vec<u8>,
    max_slice: usize,
}

impl<S> StdStream<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner, scratch: Vec::new(), max_slice: usize::MAX }
    }

    /// Refuse slices longer than `len` bytes before reading any of them.
    pub fn max_slice(self, len: usize) -> Self {
        Self { max_slice: len, ..self }
    }

    /// Take the wrapped object.
    pub fn take(self) -> S {
        self.inner
    }
}

impl<S: std::io::Read> Read for StdStream<S> {
    fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        Ok(self.inner.read_exact(bytes)?)
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], Error> {
        if len > self.max_slice {
            log::debug!("slice of {len} bytes exceeds the limit of {}", self.max_slice);
            return Err(ErrorKind::LengthOverflow.into());
        }
        self.scratch.clear();
        let limit = u64::try_from(len).map_err(|_| ErrorKind::LengthOverflow)?;
        (&mut self.inner).take(limit).read_to_end(&mut self.scratch)?;
        if self.scratch.len() == len { Ok(&self.scratch) } else { Err(ErrorKind::UnexpectedEof.into()) }
    }
}

impl<S: std::io::Write> Write for StdStream<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        Ok(self.inner.write_all(bytes)?)
    }
}
