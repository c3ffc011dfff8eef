use alloc::vec::Vec;

use crate::allocator::Allocator;
use crate::de::decode::{StrBuf, StringVisitor};
use crate::de::{Deserialize, Deserializer};
use crate::ser::{Serialize, Serializer};

/// An owned byte string.
///
/// Serialized as a string, without any requirement on the encoding of its
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bytes {
    buffer: StrBuf<u8>,
}

/// An owned byte string followed by a zero terminator.
///
/// The terminator is stored but is not part of the content, neither when
/// inspecting the value nor when serializing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerminatedBytes {
    buffer: StrBuf<u8>,
}

impl Bytes {
    /// The content.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Take the content.
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.into_vec()
    }
}

impl TerminatedBytes {
    /// The content without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// The content followed by the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.buffer.as_slice_with_terminator()
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self { buffer: StrBuf::from_vec(value.into(), false) }
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self { buffer: StrBuf::from_vec(value, false) }
    }
}

impl From<&[u8]> for TerminatedBytes {
    fn from(value: &[u8]) -> Self {
        let mut buffer = Vec::with_capacity(value.len() + 1);
        buffer.extend_from_slice(value);
        buffer.push(0);
        Self { buffer: StrBuf::from_vec(buffer, true) }
    }
}

impl core::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::ops::Deref for TerminatedBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

//------------------------------------------------------------------------------
// Serialization
//------------------------------------------------------------------------------

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.as_bytes())
    }
}

impl Deserialize for Bytes {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        let buffer = deserializer.deserialize(StringVisitor::<A, u8>::new(allocator))?;
        Ok(Self { buffer })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        self.buffer.release(allocator)
    }
}

impl Serialize for TerminatedBytes {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.as_bytes())
    }
}

impl Deserialize for TerminatedBytes {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        let buffer = deserializer.deserialize(StringVisitor::<A, u8>::terminated(allocator))?;
        Ok(Self { buffer })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        self.buffer.release(allocator)
    }
}
