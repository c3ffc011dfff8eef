use crate::ser::{Serialize, Serializer};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, ffi::CString, string::String};

#[cfg(feature = "alloc")]
use crate::allocator::Allocator;
#[cfg(feature = "alloc")]
use crate::de::decode::StringVisitor;
#[cfg(feature = "alloc")]
use crate::de::{Deserialize, Deserializer};
#[cfg(feature = "alloc")]
use crate::error::DeserializeError;
#[cfg(feature = "alloc")]
use crate::shape::Shape;

impl Serialize for str {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.as_bytes())
    }
}

impl Serialize for core::ffi::CStr {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.to_bytes())
    }
}

#[cfg(feature = "alloc")]
impl Serialize for String {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.as_bytes())
    }
}

#[cfg(feature = "alloc")]
impl Deserialize for String {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize(StringVisitor::<A, u8>::new(allocator))?.into_vec();
        String::from_utf8(bytes).map_err(|error| {
            allocator.release(error.into_bytes());
            D::Error::invalid_value(Shape::String)
        })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        allocator.release(self.into_bytes())
    }
}

#[cfg(feature = "alloc")]
impl Deserialize for Box<str> {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        String::deserialize(allocator, deserializer).map(String::into_boxed_str)
    }

    fn release<A: Allocator>(self, allocator: &A) {
        String::from(self).release(allocator)
    }
}

#[cfg(feature = "alloc")]
impl Serialize for CString {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_string(self.as_bytes())
    }
}

/// Interior zero bytes are an invalid value.
#[cfg(feature = "alloc")]
impl Deserialize for CString {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize(StringVisitor::<A, u8>::terminated(allocator))?.into_vec();
        CString::from_vec_with_nul(bytes).map_err(|error| {
            allocator.release(error.into_bytes());
            D::Error::invalid_value(Shape::String)
        })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        allocator.release(self.into_bytes_with_nul())
    }
}
