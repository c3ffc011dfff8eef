use crate::ser::{Serialize, SerializeSeq, Serializer};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

#[cfg(feature = "alloc")]
use crate::allocator::Allocator;
#[cfg(feature = "alloc")]
use crate::de::decode::SequenceVisitor;
#[cfg(feature = "alloc")]
use crate::de::{Deserialize, Deserializer};

impl<T: Serialize> Serialize for [T] {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.finish()
    }
}

impl<T: Serialize, const N: usize> Serialize for [T; N] {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

#[cfg(feature = "alloc")]
impl<T: Serialize> Serialize for Vec<T> {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

#[cfg(feature = "alloc")]
impl<T: Deserialize> Deserialize for Box<[T]> {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize(SequenceVisitor::<T, A>::new(allocator))
    }

    fn release<A: Allocator>(self, allocator: &A) {
        Vec::from(self).release(allocator)
    }
}

#[cfg(feature = "alloc")]
impl<T: Deserialize> Deserialize for Vec<T> {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        Box::<[T]>::deserialize(allocator, deserializer).map(Vec::from)
    }

    fn release<A: Allocator>(mut self, allocator: &A) {
        for element in self.drain(..) {
            element.release(allocator);
        }
        allocator.release(self)
    }
}
