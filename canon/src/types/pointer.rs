#[cfg(feature = "alloc")]
use alloc::boxed::Box;

#[cfg(feature = "alloc")]
use crate::allocator::Allocator;
#[cfg(feature = "alloc")]
use crate::de::{Deserialize, Deserializer};
use crate::ser::{Serialize, Serializer};

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        (**self).serialize(serializer)
    }
}

impl<T: Serialize + ?Sized> Serialize for &mut T {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        (**self).serialize(serializer)
    }
}

#[cfg(feature = "alloc")]
impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        (**self).serialize(serializer)
    }
}

#[cfg(feature = "alloc")]
impl<T: Deserialize> Deserialize for Box<T> {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        T::deserialize(allocator, deserializer).map(Box::new)
    }

    fn release<A: Allocator>(self, allocator: &A) {
        (*self).release(allocator)
    }
}
