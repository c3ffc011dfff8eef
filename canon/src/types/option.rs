use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, Serializer};
use crate::shape::Shapes;

struct OptionVisitor<'a, T, A> {
    allocator: &'a A,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize> Serialize for Option<T> {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        match self {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_null(),
        }
    }
}

impl<T: Deserialize> Deserialize for Option<T> {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(OptionVisitor::<T, A> { allocator, _value: PhantomData })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        if let Some(value) = self {
            value.release(allocator)
        }
    }
}

impl<T: Deserialize, A: Allocator> Visitor for OptionVisitor<'_, T, A> {
    type Value = Option<T>;

    fn expecting(&self) -> Shapes {
        Shapes::NULL
    }

    fn visit_null<E: DeserializeError>(self) -> Result<Option<T>, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer>(self, deserializer: &mut D) -> Result<Option<T>, D::Error> {
        T::deserialize(self.allocator, deserializer).map(Some)
    }
}
