use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, Serializer};
use crate::shape::Shapes;

struct BoolVisitor;

impl Serialize for bool {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_bool(*self)
    }
}

impl Deserialize for bool {
    fn deserialize<A: Allocator, D: Deserializer>(_allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize(BoolVisitor)
    }
}

impl Visitor for BoolVisitor {
    type Value = bool;

    fn expecting(&self) -> Shapes {
        Shapes::BOOL
    }

    fn visit_bool<E: DeserializeError>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }
}
