use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, Serializer};
use crate::shape::Shapes;

struct UnitVisitor;

impl Serialize for () {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        serializer.serialize_void()
    }
}

impl Deserialize for () {
    fn deserialize<A: Allocator, D: Deserializer>(_allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize(UnitVisitor)
    }
}

impl Visitor for UnitVisitor {
    type Value = ();

    fn expecting(&self) -> Shapes {
        Shapes::VOID
    }

    fn visit_void<E: DeserializeError>(self) -> Result<(), E> {
        Ok(())
    }
}
