use num::{Float, PrimInt};

use super::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use crate::allocator::Allocator;
use crate::error::DeserializeError;
use crate::shape::Shapes;
use crate::variant::Tag;

/// A value of any shape that is decoded and then thrown away.
///
/// Composites are read to their end, so the input is left right after the
/// value. Nothing is allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignored;

struct IgnoredVisitor<'a, A> {
    allocator: &'a A,
}

impl Deserialize for Ignored {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(IgnoredVisitor { allocator })
    }
}

impl<A: Allocator> Visitor for IgnoredVisitor<'_, A> {
    type Value = Ignored;

    fn expecting(&self) -> Shapes {
        Shapes::all()
    }

    fn visit_bool<E: DeserializeError>(self, _value: bool) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_int<I: PrimInt, E: DeserializeError>(self, _value: I) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_float<F: Float, E: DeserializeError>(self, _value: F) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_null<E: DeserializeError>(self) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_some<D: Deserializer>(self, deserializer: &mut D) -> Result<Ignored, D::Error> {
        deserializer.deserialize(self)
    }

    fn visit_void<E: DeserializeError>(self) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_string<E: DeserializeError>(self, _value: &[u8]) -> Result<Ignored, E> {
        Ok(Ignored)
    }

    fn visit_seq<S: SeqAccess>(self, seq: &mut S) -> Result<Ignored, S::Error> {
        while seq.next_element::<Ignored, A>(self.allocator)?.is_some() {}
        Ok(Ignored)
    }

    fn visit_map<M: MapAccess>(self, map: &mut M) -> Result<Ignored, M::Error> {
        while map.next_entry::<Ignored, Ignored, A>(self.allocator)?.is_some() {}
        Ok(Ignored)
    }

    fn visit_variant<T: Tag, E: DeserializeError>(self, _tag: T) -> Result<Ignored, E> {
        Ok(Ignored)
    }
}
