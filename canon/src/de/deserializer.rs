use super::{Deserialize, Visitor};
use crate::allocator::Allocator;
use crate::error::DeserializeError;
use crate::shape::Shape;

/// Deserializers present their input to a [`Visitor`].
///
/// For every value, the deserializer determines the input's [`Shape`] and
/// calls the matching `visit_*` method exactly once. The value returned by
/// the visitor is passed back to the caller, and so is any error, unchanged.
pub trait Deserializer: Sized {
    /// The error type returned upon deserialization failure.
    type Error: DeserializeError;

    /// Drive `visitor` with the next value of the input.
    fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Self::Error>;

    /// Drive `visitor` with the next value, which may be absent.
    ///
    /// Backends that represent absence call [`Visitor::visit_null`] for an
    /// absent value and [`Visitor::visit_some`] otherwise. The default treats
    /// the value like any other.
    fn deserialize_option<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize(visitor)
    }
}

/// Gives a [`Visitor`] access to the elements of a sequence or tuple.
pub trait SeqAccess {
    /// The error type returned upon deserialization failure.
    type Error: DeserializeError;

    /// Decode the next element, or return `None` at the end of the sequence.
    fn next_element<T: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<T>, Self::Error>;

    /// The number of remaining elements, if known.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Whether the input is a [`Shape::Sequence`] or a [`Shape::Tuple`].
    fn shape(&self) -> Shape {
        Shape::Sequence
    }
}

/// Gives a [`Visitor`] access to the entries of a map or struct.
///
/// Struct fields are presented as entries whose keys are the field names.
pub trait MapAccess {
    /// The error type returned upon deserialization failure.
    type Error: DeserializeError;

    /// Decode the next key, or return `None` at the end of the map.
    fn next_key<K: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<K>, Self::Error>;

    /// Decode the value belonging to the key returned last.
    fn next_value<V: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<V, Self::Error>;

    /// Decode the next entry, or return `None` at the end of the map.
    fn next_entry<K, V, A>(&mut self, allocator: &A) -> Result<Option<(K, V)>, Self::Error>
    where
        K: Deserialize,
        V: Deserialize,
        A: Allocator,
    {
        let Some(key) = self.next_key::<K, A>(allocator)? else {
            return Ok(None);
        };
        match self.next_value::<V, A>(allocator) {
            Ok(value) => Ok(Some((key, value))),
            Err(error) => {
                key.release(allocator);
                Err(error)
            }
        }
    }

    /// The number of remaining entries, if known.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Whether the input is a [`Shape::Map`] or a [`Shape::Struct`].
    fn shape(&self) -> Shape {
        Shape::Map
    }

    /// The name of the struct, if the input carries one.
    fn name(&self) -> Option<&str> {
        None
    }
}

impl<D: Deserializer> Deserializer for &mut D {
    type Error = D::Error;

    fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Self::Error> {
        (**self).deserialize(visitor)
    }

    fn deserialize_option<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Self::Error> {
        (**self).deserialize_option(visitor)
    }
}
