use num::{Float, PrimInt};

use super::Serialize;
use crate::error::SerializeError;
use crate::variant::Tag;

/// A helper trait to define the types a [`Serializer`] and its builders
/// return on success and error.
pub trait SerializerOutput {
    /// The type returned if serialization succeeded.
    type Success;
    /// The type returned if serialization failed.
    type Error: SerializeError;
}

/// Serializers accept one value of each canonical shape and turn it into
/// their output format.
///
/// Scalar shapes are serialized by a single call. Composite shapes return a
/// builder that borrows the serializer. The builder accumulates the members
/// and must be finished to produce the result; dropping it unfinished
/// abandons the composite. What abandoning means for the output is up to the
/// backend, but it must never be mistaken for a complete composite.
///
/// The integer, float and variant methods only accept arguments of the
/// matching kind, which is enforced by their bounds.
pub trait Serializer: SerializerOutput + Sized {
    /// The builder returned by [`Serializer::serialize_seq`].
    type SerializeSeq<'a>: SerializeSeq<Success = Self::Success, Error = Self::Error>
    where
        Self: 'a;

    /// The builder returned by [`Serializer::serialize_tuple`].
    type SerializeTuple<'a>: SerializeTuple<Success = Self::Success, Error = Self::Error>
    where
        Self: 'a;

    /// The builder returned by [`Serializer::serialize_map`].
    type SerializeMap<'a>: SerializeMap<Success = Self::Success, Error = Self::Error>
    where
        Self: 'a;

    /// The builder returned by [`Serializer::serialize_struct`].
    type SerializeStruct<'a>: SerializeStruct<Success = Self::Success, Error = Self::Error>
    where
        Self: 'a;

    /// Serialize a [`bool`] value.
    fn serialize_bool(&mut self, value: bool) -> Result<Self::Success, Self::Error>;

    /// Serialize an integer of any width and signedness.
    fn serialize_int<I: PrimInt>(&mut self, value: I) -> Result<Self::Success, Self::Error>;

    /// Serialize a floating point number of any width.
    fn serialize_float<F: Float>(&mut self, value: F) -> Result<Self::Success, Self::Error>;

    /// Serialize the absence of a value.
    fn serialize_null(&mut self) -> Result<Self::Success, Self::Error>;

    /// Serialize a value without content.
    fn serialize_void(&mut self) -> Result<Self::Success, Self::Error>;

    /// Serialize a string, given as the bytes of its content.
    fn serialize_string(&mut self, value: &[u8]) -> Result<Self::Success, Self::Error>;

    /// Serialize a member of an enumeration.
    ///
    /// Any [`crate::Variant`] is a tag of itself.
    fn serialize_variant<T: Tag>(&mut self, tag: T) -> Result<Self::Success, Self::Error>;

    /// Serialize the payload of a present optional value.
    ///
    /// Formats that cannot distinguish a present value from its payload keep
    /// the default, which serializes the payload itself.
    fn serialize_some<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Self::Success, Self::Error> {
        value.serialize(self)
    }

    /// Begin a sequence of `len` elements, if known.
    fn serialize_seq(&mut self, len: Option<usize>) -> Result<Self::SerializeSeq<'_>, Self::Error>;

    /// Begin a tuple of `len` elements, if known.
    fn serialize_tuple(&mut self, len: Option<usize>) -> Result<Self::SerializeTuple<'_>, Self::Error>;

    /// Begin a map of `len` entries, if known.
    fn serialize_map(&mut self, len: Option<usize>) -> Result<Self::SerializeMap<'_>, Self::Error>;

    /// Begin the struct `name` with `fields` fields.
    fn serialize_struct(&mut self, name: &str, fields: usize) -> Result<Self::SerializeStruct<'_>, Self::Error>;
}

/// The builder of a sequence.
pub trait SerializeSeq: SerializerOutput + Sized {
    /// Append an element.
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>;

    /// Commit the sequence.
    fn finish(self) -> Result<Self::Success, Self::Error>;
}

/// The builder of a tuple.
pub trait SerializeTuple: SerializerOutput + Sized {
    /// Append the next element.
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>;

    /// Commit the tuple.
    fn finish(self) -> Result<Self::Success, Self::Error>;
}

/// The builder of a map.
pub trait SerializeMap: SerializerOutput + Sized {
    /// Append an entry.
    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Self::Error>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized;

    /// Commit the map.
    fn finish(self) -> Result<Self::Success, Self::Error>;
}

/// The builder of a struct.
pub trait SerializeStruct: SerializerOutput + Sized {
    /// Append the field `name`.
    fn serialize_field<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), Self::Error>;

    /// Commit the struct.
    fn finish(self) -> Result<Self::Success, Self::Error>;
}
