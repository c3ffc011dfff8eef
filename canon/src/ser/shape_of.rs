use num::{Float, PrimInt};

use super::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple, Serializer, SerializerOutput};
use crate::error::Error;
use crate::shape::Shape;
use crate::variant::Tag;

/// Report the [`Shape`] `value` serializes as.
///
/// Only the top-level call is observed; the members of composites are not
/// serialized.
///
/// ```
/// use canon::{Shape, ser::shape_of};
///
/// assert_eq!(shape_of(&42u8), Ok(Shape::Integer));
/// assert_eq!(shape_of("text"), Ok(Shape::String));
/// assert_eq!(shape_of(&[1, 2, 3]), Ok(Shape::Sequence));
/// ```
pub fn shape_of<T: Serialize + ?Sized>(value: &T) -> Result<Shape, Error> {
    value.serialize(&mut ShapeSerializer)
}

/// A serializer whose output is the shape of the serialized value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeSerializer;

/// The builder of every composite shape of the [`ShapeSerializer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBuilder(Shape);

impl SerializerOutput for ShapeSerializer {
    type Success = Shape;
    type Error = Error;
}

impl Serializer for ShapeSerializer {
    type SerializeSeq<'a> = ShapeBuilder;
    type SerializeTuple<'a> = ShapeBuilder;
    type SerializeMap<'a> = ShapeBuilder;
    type SerializeStruct<'a> = ShapeBuilder;

    fn serialize_bool(&mut self, _value: bool) -> Result<Shape, Error> {
        Ok(Shape::Bool)
    }

    fn serialize_int<I: PrimInt>(&mut self, _value: I) -> Result<Shape, Error> {
        Ok(Shape::Integer)
    }

    fn serialize_float<F: Float>(&mut self, _value: F) -> Result<Shape, Error> {
        Ok(Shape::Float)
    }

    fn serialize_null(&mut self) -> Result<Shape, Error> {
        Ok(Shape::Null)
    }

    fn serialize_void(&mut self) -> Result<Shape, Error> {
        Ok(Shape::Void)
    }

    fn serialize_string(&mut self, _value: &[u8]) -> Result<Shape, Error> {
        Ok(Shape::String)
    }

    fn serialize_variant<T: Tag>(&mut self, _tag: T) -> Result<Shape, Error> {
        Ok(Shape::Variant)
    }

    fn serialize_seq(&mut self, _len: Option<usize>) -> Result<ShapeBuilder, Error> {
        Ok(ShapeBuilder(Shape::Sequence))
    }

    fn serialize_tuple(&mut self, _len: Option<usize>) -> Result<ShapeBuilder, Error> {
        Ok(ShapeBuilder(Shape::Tuple))
    }

    fn serialize_map(&mut self, _len: Option<usize>) -> Result<ShapeBuilder, Error> {
        Ok(ShapeBuilder(Shape::Map))
    }

    fn serialize_struct(&mut self, _name: &str, _fields: usize) -> Result<ShapeBuilder, Error> {
        Ok(ShapeBuilder(Shape::Struct))
    }
}

impl SerializerOutput for ShapeBuilder {
    type Success = Shape;
    type Error = Error;
}

impl SerializeSeq for ShapeBuilder {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<(), Error> {
        Ok(())
    }

    fn finish(self) -> Result<Shape, Error> {
        Ok(self.0)
    }
}

impl SerializeTuple for ShapeBuilder {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, _value: &T) -> Result<(), Error> {
        Ok(())
    }

    fn finish(self) -> Result<Shape, Error> {
        Ok(self.0)
    }
}

impl SerializeMap for ShapeBuilder {
    fn serialize_entry<K, V>(&mut self, _key: &K, _value: &V) -> Result<(), Error>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        Ok(())
    }

    fn finish(self) -> Result<Shape, Error> {
        Ok(self.0)
    }
}

impl SerializeStruct for ShapeBuilder {
    fn serialize_field<T: Serialize + ?Sized>(&mut self, _name: &str, _value: &T) -> Result<(), Error> {
        Ok(())
    }

    fn finish(self) -> Result<Shape, Error> {
        Ok(self.0)
    }
}
