use alloc::string::String;
use alloc::vec::Vec;

use num::{Float, PrimInt};

use super::{Value, VariantTag};
use crate::error::{Error, SerializeError};
use crate::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple, Serializer, SerializerOutput};
use crate::shape::Shape;
use crate::variant::Tag;

/// Serialize `value` into a [`Value`] tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    value.serialize(&mut ValueSerializer)
}

/// A serializer that builds a [`Value`] tree.
///
/// Builders collect their members in memory. An abandoned builder simply
/// discards what it collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueSerializer;

/// The builder of sequences and tuples.
#[derive(Debug)]
pub struct ValueSeqBuilder {
    elements: Vec<Value>,
    tuple: bool,
}

/// The builder of maps.
#[derive(Debug)]
pub struct ValueMapBuilder {
    entries: Vec<(Value, Value)>,
}

/// The builder of structs.
#[derive(Debug)]
pub struct ValueStructBuilder {
    name: String,
    fields: Vec<(String, Value)>,
}

impl SerializerOutput for ValueSerializer {
    type Success = Value;
    type Error = Error;
}

impl Serializer for ValueSerializer {
    type SerializeSeq<'a> = ValueSeqBuilder;
    type SerializeTuple<'a> = ValueSeqBuilder;
    type SerializeMap<'a> = ValueMapBuilder;
    type SerializeStruct<'a> = ValueStructBuilder;

    fn serialize_bool(&mut self, value: bool) -> Result<Value, Error> {
        Ok(Value::Bool(value))
    }

    fn serialize_int<I: PrimInt>(&mut self, value: I) -> Result<Value, Error> {
        value.to_i128().map(Value::Int).ok_or_else(|| Error::unrepresentable(Shape::Integer))
    }

    fn serialize_float<F: Float>(&mut self, value: F) -> Result<Value, Error> {
        value.to_f64().map(Value::Float).ok_or_else(|| Error::unrepresentable(Shape::Float))
    }

    fn serialize_null(&mut self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_void(&mut self) -> Result<Value, Error> {
        Ok(Value::Void)
    }

    fn serialize_string(&mut self, value: &[u8]) -> Result<Value, Error> {
        Ok(Value::String(value.into()))
    }

    fn serialize_variant<T: Tag>(&mut self, tag: T) -> Result<Value, Error> {
        Ok(Value::Variant(VariantTag { name: tag.name().into(), ordinal: tag.ordinal() }))
    }

    fn serialize_seq(&mut self, len: Option<usize>) -> Result<ValueSeqBuilder, Error> {
        Ok(ValueSeqBuilder { elements: Vec::with_capacity(len.unwrap_or(0)), tuple: false })
    }

    fn serialize_tuple(&mut self, len: Option<usize>) -> Result<ValueSeqBuilder, Error> {
        Ok(ValueSeqBuilder { elements: Vec::with_capacity(len.unwrap_or(0)), tuple: true })
    }

    fn serialize_map(&mut self, len: Option<usize>) -> Result<ValueMapBuilder, Error> {
        Ok(ValueMapBuilder { entries: Vec::with_capacity(len.unwrap_or(0)) })
    }

    fn serialize_struct(&mut self, name: &str, fields: usize) -> Result<ValueStructBuilder, Error> {
        Ok(ValueStructBuilder { name: name.into(), fields: Vec::with_capacity(fields) })
    }
}

//------------------------------------------------------------------------------
// Builder implementations
//------------------------------------------------------------------------------

impl SerializerOutput for ValueSeqBuilder {
    type Success = Value;
    type Error = Error;
}

impl SerializeSeq for ValueSeqBuilder {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.elements.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Result<Value, Error> {
        match self.tuple {
            true => Ok(Value::Tuple(self.elements)),
            false => Ok(Value::Seq(self.elements)),
        }
    }
}

impl SerializeTuple for ValueSeqBuilder {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        SerializeSeq::serialize_element(self, value)
    }

    fn finish(self) -> Result<Value, Error> {
        SerializeSeq::finish(self)
    }
}

impl SerializerOutput for ValueMapBuilder {
    type Success = Value;
    type Error = Error;
}

impl SerializeMap for ValueMapBuilder {
    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Error>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.entries.push((to_value(key)?, to_value(value)?));
        Ok(())
    }

    fn finish(self) -> Result<Value, Error> {
        Ok(Value::Map(self.entries))
    }
}

impl SerializerOutput for ValueStructBuilder {
    type Success = Value;
    type Error = Error;
}

impl SerializeStruct for ValueStructBuilder {
    fn serialize_field<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), Error> {
        self.fields.push((name.into(), to_value(value)?));
        Ok(())
    }

    fn finish(self) -> Result<Value, Error> {
        Ok(Value::Struct { name: self.name, fields: self.fields })
    }
}

//------------------------------------------------------------------------------
// Serialize implementations
//------------------------------------------------------------------------------

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        match self {
            Value::Null => serializer.serialize_null(),
            Value::Void => serializer.serialize_void(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Int(value) => serializer.serialize_int(*value),
            Value::Float(value) => serializer.serialize_float(*value),
            Value::String(value) => serializer.serialize_string(value),
            Value::Seq(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.finish()
            }
            Value::Tuple(elements) => {
                let mut tuple = serializer.serialize_tuple(Some(elements.len()))?;
                for element in elements {
                    tuple.serialize_element(element)?;
                }
                tuple.finish()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.finish()
            }
            Value::Struct { name, fields } => {
                let mut builder = serializer.serialize_struct(name, fields.len())?;
                for (field, value) in fields {
                    builder.serialize_field(field, value)?;
                }
                builder.finish()
            }
            Value::Variant(tag) => serializer.serialize_variant(crate::variant::TagRef::new(&tag.name, tag.ordinal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn integers_are_widened() -> Result<(), Error> {
        assert_eq!(to_value(&-5i8)?, Value::Int(-5));
        assert_eq!(to_value(&u64::MAX)?, Value::Int(u64::MAX as i128));
        Ok(())
    }

    #[test]
    fn huge_unsigned_is_unrepresentable() {
        assert_eq!(to_value(&u128::MAX), Err(ErrorKind::InvalidValue(Shape::Integer).into()));
    }

    #[test]
    fn sequence_and_tuple_differ() -> Result<(), Error> {
        assert_eq!(to_value(&[1u8, 2])?, Value::Seq(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(to_value(&(1u8, 2u8))?, Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
        Ok(())
    }

    #[test]
    fn option() -> Result<(), Error> {
        assert_eq!(to_value(&None::<u8>)?, Value::Null);
        assert_eq!(to_value(&Some(3u8))?, Value::Int(3));
        Ok(())
    }

    #[test]
    fn abandoned_builder_leaves_no_trace() -> Result<(), Error> {
        let mut serializer = ValueSerializer;
        let mut seq = serializer.serialize_seq(None)?;
        SerializeSeq::serialize_element(&mut seq, &1u8)?;
        drop(seq);
        assert_eq!(serializer.serialize_bool(true)?, Value::Bool(true));
        Ok(())
    }
}
