use alloc::string::String;
use alloc::vec::Vec;
use core::slice;

use num::{Float, PrimInt};

use super::{Value, VariantTag};
use crate::allocator::{Allocator, Global};
use crate::de::decode::{SequenceVisitor, StringVisitor};
use crate::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use crate::error::{DeserializeError, Error, ErrorKind};
use crate::shape::{Shape, Shapes};
use crate::variant::{Tag, TagRef};

/// Deserialize a `T` from a [`Value`] tree, allocating from the global heap.
pub fn from_value<T: Deserialize>(value: &Value) -> Result<T, Error> {
    from_value_in(&Global, value)
}

/// Deserialize a `T` from a [`Value`] tree, allocating from `allocator`.
pub fn from_value_in<T: Deserialize, A: Allocator>(allocator: &A, value: &Value) -> Result<T, Error> {
    T::deserialize(allocator, &mut ValueDeserializer::new(value))
}

/// A deserializer that reads a [`Value`] tree.
///
/// Strings are handed to visitors as slices of the tree, struct fields as
/// entries keyed by the field names.
#[derive(Debug, Clone, Copy)]
pub struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> ValueDeserializer<'de> {
    /// Create a deserializer for `value`.
    pub fn new(value: &'de Value) -> Self {
        Self { value }
    }
}

impl Deserializer for ValueDeserializer<'_> {
    type Error = Error;

    fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_null(),
            Value::Void => visitor.visit_void(),
            Value::Bool(value) => visitor.visit_bool(*value),
            Value::Int(value) => visitor.visit_int(*value),
            Value::Float(value) => visitor.visit_float(*value),
            Value::String(value) => visitor.visit_string(value),
            Value::Seq(elements) => visitor.visit_seq(&mut Elements { elements: elements.iter(), shape: Shape::Sequence }),
            Value::Tuple(elements) => visitor.visit_seq(&mut Elements { elements: elements.iter(), shape: Shape::Tuple }),
            Value::Map(entries) => visitor.visit_map(&mut Entries { entries: entries.iter(), pending: None }),
            Value::Struct { name, fields } => visitor.visit_map(&mut Fields { name, fields: fields.iter(), pending: None }),
            Value::Variant(tag) => visitor.visit_variant(TagRef::new(&tag.name, tag.ordinal)),
        }
    }

    fn deserialize_option<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Null => visitor.visit_null(),
            _ => visitor.visit_some(self),
        }
    }
}

//------------------------------------------------------------------------------
// Accessors
//------------------------------------------------------------------------------

struct Elements<'de> {
    elements: slice::Iter<'de, Value>,
    shape: Shape,
}

struct Entries<'de> {
    entries: slice::Iter<'de, (Value, Value)>,
    pending: Option<&'de Value>,
}

struct Fields<'de> {
    name: &'de str,
    fields: slice::Iter<'de, (String, Value)>,
    pending: Option<&'de Value>,
}

/// Presents a field name as a string.
struct FieldName<'de>(&'de str);

impl SeqAccess for Elements<'_> {
    type Error = Error;

    fn next_element<T: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<T>, Error> {
        match self.elements.next() {
            Some(element) => from_value_in(allocator, element).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.elements.len())
    }

    fn shape(&self) -> Shape {
        self.shape
    }
}

impl MapAccess for Entries<'_> {
    type Error = Error;

    fn next_key<K: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<K>, Error> {
        match self.entries.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                from_value_in(allocator, key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value<V: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<V, Error> {
        match self.pending.take() {
            Some(value) => from_value_in(allocator, value),
            None => Err(ErrorKind::UnexpectedEof.into()),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

impl MapAccess for Fields<'_> {
    type Error = Error;

    fn next_key<K: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<K>, Error> {
        match self.fields.next() {
            Some((name, value)) => {
                self.pending = Some(value);
                K::deserialize(allocator, &mut FieldName(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value<V: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<V, Error> {
        match self.pending.take() {
            Some(value) => from_value_in(allocator, value),
            None => Err(ErrorKind::UnexpectedEof.into()),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }

    fn shape(&self) -> Shape {
        Shape::Struct
    }

    fn name(&self) -> Option<&str> {
        Some(self.name)
    }
}

impl Deserializer for FieldName<'_> {
    type Error = Error;

    fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.0.as_bytes())
    }
}

//------------------------------------------------------------------------------
// Deserialize implementations
//------------------------------------------------------------------------------

struct ValueVisitor<'a, A> {
    allocator: &'a A,
}

impl Deserialize for Value {
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
        deserializer.deserialize(ValueVisitor { allocator })
    }

    fn release<A: Allocator>(self, allocator: &A) {
        match self {
            Value::String(bytes) => allocator.release(bytes),
            Value::Seq(elements) | Value::Tuple(elements) => elements.release(allocator),
            Value::Map(entries) => entries.release(allocator),
            Value::Struct { name, fields } => {
                name.release(allocator);
                fields.release(allocator);
            }
            Value::Variant(tag) => tag.name.release(allocator),
            Value::Null | Value::Void | Value::Bool(_) | Value::Int(_) | Value::Float(_) => (),
        }
    }
}

impl<A: Allocator> ValueVisitor<'_, A> {
    fn copy_str<E: DeserializeError>(&self, text: &str) -> Result<String, E> {
        let bytes = StringVisitor::<A, u8>::new(self.allocator).visit_string::<E>(text.as_bytes())?.into_vec();
        String::from_utf8(bytes).map_err(|error| {
            self.allocator.release(error.into_bytes());
            E::invalid_value(Shape::String)
        })
    }

    fn collect_entries<K, V, M>(&self, map: &mut M) -> Result<Vec<(K, V)>, M::Error>
    where
        K: Deserialize,
        V: Deserialize,
        M: MapAccess,
    {
        let mut entries = self.allocator.allocate::<(K, V)>(0)?;
        loop {
            let entry = match map.next_entry::<K, V, A>(self.allocator) {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(error) => {
                    entries.release(self.allocator);
                    return Err(error);
                }
            };
            if entries.len() == entries.capacity() {
                let additional = core::cmp::max(entries.len(), 4);
                if let Err(error) = self.allocator.grow(&mut entries, additional) {
                    entry.release(self.allocator);
                    entries.release(self.allocator);
                    return Err(error.into());
                }
            }
            entries.push(entry);
        }
        self.allocator.shrink(&mut entries);
        Ok(entries)
    }
}

impl<A: Allocator> Visitor for ValueVisitor<'_, A> {
    type Value = Value;

    fn expecting(&self) -> Shapes {
        Shapes::all()
    }

    fn visit_bool<E: DeserializeError>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_int<I: PrimInt, E: DeserializeError>(self, value: I) -> Result<Value, E> {
        value.to_i128().map(Value::Int).ok_or_else(|| E::invalid_value(Shape::Integer))
    }

    fn visit_float<F: Float, E: DeserializeError>(self, value: F) -> Result<Value, E> {
        value.to_f64().map(Value::Float).ok_or_else(|| E::invalid_value(Shape::Float))
    }

    fn visit_null<E: DeserializeError>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_void<E: DeserializeError>(self) -> Result<Value, E> {
        Ok(Value::Void)
    }

    fn visit_string<E: DeserializeError>(self, value: &[u8]) -> Result<Value, E> {
        let bytes = StringVisitor::<A, u8>::new(self.allocator).visit_string::<E>(value)?;
        Ok(Value::String(bytes.into_vec()))
    }

    fn visit_seq<S: SeqAccess>(self, seq: &mut S) -> Result<Value, S::Error> {
        let shape = seq.shape();
        let elements = Vec::from(SequenceVisitor::<Value, A>::new(self.allocator).visit_seq(seq)?);
        match shape {
            Shape::Tuple => Ok(Value::Tuple(elements)),
            _ => Ok(Value::Seq(elements)),
        }
    }

    fn visit_map<M: MapAccess>(self, map: &mut M) -> Result<Value, M::Error> {
        if map.shape() != Shape::Struct {
            return self.collect_entries::<Value, Value, M>(map).map(Value::Map);
        }
        let name = match map.name() {
            Some(name) => self.copy_str::<M::Error>(name)?,
            None => String::new(),
        };
        match self.collect_entries::<String, Value, M>(map) {
            Ok(fields) => Ok(Value::Struct { name, fields }),
            Err(error) => {
                name.release(self.allocator);
                Err(error)
            }
        }
    }

    fn visit_variant<T: Tag, E: DeserializeError>(self, tag: T) -> Result<Value, E> {
        let name = self.copy_str::<E>(tag.name())?;
        Ok(Value::Variant(VariantTag { name, ordinal: tag.ordinal() }))
    }
}
