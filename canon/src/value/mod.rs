//! An in-memory tree of canonical shapes.
//!
//! [`Value`] mirrors the data model one to one, which makes it a reference
//! backend: any [`Serialize`] type can be turned into a tree with
//! [`to_value`] and read back with [`from_value`].
//!
//! ```
//! use canon::value::{Value, from_value, to_value};
//!
//! let value = to_value(&(7u8, "seven"))?;
//! assert_eq!(value, Value::Tuple(vec![Value::Int(7), Value::String(b"seven".to_vec())]));
//! assert_eq!(from_value::<(u8, String)>(&value)?, (7, "seven".to_string()));
//! # Ok::<(), canon::Error>(())
//! ```

mod de;
mod ser;

use alloc::string::String;
use alloc::vec::Vec;

pub use de::{ValueDeserializer, from_value, from_value_in};
pub use ser::{ValueSerializer, to_value};

use crate::shape::Shape;

/// A value of any canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent value.
    Null,
    /// A value without content.
    Void,
    /// A [`bool`].
    Bool(bool),
    /// An integer. Unsigned integers beyond [`i128::MAX`] cannot be stored.
    Int(i128),
    /// A floating point number.
    Float(f64),
    /// The bytes of a string.
    String(Vec<u8>),
    /// A sequence.
    Seq(Vec<Value>),
    /// A tuple.
    Tuple(Vec<Value>),
    /// The entries of a map, in insertion order.
    Map(Vec<(Value, Value)>),
    /// A struct with its fields in declaration order.
    Struct {
        /// The name of the struct.
        name: String,
        /// The names and values of the fields.
        fields: Vec<(String, Value)>,
    },
    /// A member of an enumeration.
    Variant(VariantTag),
}

/// The member of an enumeration stored in a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantTag {
    /// The name of the member.
    pub name: String,
    /// The ordinal of the member.
    pub ordinal: usize,
}

impl Value {
    /// The shape of the value.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::Null,
            Value::Void => Shape::Void,
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Integer,
            Value::Float(_) => Shape::Float,
            Value::String(_) => Shape::String,
            Value::Seq(_) => Shape::Sequence,
            Value::Tuple(_) => Shape::Tuple,
            Value::Map(_) => Shape::Map,
            Value::Struct { .. } => Shape::Struct,
            Value::Variant(_) => Shape::Variant,
        }
    }
}
