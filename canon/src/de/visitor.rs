use num::{Float, PrimInt};

use super::{Deserializer, MapAccess, SeqAccess};
use crate::error::DeserializeError;
use crate::shape::{Shape, Shapes};
use crate::variant::Tag;

/// Turns the normalized input of a [`Deserializer`] into a value.
///
/// A visitor declares the shapes it supports through [`Visitor::expecting`]
/// and overrides the matching `visit_*` methods. The remaining methods fail
/// with an invalid type error naming the expected shapes and the shape that
/// was actually found.
///
/// ```
/// use canon::de::Visitor;
/// use canon::error::DeserializeError;
/// use canon::{Shape, Shapes};
///
/// struct Parity;
///
/// impl Visitor for Parity {
///     type Value = bool;
///
///     fn expecting(&self) -> Shapes {
///         Shapes::INTEGER
///     }
///
///     fn visit_int<I: num::PrimInt, E: DeserializeError>(self, value: I) -> Result<bool, E> {
///         Ok(value.count_ones() % 2 == 0)
///     }
/// }
///
/// assert_eq!(Parity.visit_int::<u8, canon::Error>(3), Ok(true));
/// assert!(Parity.visit_bool::<canon::Error>(true).is_err());
/// ```
pub trait Visitor: Sized {
    /// The type of the decoded value.
    type Value;

    /// The shapes this visitor accepts.
    fn expecting(&self) -> Shapes;

    /// The input is a [`bool`].
    fn visit_bool<E: DeserializeError>(self, value: bool) -> Result<Self::Value, E> {
        let _ = value;
        Err(E::invalid_type(self.expecting(), Shape::Bool))
    }

    /// The input is an integer.
    fn visit_int<I: PrimInt, E: DeserializeError>(self, value: I) -> Result<Self::Value, E> {
        let _ = value;
        Err(E::invalid_type(self.expecting(), Shape::Integer))
    }

    /// The input is a floating point number.
    fn visit_float<F: Float, E: DeserializeError>(self, value: F) -> Result<Self::Value, E> {
        let _ = value;
        Err(E::invalid_type(self.expecting(), Shape::Float))
    }

    /// The input is absent.
    fn visit_null<E: DeserializeError>(self) -> Result<Self::Value, E> {
        Err(E::invalid_type(self.expecting(), Shape::Null))
    }

    /// The input is a present optional value, still to be read from
    /// `deserializer`.
    ///
    /// Only called by [`Deserializer::deserialize_option`]. The default
    /// visits the payload itself.
    fn visit_some<D: Deserializer>(self, deserializer: &mut D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize(self)
    }

    /// The input is a value without content.
    fn visit_void<E: DeserializeError>(self) -> Result<Self::Value, E> {
        Err(E::invalid_type(self.expecting(), Shape::Void))
    }

    /// The input is a string. The bytes are borrowed from the input only for
    /// the duration of the call.
    fn visit_string<E: DeserializeError>(self, value: &[u8]) -> Result<Self::Value, E> {
        let _ = value;
        Err(E::invalid_type(self.expecting(), Shape::String))
    }

    /// The input is a sequence or a tuple, see [`SeqAccess::shape`].
    fn visit_seq<S: SeqAccess>(self, seq: &mut S) -> Result<Self::Value, S::Error> {
        Err(S::Error::invalid_type(self.expecting(), seq.shape()))
    }

    /// The input is a map or a struct, see [`MapAccess::shape`].
    fn visit_map<M: MapAccess>(self, map: &mut M) -> Result<Self::Value, M::Error> {
        Err(M::Error::invalid_type(self.expecting(), map.shape()))
    }

    /// The input is a member of an enumeration.
    fn visit_variant<T: Tag, E: DeserializeError>(self, tag: T) -> Result<Self::Value, E> {
        let _ = tag;
        Err(E::invalid_type(self.expecting(), Shape::Variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    struct Flag;

    impl Visitor for Flag {
        type Value = bool;

        fn expecting(&self) -> Shapes {
            Shapes::BOOL
        }

        fn visit_bool<E: DeserializeError>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }
    }

    #[test]
    fn overridden_method() {
        assert_eq!(Flag.visit_bool::<Error>(true), Ok(true));
    }

    #[test]
    fn default_method_names_shapes() {
        assert_eq!(
            Flag.visit_string::<Error>(b"true"),
            Err(ErrorKind::InvalidType { expected: Shapes::BOOL, actual: Shape::String }.into())
        );
        assert_eq!(
            Flag.visit_float::<f32, Error>(1.0),
            Err(ErrorKind::InvalidType { expected: Shapes::BOOL, actual: Shape::Float }.into())
        );
        assert_eq!(Flag.visit_void::<Error>(), Err(ErrorKind::InvalidType { expected: Shapes::BOOL, actual: Shape::Void }.into()));
    }
}
