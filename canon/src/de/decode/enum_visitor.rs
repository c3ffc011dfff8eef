use core::marker::PhantomData;

use num::PrimInt;

use crate::de::Visitor;
use crate::error::DeserializeError;
use crate::shape::Shapes;
use crate::variant::{Tag, Variant};

/// Resolves a member of the enumeration `T` from an ordinal, a name or a
/// variant tag.
///
/// - An integer is the ordinal of the member. Ordinals without a member,
///   including negative ones, are an unknown ordinal error.
/// - A string is the exact, case-sensitive name of the member, otherwise an
///   unknown variant error.
/// - A tag typed as `T` is the member itself. Any other tag is resolved by
///   its name.
///
/// ```
/// use canon::Variant;
/// use canon::de::{Visitor, decode::EnumVisitor};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Variant)]
/// enum Color {
///     Red,
///     Green,
///     Blue,
/// }
///
/// assert_eq!(EnumVisitor::<Color>::new().visit_int::<_, canon::Error>(1), Ok(Color::Green));
/// assert_eq!(EnumVisitor::<Color>::new().visit_string::<canon::Error>(b"Blue"), Ok(Color::Blue));
/// ```
pub struct EnumVisitor<T> {
    _variant: PhantomData<fn() -> T>,
}

impl<T: Variant> EnumVisitor<T> {
    /// Create the visitor.
    pub fn new() -> Self {
        Self { _variant: PhantomData }
    }

    fn by_name<E: DeserializeError>(name: &[u8]) -> Result<T, E> {
        match T::from_name(name) {
            Some(variant) => Ok(variant),
            None => Err(E::unknown_variant(name, T::VARIANTS)),
        }
    }
}

impl<T: Variant> Default for EnumVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Variant> Visitor for EnumVisitor<T> {
    type Value = T;

    fn expecting(&self) -> Shapes {
        Shapes::INTEGER | Shapes::STRING | Shapes::VARIANT
    }

    fn visit_int<I: PrimInt, E: DeserializeError>(self, value: I) -> Result<T, E> {
        match value.to_usize().and_then(T::from_ordinal) {
            Some(variant) => {
                log::trace!("resolved ordinal {} to variant `{}`", variant.ordinal(), variant.name());
                Ok(variant)
            }
            None => {
                let ordinal = value.to_i128().unwrap_or(i128::MAX);
                Err(E::unknown_ordinal(ordinal, T::VARIANTS))
            }
        }
    }

    fn visit_string<E: DeserializeError>(self, value: &[u8]) -> Result<T, E> {
        Self::by_name(value)
    }

    fn visit_variant<U: Tag, E: DeserializeError>(self, tag: U) -> Result<T, E> {
        match tag.cast::<T>() {
            Some(variant) => Ok(variant),
            None => Self::by_name(tag.name().as_bytes()),
        }
    }
}
