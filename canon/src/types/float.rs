use core::marker::PhantomData;

use num::{Float, NumCast};

use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, Serializer};
use crate::shape::{Shape, Shapes};

/// Accepts floating point numbers. Integers are not converted.
struct FloatVisitor<T>(PhantomData<T>);

impl<T: Float> Visitor for FloatVisitor<T> {
    type Value = T;

    fn expecting(&self) -> Shapes {
        Shapes::FLOAT
    }

    fn visit_float<F: Float, E: DeserializeError>(self, value: F) -> Result<T, E> {
        match <T as NumCast>::from(value) {
            // Finite values that overflow the target come back as infinity.
            Some(narrowed) if narrowed.is_finite() || !value.is_finite() => Ok(narrowed),
            _ => Err(E::invalid_value(Shape::Float)),
        }
    }
}

macro_rules! impl_float {
    ($($type:ty),+) => {
        $(
            impl Serialize for $type {
                fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
                    serializer.serialize_float(*self)
                }
            }

            impl Deserialize for $type {
                fn deserialize<A: Allocator, D: Deserializer>(_allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
                    deserializer.deserialize(FloatVisitor::<$type>(PhantomData))
                }
            }
        )+
    };
}

impl_float!(f32, f64);
