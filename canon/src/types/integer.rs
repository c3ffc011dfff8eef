use core::marker::PhantomData;

use num::{NumCast, PrimInt};

use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, Serializer};
use crate::shape::{Shape, Shapes};

/// Accepts integers that fit in `T`.
struct IntegerVisitor<T>(PhantomData<T>);

impl<T: PrimInt> Visitor for IntegerVisitor<T> {
    type Value = T;

    fn expecting(&self) -> Shapes {
        Shapes::INTEGER
    }

    fn visit_int<I: PrimInt, E: DeserializeError>(self, value: I) -> Result<T, E> {
        <T as NumCast>::from(value).ok_or_else(|| E::invalid_value(Shape::Integer))
    }
}

macro_rules! impl_integer {
    ($($type:ty),+) => {
        $(
            impl Serialize for $type {
                fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
                    serializer.serialize_int(*self)
                }
            }

            impl Deserialize for $type {
                fn deserialize<A: Allocator, D: Deserializer>(_allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
                    deserializer.deserialize(IntegerVisitor::<$type>(PhantomData))
                }
            }
        )+
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
