use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::de::{Deserialize, Deserializer, Ignored, SeqAccess, Visitor};
use crate::error::DeserializeError;
use crate::ser::{Serialize, SerializeTuple, Serializer};
use crate::shape::Shapes;

/// Accepts sequences and tuples with exactly as many elements as the tuple
/// `T` has.
struct TupleVisitor<'a, T, A> {
    allocator: &'a A,
    _tuple: PhantomData<fn() -> T>,
}

macro_rules! impl_tuple {
    ($len:literal => $($name:ident $var:ident $index:tt),+) => {
        impl<$($name: Serialize),+> Serialize for ($($name,)+) {
            fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
                let mut tuple = serializer.serialize_tuple(Some($len))?;
                $(tuple.serialize_element(&self.$index)?;)+
                tuple.finish()
            }
        }

        impl<$($name: Deserialize),+> Deserialize for ($($name,)+) {
            fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
                deserializer.deserialize(TupleVisitor::<Self, A> { allocator, _tuple: PhantomData })
            }

            fn release<A: Allocator>(self, allocator: &A) {
                $(self.$index.release(allocator);)+
            }
        }

        impl<A: Allocator, $($name: Deserialize),+> Visitor for TupleVisitor<'_, ($($name,)+), A> {
            type Value = ($($name,)+);

            fn expecting(&self) -> Shapes {
                Shapes::TUPLE | Shapes::SEQUENCE
            }

            fn visit_seq<S: SeqAccess>(self, seq: &mut S) -> Result<Self::Value, S::Error> {
                let mut decoded: ($(Option<$name>,)+) = Default::default();
                let result = (|| -> Result<(), S::Error> {
                    $(
                        match seq.next_element::<$name, A>(self.allocator)? {
                            Some(value) => decoded.$index = Some(value),
                            None => return Err(S::Error::invalid_length($index, $len)),
                        }
                    )+
                    match seq.next_element::<Ignored, A>(self.allocator)? {
                        Some(_) => Err(S::Error::invalid_length($len + 1, $len)),
                        None => Ok(()),
                    }
                })();
                match (result, decoded) {
                    (Ok(()), ($(Some($var),)+)) => Ok(($($var,)+)),
                    (result, decoded) => {
                        $(if let Some(value) = decoded.$index {
                            value.release(self.allocator);
                        })+
                        Err(result.err().unwrap_or_else(|| S::Error::invalid_length(0, $len)))
                    }
                }
            }
        }
    };
}

impl_tuple!(1 => T0 t0 0);
impl_tuple!(2 => T0 t0 0, T1 t1 1);
impl_tuple!(3 => T0 t0 0, T1 t1 1, T2 t2 2);
impl_tuple!(4 => T0 t0 0, T1 t1 1, T2 t2 2, T3 t3 3);
impl_tuple!(5 => T0 t0 0, T1 t1 1, T2 t2 2, T3 t3 3, T4 t4 4);
impl_tuple!(6 => T0 t0 0, T1 t1 1, T2 t2 2, T3 t3 3, T4 t4 4, T5 t5 5);
