use alloc::boxed::Box;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::de::{Deserialize, SeqAccess, Visitor};
use crate::shape::Shapes;

/// Upper bound in bytes for the buffer reserved up front from a size hint.
///
/// Size hints come from the input and may be arbitrarily large.
const MAX_PREALLOCATION: usize = 4096;

/// Collects the elements of a sequence into a buffer obtained from an
/// [`Allocator`].
///
/// The elements are stored in arrival order. The buffer grows through the
/// allocator as needed and is shrunk to fit at the end.
///
/// If an element fails to decode or the allocator refuses to grow the
/// buffer, every element decoded so far is released with
/// [`Deserialize::release`], the buffer is returned to the allocator, and
/// the original error is propagated.
pub struct SequenceVisitor<'a, T, A> {
    allocator: &'a A,
    _element: PhantomData<fn() -> T>,
}

impl<'a, T: Deserialize, A: Allocator> SequenceVisitor<'a, T, A> {
    /// Create a visitor that takes memory from `allocator`.
    pub fn new(allocator: &'a A) -> Self {
        Self { allocator, _element: PhantomData }
    }

    fn initial_capacity(size_hint: Option<usize>) -> usize {
        let cap = MAX_PREALLOCATION / core::cmp::max(core::mem::size_of::<T>(), 1);
        core::cmp::min(size_hint.unwrap_or(0), cap)
    }

    fn grow(&self, buffer: &mut Vec<T>) -> Result<(), crate::allocator::AllocError> {
        let additional = core::cmp::max(buffer.len(), 4);
        self.allocator.grow(buffer, additional).or_else(|_| self.allocator.grow(buffer, 1))
    }

    fn release(&self, mut buffer: Vec<T>) {
        log::debug!("releasing {} decoded elements", buffer.len());
        for element in buffer.drain(..) {
            element.release(self.allocator);
        }
        self.allocator.release(buffer);
    }
}

impl<T: Deserialize, A: Allocator> Visitor for SequenceVisitor<'_, T, A> {
    type Value = Box<[T]>;

    fn expecting(&self) -> Shapes {
        Shapes::SEQUENCE | Shapes::TUPLE
    }

    fn visit_seq<S: SeqAccess>(self, seq: &mut S) -> Result<Box<[T]>, S::Error> {
        let mut buffer = self.allocator.allocate::<T>(Self::initial_capacity(seq.size_hint()))?;
        loop {
            let element = match seq.next_element::<T, A>(self.allocator) {
                Ok(Some(element)) => element,
                Ok(None) => break,
                Err(error) => {
                    self.release(buffer);
                    return Err(error);
                }
            };
            if buffer.len() == buffer.capacity() {
                if let Err(error) = self.grow(&mut buffer) {
                    element.release(self.allocator);
                    self.release(buffer);
                    return Err(error.into());
                }
            }
            buffer.push(element);
        }
        self.allocator.shrink(&mut buffer);
        log::trace!("decoded a sequence of {} elements", buffer.len());
        Ok(buffer.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{AllocError, Global, Limited};
    use crate::de::Deserializer;
    use crate::error::{Error, ErrorKind};
    use crate::shape::Shape;
    use core::cell::Cell;

    /// Presents a fixed list of elements, failing at `fail_at`.
    struct Elements<'a> {
        values: &'a [u32],
        position: usize,
        fail_at: Option<usize>,
        hint: bool,
    }

    impl<'a> Elements<'a> {
        fn new(values: &'a [u32]) -> Self {
            Self { values, position: 0, fail_at: None, hint: true }
        }
    }

    /// Deserializes a single integer.
    struct Scalar(u32);

    impl Deserializer for Scalar {
        type Error = Error;

        fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
            visitor.visit_int(self.0)
        }
    }

    impl SeqAccess for Elements<'_> {
        type Error = Error;

        fn next_element<T: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<T>, Error> {
            if self.fail_at == Some(self.position) {
                return Err(ErrorKind::UnexpectedEof.into());
            }
            let Some(value) = self.values.get(self.position) else {
                return Ok(None);
            };
            self.position += 1;
            T::deserialize(allocator, &mut Scalar(*value)).map(Some)
        }

        fn size_hint(&self) -> Option<usize> {
            self.hint.then(|| self.values.len() - self.position)
        }
    }

    struct Number(u32);

    impl Deserialize for Number {
        fn deserialize<A: Allocator, D: Deserializer>(_allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
            struct NumberVisitor;
            impl Visitor for NumberVisitor {
                type Value = Number;
                fn expecting(&self) -> Shapes {
                    Shapes::INTEGER
                }
                fn visit_int<I: num::PrimInt, E: crate::error::DeserializeError>(self, value: I) -> Result<Number, E> {
                    value.to_u32().map(Number).ok_or(E::invalid_value(Shape::Integer))
                }
            }
            deserializer.deserialize(NumberVisitor)
        }
    }

    thread_local! {
        static RELEASED: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts its releases.
    struct Counted(#[allow(dead_code)] u32);

    impl Deserialize for Counted {
        fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error> {
            Number::deserialize(allocator, deserializer).map(|number| Counted(number.0))
        }

        fn release<A: Allocator>(self, _allocator: &A) {
            RELEASED.with(|released| released.set(released.get() + 1));
        }
    }

    fn values(sequence: &[Number]) -> Vec<u32> {
        sequence.iter().map(|number| number.0).collect()
    }

    #[test]
    fn keeps_arrival_order() -> Result<(), Error> {
        let mut seq = Elements::new(&[3, 1, 2]);
        let decoded = SequenceVisitor::<Number, _>::new(&Global).visit_seq(&mut seq)?;
        assert_eq!(values(&decoded), [3, 1, 2]);
        Ok(())
    }

    #[test]
    fn empty_sequence() -> Result<(), Error> {
        let mut seq = Elements::new(&[]);
        let decoded = SequenceVisitor::<Number, _>::new(&Global).visit_seq(&mut seq)?;
        assert!(decoded.is_empty());
        Ok(())
    }

    #[test]
    fn grows_without_size_hint() -> Result<(), Error> {
        let input: Vec<u32> = (0..100).collect();
        let mut seq = Elements { hint: false, ..Elements::new(&input) };
        let decoded = SequenceVisitor::<Number, _>::new(&Global).visit_seq(&mut seq)?;
        assert_eq!(values(&decoded), input);
        Ok(())
    }

    #[test]
    fn shrinks_to_fit() -> Result<(), Error> {
        let allocator = Limited::new(1024);
        let mut seq = Elements { hint: false, ..Elements::new(&[1, 2, 3, 4, 5]) };
        let decoded = SequenceVisitor::<Number, _>::new(&allocator).visit_seq(&mut seq)?;
        assert_eq!(allocator.live(), 5 * core::mem::size_of::<Number>());
        drop(decoded);
        Ok(())
    }

    #[test]
    fn element_failure_releases_everything() {
        RELEASED.with(|released| released.set(0));
        let allocator = Limited::new(1024);
        let mut seq = Elements { fail_at: Some(2), ..Elements::new(&[1, 2, 3, 4, 5]) };
        let result = SequenceVisitor::<Counted, _>::new(&allocator).visit_seq(&mut seq);
        assert_eq!(result.map(|_| ()), Err(ErrorKind::UnexpectedEof.into()));
        assert_eq!(RELEASED.with(Cell::get), 2);
        assert_eq!(allocator.live(), 0);
    }

    #[test]
    fn allocation_failure_releases_everything() {
        let allocator = Limited::new(3 * core::mem::size_of::<Number>());
        let mut seq = Elements { hint: false, ..Elements::new(&[1, 2, 3, 4, 5]) };
        let result = SequenceVisitor::<Number, _>::new(&allocator).visit_seq(&mut seq);
        assert_eq!(result.map(|_| ()), Err(AllocError::LimitExceeded.into()));
        assert_eq!(allocator.live(), 0);
    }

    #[test]
    fn size_hint_is_capped() -> Result<(), Error> {
        let allocator = Limited::new(MAX_PREALLOCATION);
        let mut seq = Elements::new(&[1, 2]);
        let decoded = SequenceVisitor::<Number, _>::new(&allocator).visit_seq(&mut SeqWithHint(&mut seq, usize::MAX))?;
        assert_eq!(values(&decoded), [1, 2]);
        Ok(())
    }

    /// Overrides the size hint of another accessor.
    struct SeqWithHint<'a, 'b>(&'a mut Elements<'b>, usize);

    impl SeqAccess for SeqWithHint<'_, '_> {
        type Error = Error;

        fn next_element<T: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<T>, Error> {
            self.0.next_element(allocator)
        }

        fn size_hint(&self) -> Option<usize> {
            Some(self.1)
        }
    }

    #[test]
    fn rejects_map() {
        struct NoEntries;
        impl crate::de::MapAccess for NoEntries {
            type Error = Error;
            fn next_key<K: Deserialize, A: Allocator>(&mut self, _allocator: &A) -> Result<Option<K>, Error> {
                Ok(None)
            }
            fn next_value<V: Deserialize, A: Allocator>(&mut self, _allocator: &A) -> Result<V, Error> {
                Err(ErrorKind::UnexpectedEof.into())
            }
        }
        let result = SequenceVisitor::<Number, _>::new(&Global).visit_map(&mut NoEntries);
        assert_eq!(
            result.map(|_| ()),
            Err(ErrorKind::InvalidType { expected: Shapes::SEQUENCE | Shapes::TUPLE, actual: Shape::Map }.into())
        );
    }
}
