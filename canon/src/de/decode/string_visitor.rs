use alloc::vec::Vec;
use core::any::TypeId;
use core::marker::PhantomData;

use crate::allocator::Allocator;
use crate::de::Visitor;
use crate::error::DeserializeError;
use crate::shape::{Shape, Shapes};

/// An owned string buffer decoded by a [`StringVisitor`].
///
/// When terminated, the buffer physically ends with a zero element that is
/// not part of the logical content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrBuf<Elem> {
    buffer: Vec<Elem>,
    terminated: bool,
}

impl<Elem> StrBuf<Elem> {
    pub(crate) fn from_vec(buffer: Vec<Elem>, terminated: bool) -> Self {
        Self { buffer, terminated }
    }

    /// The logical content, without the terminator.
    pub fn as_slice(&self) -> &[Elem] {
        match self.terminated {
            true => &self.buffer[..self.buffer.len().saturating_sub(1)],
            false => &self.buffer,
        }
    }

    /// The content including the terminator, if there is one.
    pub fn as_slice_with_terminator(&self) -> &[Elem] {
        &self.buffer
    }

    /// The number of elements in the logical content.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the logical content is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the buffer ends with a terminator.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The whole buffer, including the terminator.
    pub fn into_vec(self) -> Vec<Elem> {
        self.buffer
    }

    /// Return the buffer to the `allocator` it was obtained from.
    pub fn release<A: Allocator>(self, allocator: &A) {
        allocator.release(self.buffer)
    }
}

/// Copies a string out of the input into a buffer obtained from an
/// [`Allocator`].
///
/// Only byte strings are supported: with any `Elem` other than `u8`, the
/// visitor expects no shape at all and rejects strings as an invalid type.
/// The bytes are copied verbatim. When a terminator is requested, one extra
/// element is allocated and set to zero after the content. The result never
/// borrows from the input.
pub struct StringVisitor<'a, A, Elem = u8> {
    allocator: &'a A,
    terminated: bool,
    _element: PhantomData<fn() -> Elem>,
}

impl<'a, A: Allocator, Elem: Copy + From<u8> + 'static> StringVisitor<'a, A, Elem> {
    /// Create a visitor for strings without a terminator.
    pub fn new(allocator: &'a A) -> Self {
        Self { allocator, terminated: false, _element: PhantomData }
    }

    /// Create a visitor for strings that end in a zero terminator.
    pub fn terminated(allocator: &'a A) -> Self {
        Self { allocator, terminated: true, _element: PhantomData }
    }

    fn supported() -> bool {
        TypeId::of::<Elem>() == TypeId::of::<u8>()
    }
}

impl<A: Allocator, Elem: Copy + From<u8> + 'static> Visitor for StringVisitor<'_, A, Elem> {
    type Value = StrBuf<Elem>;

    fn expecting(&self) -> Shapes {
        match Self::supported() {
            true => Shapes::STRING,
            false => Shapes::empty(),
        }
    }

    fn visit_string<E: DeserializeError>(self, value: &[u8]) -> Result<StrBuf<Elem>, E> {
        if !Self::supported() {
            return Err(E::invalid_type(self.expecting(), Shape::String));
        }
        let len = value.len().checked_add(self.terminated as usize).ok_or_else(|| E::invalid_value(Shape::String))?;
        let mut buffer = self.allocator.allocate::<Elem>(len)?;
        buffer.extend(value.iter().map(|byte| Elem::from(*byte)));
        if self.terminated {
            buffer.push(Elem::from(0));
        }
        Ok(StrBuf { buffer, terminated: self.terminated })
    }
}
