#[cfg(feature = "alloc")]
use alloc::string::String;

use super::tag;
use crate::allocator::{Allocator, Global};
use crate::byte_order::ByteOrder;
use crate::de::{Deserialize, Deserializer, Ignored, MapAccess, SeqAccess, TagRef, Visitor};
use crate::error::{Error, ErrorKind};
use crate::io::Read;
use crate::shape::Shape;

/// Reads values in the tagged encoding described in [`crate::stream`].
///
/// Any failure poisons the deserializer, since the position in the stream is
/// unknown afterwards. Composites nested deeper than [`Self::max_depth`] are
/// rejected before their content is read.
pub struct StreamDeserializer<Stream: Read> {
    stream: Stream,
    byte_order: ByteOrder,
    max_depth: usize,
    depth: usize,
    poisoned: bool,
    peeked: Option<u8>,
}

struct StreamSeq<'a, Stream: Read> {
    de: &'a mut StreamDeserializer<Stream>,
    remaining: Option<usize>,
    shape: Shape,
}

struct StreamMap<'a, Stream: Read> {
    de: &'a mut StreamDeserializer<Stream>,
    remaining: Option<usize>,
    shape: Shape,
    value_pending: bool,
    #[cfg(feature = "alloc")]
    name: Option<String>,
}

macro_rules! from_xe_bytes {
    ($ty:ty, $bytes:expr, $byte_order:expr) => {
        match $byte_order {
            ByteOrder::BigEndian => <$ty>::from_be_bytes($bytes),
            ByteOrder::LittleEndian => <$ty>::from_le_bytes($bytes),
        }
    };
}

/// The nesting depth accepted by a new [`StreamDeserializer`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl<Stream: Read> StreamDeserializer<Stream> {
    /// Create a new deserializer.
    ///
    /// The default byte order is **big endian**, matching
    /// [`crate::stream::StreamSerializer`].
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            byte_order: ByteOrder::BigEndian,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            poisoned: false,
            peeked: None,
        }
    }

    /// Create a new deserializer that uses the **big endian** byte order.
    pub fn big_endian(self) -> Self {
        Self { byte_order: ByteOrder::BigEndian, ..self }
    }

    /// Create a new deserializer that uses the **little endian** byte order.
    pub fn little_endian(self) -> Self {
        Self { byte_order: ByteOrder::LittleEndian, ..self }
    }

    /// Create a new deserializer that uses the specified byte order.
    pub fn set_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    /// Limit the nesting of composites to `max_depth` levels.
    pub fn max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Whether an earlier failure left the position in the stream unknown.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Take the underlying stream from the deserializer.
    pub fn take(self) -> Stream {
        self.stream
    }

    /// Check that the input has no bytes left.
    pub fn end(&mut self) -> Result<(), Error> {
        if self.poisoned {
            return Err(ErrorKind::Poisoned.into());
        }
        if self.peeked.is_some() {
            return Err(ErrorKind::TrailingBytes.into());
        }
        match self.stream.read(&mut [0u8]) {
            Ok(()) => Err(ErrorKind::TrailingBytes.into()),
            Err(error) if *error.kind() == ErrorKind::UnexpectedEof => Ok(()),
            Err(error) => Err(error),
        }
    }

    fn guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.poisoned {
            return Err(ErrorKind::Poisoned.into());
        }
        let result = f(self);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut bytes = [0u8; N];
        self.stream.read(&mut bytes)?;
        Ok(bytes)
    }

    fn read_tag(&mut self) -> Result<u8, Error> {
        match self.peeked.take() {
            Some(tag) => Ok(tag),
            None => Ok(self.read_array::<1>()?[0]),
        }
    }

    fn peek_tag(&mut self) -> Result<u8, Error> {
        let tag = self.read_tag()?;
        self.peeked = Some(tag);
        Ok(tag)
    }

    fn read_len(&mut self) -> Result<usize, Error> {
        let bytes = self.read_array()?;
        let len = from_xe_bytes!(u32, bytes, self.byte_order);
        Ok(usize::try_from(len).map_err(|_| ErrorKind::LengthOverflow)?)
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            log::debug!("composite at depth {} exceeds the limit of {}", self.depth + 1, self.max_depth);
            return Err(ErrorKind::DepthLimitExceeded.into());
        }
        self.depth += 1;
        Ok(())
    }

    fn deserialize_value<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        match self.read_tag()? {
            tag::NULL => visitor.visit_null(),
            tag::VOID => visitor.visit_void(),
            tag::FALSE => visitor.visit_bool(false),
            tag::TRUE => visitor.visit_bool(true),
            tag::I64 => {
                let bytes = self.read_array()?;
                visitor.visit_int(from_xe_bytes!(i64, bytes, self.byte_order))
            }
            tag::U64 => {
                let bytes = self.read_array()?;
                visitor.visit_int(from_xe_bytes!(u64, bytes, self.byte_order))
            }
            tag::I128 => {
                let bytes = self.read_array()?;
                visitor.visit_int(from_xe_bytes!(i128, bytes, self.byte_order))
            }
            tag::U128 => {
                let bytes = self.read_array()?;
                visitor.visit_int(from_xe_bytes!(u128, bytes, self.byte_order))
            }
            tag::F32 => {
                let bytes = self.read_array()?;
                visitor.visit_float(from_xe_bytes!(f32, bytes, self.byte_order))
            }
            tag::F64 => {
                let bytes = self.read_array()?;
                visitor.visit_float(from_xe_bytes!(f64, bytes, self.byte_order))
            }
            tag::STRING => {
                let len = self.read_len()?;
                visitor.visit_string(self.stream.read_slice(len)?)
            }
            tag::VARIANT => {
                let ordinal = self.read_len()?;
                let len = self.read_len()?;
                let name = core::str::from_utf8(self.stream.read_slice(len)?)
                    .map_err(|_| ErrorKind::InvalidValue(Shape::Variant))?;
                visitor.visit_variant(TagRef::new(name, ordinal))
            }
            tag::SEQ => {
                let len = self.read_len()?;
                self.composite(|de| de.visit_seq(visitor, Some(len), Shape::Sequence))
            }
            tag::SEQ_OPEN => self.composite(|de| de.visit_seq(visitor, None, Shape::Sequence)),
            tag::TUPLE => {
                let len = self.read_len()?;
                self.composite(|de| de.visit_seq(visitor, Some(len), Shape::Tuple))
            }
            tag::TUPLE_OPEN => self.composite(|de| de.visit_seq(visitor, None, Shape::Tuple)),
            tag::MAP => {
                let len = self.read_len()?;
                self.composite(|de| de.visit_map(visitor, Some(len), Shape::Map))
            }
            tag::MAP_OPEN => self.composite(|de| de.visit_map(visitor, None, Shape::Map)),
            tag::STRUCT => self.composite(|de| de.visit_struct(visitor)),
            other => Err(ErrorKind::InvalidTag(other).into()),
        }
    }

    fn composite<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.enter()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn visit_seq<V: Visitor>(&mut self, visitor: V, remaining: Option<usize>, shape: Shape) -> Result<V::Value, Error> {
        let mut seq = StreamSeq { de: self, remaining, shape };
        let value = visitor.visit_seq(&mut seq)?;
        while seq.next_element::<Ignored, Global>(&Global)?.is_some() {}
        Ok(value)
    }

    fn visit_map<V: Visitor>(&mut self, visitor: V, remaining: Option<usize>, shape: Shape) -> Result<V::Value, Error> {
        let mut map = StreamMap {
            de: self,
            remaining,
            shape,
            value_pending: false,
            #[cfg(feature = "alloc")]
            name: None,
        };
        let value = visitor.visit_map(&mut map)?;
        map.drain()?;
        Ok(value)
    }

    fn visit_struct<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        let len = self.read_len()?;
        let name = core::str::from_utf8(self.stream.read_slice(len)?)
            .map_err(|_| ErrorKind::InvalidValue(Shape::Struct))?;
        #[cfg(feature = "alloc")]
        let name = Some(String::from(name));
        #[cfg(not(feature = "alloc"))]
        let _ = name;
        let remaining = Some(self.read_len()?);
        let mut map = StreamMap {
            de: self,
            remaining,
            shape: Shape::Struct,
            value_pending: false,
            #[cfg(feature = "alloc")]
            name,
        };
        let value = visitor.visit_map(&mut map)?;
        map.drain()?;
        Ok(value)
    }
}

impl<Stream: Read> Deserializer for StreamDeserializer<Stream> {
    type Error = Error;

    fn deserialize<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        self.guard(|de| de.deserialize_value(visitor))
    }

    fn deserialize_option<V: Visitor>(&mut self, visitor: V) -> Result<V::Value, Error> {
        self.guard(|de| {
            if de.peek_tag()? == tag::NULL {
                de.peeked = None;
                visitor.visit_null()
            } else {
                visitor.visit_some(de)
            }
        })
    }
}

//------------------------------------------------------------------------------
// Composite access
//------------------------------------------------------------------------------

impl<Stream: Read> StreamDeserializer<Stream> {
    // Counts down known lengths, looks for the end tag otherwise.
    fn advance(&mut self, remaining: &mut Option<usize>) -> Result<bool, Error> {
        match *remaining {
            Some(0) => Ok(false),
            Some(n) => {
                *remaining = Some(n - 1);
                Ok(true)
            }
            None => {
                if self.peek_tag()? != tag::END {
                    return Ok(true);
                }
                self.peeked = None;
                *remaining = Some(0);
                Ok(false)
            }
        }
    }
}

impl<Stream: Read> SeqAccess for StreamSeq<'_, Stream> {
    type Error = Error;

    fn next_element<T: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<T>, Error> {
        if !self.de.advance(&mut self.remaining)? {
            return Ok(None);
        }
        T::deserialize(allocator, &mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }

    fn shape(&self) -> Shape {
        self.shape
    }
}

impl<Stream: Read> StreamMap<'_, Stream> {
    fn drain(&mut self) -> Result<(), Error> {
        if self.value_pending {
            self.next_value::<Ignored, Global>(&Global)?;
        }
        while self.next_entry::<Ignored, Ignored, Global>(&Global)?.is_some() {}
        Ok(())
    }
}

impl<Stream: Read> MapAccess for StreamMap<'_, Stream> {
    type Error = Error;

    fn next_key<K: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<Option<K>, Error> {
        if self.value_pending {
            self.next_value::<Ignored, A>(allocator)?;
        }
        if !self.de.advance(&mut self.remaining)? {
            return Ok(None);
        }
        let key = K::deserialize(allocator, &mut *self.de)?;
        self.value_pending = true;
        Ok(Some(key))
    }

    fn next_value<V: Deserialize, A: Allocator>(&mut self, allocator: &A) -> Result<V, Error> {
        if !self.value_pending {
            return Err(ErrorKind::UnexpectedEof.into());
        }
        self.value_pending = false;
        V::deserialize(allocator, &mut *self.de)
    }

    fn size_hint(&self) -> Option<usize> {
        self.remaining
    }

    fn shape(&self) -> Shape {
        self.shape
    }

    #[cfg(feature = "alloc")]
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
