use num::{Float, PrimInt};

use super::tag;
use crate::byte_order::ByteOrder;
use crate::error::{Error, ErrorKind};
use crate::io::Write;
use crate::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple, Serializer, SerializerOutput};
use crate::shape::Shape;
use crate::variant::Tag;

/// Writes values in the tagged encoding described in [`crate::stream`].
///
/// The serializer is poisoned by any failure and by composites that are
/// dropped before they are finished. A poisoned serializer refuses to write,
/// so a partially written value is never followed by more data.
pub struct StreamSerializer<Stream: Write> {
    stream: Stream,
    byte_order: ByteOrder,
    poisoned: bool,
}

/// The builder of every composite written by a [`StreamSerializer`].
pub struct StreamComposite<'a, Stream: Write> {
    serializer: &'a mut StreamSerializer<Stream>,
    // `None` for composites of unknown length, closed by an end tag.
    remaining: Option<usize>,
    expected: usize,
    finished: bool,
}

macro_rules! to_xe_bytes {
    ($value:expr, $byte_order:expr) => {
        match $byte_order {
            ByteOrder::BigEndian => $value.to_be_bytes(),
            ByteOrder::LittleEndian => $value.to_le_bytes(),
        }
    };
}

impl<Stream: Write> StreamSerializer<Stream> {
    /// Create a new serializer.
    ///
    /// The default byte order is **big endian**. Use the [`Self::big_endian`] and
    /// [`Self::little_endian`] functions to set a specific byte order:
    /// ```
    /// # use canon::stream::StreamSerializer;
    /// # use canon::io::GrowingMemoryStream;
    /// # let stream = GrowingMemoryStream::new();
    /// let serializer = StreamSerializer::new(stream).little_endian();
    /// ```
    pub fn new(stream: Stream) -> Self {
        Self { stream, byte_order: ByteOrder::BigEndian, poisoned: false }
    }

    /// Create a new serializer that uses the **big endian** byte order.
    pub fn big_endian(self) -> Self {
        Self { byte_order: ByteOrder::BigEndian, ..self }
    }

    /// Create a new serializer that uses the **little endian** byte order.
    pub fn little_endian(self) -> Self {
        Self { byte_order: ByteOrder::LittleEndian, ..self }
    }

    /// Create a new serializer that uses the specified byte order.
    pub fn set_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    /// Whether an earlier failure left the output incomplete.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Take the serialized bytes from the serializer.
    pub fn take(self) -> Stream {
        self.stream
    }

    fn guard<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.poisoned {
            return Err(ErrorKind::Poisoned.into());
        }
        let result = self.stream.write(bytes);
        self.guard(result)
    }

    fn write_u32(&mut self, value: usize) -> Result<(), Error> {
        let value = u32::try_from(value).map_err(|_| ErrorKind::LengthOverflow);
        let value = self.guard(value.map_err(Error::from))?;
        self.write(&to_xe_bytes!(value, self.byte_order))
    }

    fn write_string(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_u32(bytes.len())?;
        self.write(bytes)
    }

    fn begin(&mut self, len: Option<usize>, known: u8, open: u8) -> Result<StreamComposite<'_, Stream>, Error> {
        match len {
            Some(len) => {
                self.write(&[known])?;
                self.write_u32(len)?;
            }
            None => self.write(&[open])?,
        }
        Ok(StreamComposite { serializer: self, remaining: len, expected: len.unwrap_or(0), finished: false })
    }
}

impl<Stream: Write> SerializerOutput for StreamSerializer<Stream> {
    type Success = ();
    type Error = Error;
}

impl<Stream: Write> Serializer for StreamSerializer<Stream> {
    type SerializeSeq<'a>
        = StreamComposite<'a, Stream>
    where
        Self: 'a;
    type SerializeTuple<'a>
        = StreamComposite<'a, Stream>
    where
        Self: 'a;
    type SerializeMap<'a>
        = StreamComposite<'a, Stream>
    where
        Self: 'a;
    type SerializeStruct<'a>
        = StreamComposite<'a, Stream>
    where
        Self: 'a;

    fn serialize_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write(&[if value { tag::TRUE } else { tag::FALSE }])
    }

    fn serialize_int<I: PrimInt>(&mut self, value: I) -> Result<(), Error> {
        let signed = I::min_value() < I::zero();
        if signed {
            if let Some(value) = value.to_i64() {
                self.write(&[tag::I64])?;
                return self.write(&to_xe_bytes!(value, self.byte_order));
            }
            if let Some(value) = value.to_i128() {
                self.write(&[tag::I128])?;
                return self.write(&to_xe_bytes!(value, self.byte_order));
            }
        } else {
            if let Some(value) = value.to_u64() {
                self.write(&[tag::U64])?;
                return self.write(&to_xe_bytes!(value, self.byte_order));
            }
            if let Some(value) = value.to_u128() {
                self.write(&[tag::U128])?;
                return self.write(&to_xe_bytes!(value, self.byte_order));
            }
        }
        let result = Err(ErrorKind::InvalidValue(Shape::Integer).into());
        self.guard(result)
    }

    fn serialize_float<F: Float>(&mut self, value: F) -> Result<(), Error> {
        if core::mem::size_of::<F>() <= 4 {
            if let Some(value) = value.to_f32() {
                self.write(&[tag::F32])?;
                return self.write(&to_xe_bytes!(value, self.byte_order));
            }
        } else if let Some(value) = value.to_f64() {
            self.write(&[tag::F64])?;
            return self.write(&to_xe_bytes!(value, self.byte_order));
        }
        let result = Err(ErrorKind::InvalidValue(Shape::Float).into());
        self.guard(result)
    }

    fn serialize_null(&mut self) -> Result<(), Error> {
        self.write(&[tag::NULL])
    }

    fn serialize_void(&mut self) -> Result<(), Error> {
        self.write(&[tag::VOID])
    }

    fn serialize_string(&mut self, value: &[u8]) -> Result<(), Error> {
        self.write(&[tag::STRING])?;
        self.write_string(value)
    }

    fn serialize_variant<T: Tag>(&mut self, tag: T) -> Result<(), Error> {
        self.write(&[tag::VARIANT])?;
        self.write_u32(tag.ordinal())?;
        self.write_string(tag.name().as_bytes())
    }

    fn serialize_seq(&mut self, len: Option<usize>) -> Result<StreamComposite<'_, Stream>, Error> {
        self.begin(len, tag::SEQ, tag::SEQ_OPEN)
    }

    fn serialize_tuple(&mut self, len: Option<usize>) -> Result<StreamComposite<'_, Stream>, Error> {
        self.begin(len, tag::TUPLE, tag::TUPLE_OPEN)
    }

    fn serialize_map(&mut self, len: Option<usize>) -> Result<StreamComposite<'_, Stream>, Error> {
        self.begin(len, tag::MAP, tag::MAP_OPEN)
    }

    fn serialize_struct(&mut self, name: &str, fields: usize) -> Result<StreamComposite<'_, Stream>, Error> {
        self.write(&[tag::STRUCT])?;
        self.write_string(name.as_bytes())?;
        self.write_u32(fields)?;
        Ok(StreamComposite { serializer: self, remaining: Some(fields), expected: fields, finished: false })
    }
}

//------------------------------------------------------------------------------
// StreamComposite
//------------------------------------------------------------------------------

impl<Stream: Write> StreamComposite<'_, Stream> {
    fn count(&mut self) -> Result<(), Error> {
        match &mut self.remaining {
            Some(0) => {
                let result = Err(ErrorKind::InvalidLength { len: self.expected + 1, expected: self.expected }.into());
                self.serializer.guard(result)
            }
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn member<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let result = value.serialize(&mut *self.serializer);
        self.serializer.guard(result)
    }

    fn close(mut self) -> Result<(), Error> {
        self.finished = true;
        match self.remaining {
            Some(0) => Ok(()),
            Some(remaining) => {
                let len = self.expected - remaining;
                let result = Err(ErrorKind::InvalidLength { len, expected: self.expected }.into());
                self.serializer.guard(result)
            }
            None => self.serializer.write(&[tag::END]),
        }
    }
}

impl<Stream: Write> Drop for StreamComposite<'_, Stream> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("composite abandoned before it was finished, the serializer is poisoned");
            self.serializer.poisoned = true;
        }
    }
}

impl<Stream: Write> SerializerOutput for StreamComposite<'_, Stream> {
    type Success = ();
    type Error = Error;
}

impl<Stream: Write> SerializeSeq for StreamComposite<'_, Stream> {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.count()?;
        self.member(value)
    }

    fn finish(self) -> Result<(), Error> {
        self.close()
    }
}

impl<Stream: Write> SerializeTuple for StreamComposite<'_, Stream> {
    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.count()?;
        self.member(value)
    }

    fn finish(self) -> Result<(), Error> {
        self.close()
    }
}

impl<Stream: Write> SerializeMap for StreamComposite<'_, Stream> {
    fn serialize_entry<K, V>(&mut self, key: &K, value: &V) -> Result<(), Error>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.count()?;
        self.member(key)?;
        self.member(value)
    }

    fn finish(self) -> Result<(), Error> {
        self.close()
    }
}

impl<Stream: Write> SerializeStruct for StreamComposite<'_, Stream> {
    fn serialize_field<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), Error> {
        self.count()?;
        self.member(name)?;
        self.member(value)
    }

    fn finish(self) -> Result<(), Error> {
        self.close()
    }
}
