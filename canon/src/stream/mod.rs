//! A self-describing binary encoding over byte streams.
//!
//! Every value starts with a tag byte naming its shape:
//!
//! | Tag    | Value                                                         |
//! |--------|---------------------------------------------------------------|
//! | `0x00` | null                                                          |
//! | `0x01` | void                                                          |
//! | `0x02` | `false`                                                       |
//! | `0x03` | `true`                                                        |
//! | `0x04` | `i64`, 8 bytes                                                |
//! | `0x05` | `u64`, 8 bytes                                                |
//! | `0x06` | `i128`, 16 bytes                                              |
//! | `0x07` | `u128`, 16 bytes                                              |
//! | `0x08` | `f32`, 4 bytes                                                |
//! | `0x09` | `f64`, 8 bytes                                                |
//! | `0x0A` | string: length, then the bytes                                |
//! | `0x0B` | sequence: count, then the elements                            |
//! | `0x0C` | sequence of unknown length: the elements, then `0xFF`         |
//! | `0x0D` | tuple: count, then the elements                               |
//! | `0x0E` | tuple of unknown length: the elements, then `0xFF`            |
//! | `0x0F` | map: count, then key-value pairs                              |
//! | `0x10` | map of unknown length: key-value pairs, then `0xFF`           |
//! | `0x11` | struct: name (a string), count, then name-value pairs         |
//! | `0x12` | variant: ordinal, then the name (length, then the bytes)      |
//! | `0xFF` | end of a composite of unknown length                          |
//!
//! Lengths, counts and ordinals are `u32`. All multi-byte numbers use the
//! byte order of the serializer, big endian by default. Integers are
//! written in the smallest of the 64 and 128 bit forms that holds them.
//!
//! ```
//! use canon::stream::{from_bytes, to_bytes};
//!
//! let bytes = to_bytes(&(true, "hi"))?;
//! assert_eq!(bytes, [0x0D, 0, 0, 0, 2, 0x03, 0x0A, 0, 0, 0, 2, b'h', b'i']);
//! assert_eq!(from_bytes::<(bool, String)>(&bytes)?, (true, "hi".to_string()));
//! # Ok::<(), canon::Error>(())
//! ```

mod deserializer;
mod serializer;

pub use deserializer::StreamDeserializer;
pub use serializer::{StreamComposite, StreamSerializer};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::allocator::{Allocator, Global};
use crate::de::Deserialize;
use crate::error::Error;
use crate::io::FixedMemoryStream;
#[cfg(feature = "alloc")]
use crate::io::GrowingMemoryStream;
#[cfg(feature = "alloc")]
use crate::ser::Serialize;

pub(crate) mod tag {
    pub const NULL: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const I64: u8 = 0x04;
    pub const U64: u8 = 0x05;
    pub const I128: u8 = 0x06;
    pub const U128: u8 = 0x07;
    pub const F32: u8 = 0x08;
    pub const F64: u8 = 0x09;
    pub const STRING: u8 = 0x0A;
    pub const SEQ: u8 = 0x0B;
    pub const SEQ_OPEN: u8 = 0x0C;
    pub const TUPLE: u8 = 0x0D;
    pub const TUPLE_OPEN: u8 = 0x0E;
    pub const MAP: u8 = 0x0F;
    pub const MAP_OPEN: u8 = 0x10;
    pub const STRUCT: u8 = 0x11;
    pub const VARIANT: u8 = 0x12;
    pub const END: u8 = 0xFF;
}

/// Serialize `value` into a byte vector.
#[cfg(feature = "alloc")]
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut serializer = StreamSerializer::new(GrowingMemoryStream::new());
    value.serialize(&mut serializer)?;
    Ok(serializer.take().take())
}

/// Deserialize a `T` that spans all of `bytes`, allocating from the global
/// heap.
pub fn from_bytes<T: Deserialize>(bytes: &[u8]) -> Result<T, Error> {
    from_bytes_in(&Global, bytes)
}

/// Deserialize a `T` that spans all of `bytes`, allocating from `allocator`.
///
/// Bytes after the value are an error. The decoded value is released in that
/// case.
pub fn from_bytes_in<T: Deserialize, A: Allocator>(allocator: &A, bytes: &[u8]) -> Result<T, Error> {
    let mut deserializer = StreamDeserializer::new(FixedMemoryStream::new(bytes));
    let value = T::deserialize(allocator, &mut deserializer)?;
    match deserializer.end() {
        Ok(()) => Ok(value),
        Err(error) => {
            value.release(allocator);
            Err(error)
        }
    }
}
