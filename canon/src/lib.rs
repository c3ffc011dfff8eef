#![warn(missing_docs)]

//! # Canon
//!
//! Canon is a format-agnostic data model. Values are converted to and from a
//! closed set of canonical [`Shape`]s, and backends only ever deal with those
//! shapes, never with the types of your program.
//!
//! ## Serializing data structures
//!
//! Types implement [`ser::Serialize`] by calling exactly one method of a
//! [`ser::Serializer`], and [`de::Deserialize`] by handing a [`de::Visitor`]
//! to a [`de::Deserializer`]. The derive macros [`Serialize`],
//! [`Deserialize`] and [`Variant`] write these implementations for you:
//!
//! ```
//! use canon::{Deserialize, Serialize, Variant};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Variant)]
//! enum Color {
//!     Red,
//!     Green,
//!     Blue,
//! }
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Pixel {
//!     position: (u16, u16),
//!     color: Color,
//!     #[canon(rename = "label")]
//!     name: String,
//! }
//!
//! let pixel = Pixel { position: (3, 4), color: Color::Green, name: "corner".into() };
//! let bytes = canon::stream::to_bytes(&pixel)?;
//! assert_eq!(canon::stream::from_bytes::<Pixel>(&bytes)?, pixel);
//! # Ok::<(), canon::Error>(())
//! ```
//!
//! ## Memory
//!
//! Every decoded value that owns memory obtains it from the [`allocator::Allocator`]
//! passed to [`de::Deserialize::deserialize`]. When decoding fails halfway,
//! everything allocated so far is handed back through
//! [`de::Deserialize::release`] before the error is returned. The
//! [`allocator::Limited`] allocator puts a budget on untrusted input. Streams
//! that buffer input on their own, like [`io::StdStream`], bound that buffer
//! separately.
//!
//! ## Backends
//!
//! Two backends ship with canon:
//! - [`value`], an in-memory tree that mirrors the data model, and
//! - [`stream`], a self-describing binary encoding over the streams of [`io`].
//!
//! ## `no_std`
//!
//! The traits, the enum decoder, the crate error and the stream backend over
//! an [`io::FixedMemoryStream`] work without `std` and `alloc`. The `alloc`
//! feature adds the owned containers and the value backend, and `std` adds
//! the adapter for [`std::io`] streams.

// Disable the [`std`] standard crate when the "std" feature is not enabled.
#![cfg_attr(not(feature = "std"), no_std)]

// Enable the [`alloc`] standard crate when the "alloc" feature is enabled.
#[cfg(feature = "alloc")]
extern crate alloc;

pub mod allocator;
pub mod byte_order;
pub mod de;
pub mod error;
pub mod io;
pub mod ser;
pub mod shape;
pub mod stream;
#[cfg(feature = "alloc")]
pub mod value;
pub mod variant;

mod types;

pub use canon_derive::{Deserialize, Serialize, Variant};
pub use error::{Error, ErrorKind};
pub use shape::{Shape, Shapes};
#[cfg(feature = "alloc")]
pub use types::{Bytes, TerminatedBytes};
pub use variant::Variant;

extern crate self as canon;
