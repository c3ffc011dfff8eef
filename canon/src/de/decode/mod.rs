//! The decoders for enumerations and variable-length values.
//!
//! These visitors carry the decoding rules every backend shares. They are
//! used by the [`crate::de::Deserialize`] implementations of this crate and
//! of the derive macros, and can be used by hand-written implementations
//! alike.

mod enum_visitor;
#[cfg(feature = "alloc")]
mod sequence_visitor;
#[cfg(feature = "alloc")]
mod string_visitor;

pub use enum_visitor::EnumVisitor;
#[cfg(feature = "alloc")]
pub use sequence_visitor::SequenceVisitor;
#[cfg(feature = "alloc")]
pub use string_visitor::{StrBuf, StringVisitor};
