//! Implementations for primitive and standard library types.

mod boolean;
#[cfg(feature = "alloc")]
mod bytes;
mod float;
mod integer;
#[cfg(feature = "alloc")]
mod map;
mod option;
mod pointer;
mod sequence;
mod string;
mod tuple;
mod unit;

#[cfg(feature = "alloc")]
pub use bytes::{Bytes, TerminatedBytes};
