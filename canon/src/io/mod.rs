//! I/O traits and I/O streams.

mod fixed_memory_stream;
#[cfg(feature = "alloc")]
mod growing_memory_stream;
#[cfg(feature = "std")]
mod std_stream;
mod stream;

pub use fixed_memory_stream::FixedMemoryStream;
#[cfg(feature = "alloc")]
pub use growing_memory_stream::GrowingMemoryStream;
#[cfg(feature = "std")]
pub use std_stream::StdStream;
pub use stream::{Read, Write};
