//! Deserialization traits and the decoders shared by all backends.

pub mod decode;
mod deserialize;
mod deserializer;
mod ignored;
mod visitor;

pub use deserialize::Deserialize;
pub use deserializer::{Deserializer, MapAccess, SeqAccess};
pub use ignored::Ignored;
pub use visitor::Visitor;

pub use crate::variant::{Tag, TagRef, Variant};
