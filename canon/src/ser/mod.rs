//! Serialization traits.

mod serialize;
mod serializer;
mod shape_of;

pub use serialize::Serialize;
pub use serializer::{SerializeMap, SerializeSeq, SerializeStruct, SerializeTuple, Serializer, SerializerOutput};
pub use shape_of::{ShapeSerializer, shape_of};
