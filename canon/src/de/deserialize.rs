use super::Deserializer;
use crate::allocator::Allocator;

/// The type can be deserialized from a [`Deserializer`].
///
/// Memory for variable-length values is taken from the `allocator` passed by
/// the caller. A value obtained this way may be handed back through
/// [`Deserialize::release`], which returns its buffers to the same
/// allocator.
pub trait Deserialize: Sized {
    /// Try to deserialize an object from the `deserializer`.
    ///
    /// When deserialization fails, everything this call obtained from the
    /// `allocator` has been released by the time the error is returned.
    fn deserialize<A: Allocator, D: Deserializer>(allocator: &A, deserializer: &mut D) -> Result<Self, D::Error>;

    /// Return the buffers of this value to the `allocator` it was decoded
    /// with.
    ///
    /// Values that own no buffers are simply dropped.
    fn release<A: Allocator>(self, allocator: &A) {
        let _ = allocator;
    }
}
