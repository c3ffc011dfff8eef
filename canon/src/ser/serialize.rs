use super::Serializer;

/// The type can be serialized into a [`Serializer`].
///
/// `Serialize` is implemented by canon for primitive and standard library
/// types. For your own types, use the derive macro or implement it by hand.
///
/// ## Contract
///
/// An implementation must call **exactly one** method of the `serializer`
/// (for composites, one of the `serialize_seq`, `serialize_map`, ... methods,
/// followed by the appends and the `finish` of the returned builder). The
/// method determines the value's [`crate::Shape`], so it must not depend on
/// the value's contents in ways that make the same type ambiguous. This cannot
/// be checked generically and is not checked at runtime.
pub trait Serialize {
    /// Try to serialize this object into the `serializer`.
    ///
    /// In case of a failure, it's up to the `serializer` to roll back partial
    /// changes or to enter an indeterminate state.
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error>;
}
