//! Error types and the traits backend errors implement.

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::allocator::AllocError;
use crate::shape::{Shape, Shapes};

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// The input's shape is not one the visitor supports.
    InvalidType {
        /// The shapes the visitor accepts.
        expected: Shapes,
        /// The shape of the input.
        actual: Shape,
    },
    /// The input has the right shape, but its value cannot be represented by
    /// the target, like `300` for a `u8`.
    InvalidValue(Shape),
    /// A fixed-length target received the wrong number of elements.
    InvalidLength {
        /// The number of elements received.
        len: usize,
        /// The number of elements the target holds.
        expected: usize,
    },
    /// No member of the enum has this name.
    UnknownVariant {
        /// The name found in the input.
        name: Name,
        /// The names of the members.
        expected: &'static [&'static str],
    },
    /// No member of the enum has this ordinal.
    UnknownOrdinal {
        /// The ordinal found in the input.
        ordinal: i128,
        /// The names of the members, indexed by their ordinals.
        expected: &'static [&'static str],
    },
    /// The struct has no field with this name.
    UnknownField {
        /// The name found in the input.
        name: Name,
        /// The names of the struct's fields.
        expected: &'static [&'static str],
    },
    /// A struct field is absent from the input.
    MissingField(&'static str),
    /// A struct field appears more than once in the input.
    DuplicateField(&'static str),
    /// The allocator refused to provide memory.
    Alloc(AllocError),
    /// The input ended in the middle of a value, or the output is full.
    UnexpectedEof,
    /// The byte does not start any encoded value.
    InvalidTag(u8),
    /// Input remains after the value was decoded.
    TrailingBytes,
    /// Composites are nested deeper than the deserializer allows.
    DepthLimitExceeded,
    /// A length is larger than the encoding, `usize` or the stream allows.
    LengthOverflow,
    /// An earlier failure or an abandoned composite left the backend in an
    /// indeterminate state.
    Poisoned,
    /// The underlying [`std::io`] stream failed.
    #[cfg(feature = "std")]
    IO(std::io::ErrorKind),
}

/// The error of the backends shipped with this crate.
///
/// Besides the [`ErrorKind`], it records the [`Item`] where the error
/// happened, so that an error in a deeply nested field reads like
/// `.header.version: invalid type: string, expected integer`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Error {
    kind: ErrorKind,
    item: Item,
}

/// The path of struct fields leading to the value that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    #[cfg(not(feature = "alloc"))]
    name: Option<&'static str>,
    #[cfg(feature = "alloc")]
    path: Vec<String>,
}

/// The name of an unknown variant or field, as found in the input.
///
/// Without the `alloc` feature the name cannot be kept and only its presence
/// is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    #[cfg(feature = "alloc")]
    text: String,
}

/// Errors that can record the field they happened in.
pub trait TraceError: Sized {
    /// Record that the error happened inside the field `ident`.
    #[cfg(not(feature = "alloc"))]
    fn enclose(self, ident: &'static str) -> Self;

    /// Record that the error happened inside the field `ident`.
    #[cfg(feature = "alloc")]
    fn enclose(self, ident: &str) -> Self;
}

/// The errors of a [`crate::ser::Serializer`].
pub trait SerializeError: TraceError + core::error::Error {
    /// The backend cannot represent the value, like an integer wider than
    /// its widest integer.
    fn unrepresentable(shape: Shape) -> Self;
}

/// The errors of a [`crate::de::Deserializer`].
///
/// Visitors and decoders construct errors through these functions, so they
/// work with any backend's error type.
pub trait DeserializeError: TraceError + core::error::Error + From<AllocError> {
    /// The input's shape is not among the `expected` ones.
    fn invalid_type(expected: Shapes, actual: Shape) -> Self;

    /// The input's value cannot be represented by the target.
    fn invalid_value(actual: Shape) -> Self;

    /// A fixed-length target received `len` elements instead of `expected`.
    fn invalid_length(len: usize, expected: usize) -> Self;

    /// No member of an enum is called `name`.
    fn unknown_variant(name: &[u8], expected: &'static [&'static str]) -> Self;

    /// No member of an enum has the ordinal `ordinal`.
    fn unknown_ordinal(ordinal: i128, expected: &'static [&'static str]) -> Self;

    /// No field of a struct is called `name`.
    fn unknown_field(name: &[u8], expected: &'static [&'static str]) -> Self;

    /// The struct field `field` is absent from the input.
    fn missing_field(field: &'static str) -> Self;

    /// The struct field `field` appears more than once in the input.
    fn duplicate_field(field: &'static str) -> Self;
}

//------------------------------------------------------------------------------
// Error implementations
//------------------------------------------------------------------------------

impl Error {
    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where it went wrong.
    pub fn item(&self) -> &Item {
        &self.item
    }
}

impl TraceError for Error {
    #[cfg(not(feature = "alloc"))]
    fn enclose(self, ident: &'static str) -> Self {
        Self { kind: self.kind, item: self.item.enclose(ident) }
    }

    #[cfg(feature = "alloc")]
    fn enclose(self, ident: &str) -> Self {
        Self { kind: self.kind, item: self.item.enclose(ident) }
    }
}

impl SerializeError for Error {
    fn unrepresentable(shape: Shape) -> Self {
        ErrorKind::InvalidValue(shape).into()
    }
}

impl DeserializeError for Error {
    fn invalid_type(expected: Shapes, actual: Shape) -> Self {
        ErrorKind::InvalidType { expected, actual }.into()
    }

    fn invalid_value(actual: Shape) -> Self {
        ErrorKind::InvalidValue(actual).into()
    }

    fn invalid_length(len: usize, expected: usize) -> Self {
        ErrorKind::InvalidLength { len, expected }.into()
    }

    fn unknown_variant(name: &[u8], expected: &'static [&'static str]) -> Self {
        ErrorKind::UnknownVariant { name: Name::new(name), expected }.into()
    }

    fn unknown_ordinal(ordinal: i128, expected: &'static [&'static str]) -> Self {
        ErrorKind::UnknownOrdinal { ordinal, expected }.into()
    }

    fn unknown_field(name: &[u8], expected: &'static [&'static str]) -> Self {
        ErrorKind::UnknownField { name: Name::new(name), expected }.into()
    }

    fn missing_field(field: &'static str) -> Self {
        ErrorKind::MissingField(field).into()
    }

    fn duplicate_field(field: &'static str) -> Self {
        ErrorKind::DuplicateField(field).into()
    }
}

impl core::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if !self.item.is_empty() {
            write!(f, "{}: {}", self.item, self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(value: ErrorKind) -> Self {
        Self { kind: value, item: Item::default() }
    }
}

impl From<AllocError> for Error {
    fn from(value: AllocError) -> Self {
        ErrorKind::Alloc(value).into()
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        ErrorKind::from(value).into()
    }
}

//------------------------------------------------------------------------------
// ErrorKind implementations
//------------------------------------------------------------------------------

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ErrorKind::*;
        match self {
            InvalidType { expected, actual } => write!(f, "invalid type: {actual}, expected {expected}"),
            InvalidValue(shape) => write!(f, "the {shape} value cannot be represented by the target"),
            InvalidLength { len, expected } => write!(f, "invalid length {len}, expected {expected}"),
            UnknownVariant { name, expected } => write!(f, "unknown variant `{name}`, {}", OneOf(expected)),
            UnknownOrdinal { ordinal, expected } => write!(f, "unknown variant ordinal {ordinal}, {}", OneOf(expected)),
            UnknownField { name, expected } => write!(f, "unknown field `{name}`, {}", OneOf(expected)),
            MissingField(field) => write!(f, "missing field `{field}`"),
            DuplicateField(field) => write!(f, "duplicate field `{field}`"),
            Alloc(err) => write!(f, "allocation failed: {err}"),
            UnexpectedEof => write!(f, "end of stream reached, cannot read/write more data"),
            InvalidTag(tag) => write!(f, "the byte {tag:#04x} does not start a value"),
            TrailingBytes => write!(f, "the input continues after the value"),
            DepthLimitExceeded => write!(f, "composites are nested too deeply"),
            LengthOverflow => write!(f, "the length does not fit in the length prefix"),
            Poisoned => write!(f, "an earlier failure left the stream in an indeterminate state"),
            #[cfg(feature = "std")]
            IO(kind) => write!(f, "{kind}"),
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ErrorKind {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEof,
            kind => ErrorKind::IO(kind),
        }
    }
}

struct OneOf<'a>(&'a [&'static str]);

impl core::fmt::Display for OneOf<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            [] => write!(f, "there are none"),
            [single] => write!(f, "expected `{single}`"),
            [first, rest @ ..] => {
                write!(f, "expected one of `{first}`")?;
                for name in rest {
                    write!(f, ", `{name}`")?;
                }
                Ok(())
            }
        }
    }
}

//------------------------------------------------------------------------------
// Item implementations
//------------------------------------------------------------------------------

impl Item {
    /// True when the error happened at the top level.
    #[cfg(not(feature = "alloc"))]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// True when the error happened at the top level.
    #[cfg(feature = "alloc")]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Record an enclosing field. The innermost field is enclosed first.
    ///
    /// Without `alloc` only the innermost field is kept.
    #[cfg(not(feature = "alloc"))]
    pub fn enclose(self, ident: &'static str) -> Self {
        Self { name: Some(self.name.unwrap_or(ident)) }
    }

    /// Record an enclosing field. The innermost field is enclosed first.
    #[cfg(feature = "alloc")]
    pub fn enclose(mut self, ident: &str) -> Self {
        self.path.push(ident.into());
        self
    }
}

impl core::fmt::Display for Item {
    #[cfg(not(feature = "alloc"))]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.name {
            Some(name) => write!(f, ".{name}"),
            None => Ok(()),
        }
    }

    #[cfg(feature = "alloc")]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for ident in self.path.iter().rev() {
            write!(f, ".{ident}")?
        }
        Ok(())
    }
}

//------------------------------------------------------------------------------
// Name implementations
//------------------------------------------------------------------------------

impl Name {
    /// Keep `bytes`, decoded as UTF-8 with replacement characters.
    #[cfg(feature = "alloc")]
    pub fn new(bytes: &[u8]) -> Self {
        Self { text: String::from_utf8_lossy(bytes).into_owned() }
    }

    /// Names cannot be kept without `alloc`.
    #[cfg(not(feature = "alloc"))]
    pub fn new(_bytes: &[u8]) -> Self {
        Self {}
    }

    /// The name, if it could be kept.
    #[cfg(feature = "alloc")]
    pub fn as_str(&self) -> Option<&str> {
        Some(&self.text)
    }

    /// The name, if it could be kept.
    #[cfg(not(feature = "alloc"))]
    pub fn as_str(&self) -> Option<&str> {
        None
    }
}

impl core::fmt::Display for Name {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str().unwrap_or("<unavailable>"))
    }
}
