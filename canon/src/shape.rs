//! The canonical shapes of the data model.

use bitflags::bitflags;

/// The closed set of categories every value is classified into.
///
/// A [`crate::ser::Serialize`] implementation maps its type to exactly one
/// shape, and a [`crate::de::Deserializer`] presents every input as exactly
/// one shape to the [`crate::de::Visitor`] it is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape {
    /// `true` or `false`.
    Bool,
    /// An integer of any width and signedness.
    Integer,
    /// A floating point number of any width.
    Float,
    /// The absence of a value, as in [`None`].
    Null,
    /// A value without content, as in `()`.
    Void,
    /// A sequence of bytes.
    String,
    /// A homogeneous, variable-length sequence of values.
    Sequence,
    /// A collection of key-value pairs.
    Map,
    /// A named collection of named fields.
    Struct,
    /// A fixed-length, heterogeneous sequence of values.
    Tuple,
    /// A member of a closed enumeration.
    Variant,
}

bitflags! {
    /// A set of [`Shape`]s.
    ///
    /// Visitors use it to declare what they accept, errors use it to report
    /// what was expected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Shapes: u16 {
        /// [`Shape::Bool`].
        const BOOL = 1 << 0;
        /// [`Shape::Integer`].
        const INTEGER = 1 << 1;
        /// [`Shape::Float`].
        const FLOAT = 1 << 2;
        /// [`Shape::Null`].
        const NULL = 1 << 3;
        /// [`Shape::Void`].
        const VOID = 1 << 4;
        /// [`Shape::String`].
        const STRING = 1 << 5;
        /// [`Shape::Sequence`].
        const SEQUENCE = 1 << 6;
        /// [`Shape::Map`].
        const MAP = 1 << 7;
        /// [`Shape::Struct`].
        const STRUCT = 1 << 8;
        /// [`Shape::Tuple`].
        const TUPLE = 1 << 9;
        /// [`Shape::Variant`].
        const VARIANT = 1 << 10;
    }
}

impl Shape {
    /// All shapes, in declaration order.
    pub const ALL: [Shape; 11] = [
        Shape::Bool,
        Shape::Integer,
        Shape::Float,
        Shape::Null,
        Shape::Void,
        Shape::String,
        Shape::Sequence,
        Shape::Map,
        Shape::Struct,
        Shape::Tuple,
        Shape::Variant,
    ];

    /// The lowercase name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Shape::Bool => "bool",
            Shape::Integer => "integer",
            Shape::Float => "float",
            Shape::Null => "null",
            Shape::Void => "void",
            Shape::String => "string",
            Shape::Sequence => "sequence",
            Shape::Map => "map",
            Shape::Struct => "struct",
            Shape::Tuple => "tuple",
            Shape::Variant => "variant",
        }
    }
}

impl Shapes {
    /// Whether `shape` is a member of this set.
    pub fn accepts(self, shape: Shape) -> bool {
        self.contains(shape.into())
    }

    /// Iterate over the member shapes in declaration order.
    pub fn shapes(self) -> impl Iterator<Item = Shape> {
        Shape::ALL.into_iter().filter(move |shape| self.accepts(*shape))
    }
}

impl From<Shape> for Shapes {
    fn from(value: Shape) -> Self {
        match value {
            Shape::Bool => Shapes::BOOL,
            Shape::Integer => Shapes::INTEGER,
            Shape::Float => Shapes::FLOAT,
            Shape::Null => Shapes::NULL,
            Shape::Void => Shapes::VOID,
            Shape::String => Shapes::STRING,
            Shape::Sequence => Shapes::SEQUENCE,
            Shape::Map => Shapes::MAP,
            Shape::Struct => Shapes::STRUCT,
            Shape::Tuple => Shapes::TUPLE,
            Shape::Variant => Shapes::VARIANT,
        }
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::fmt::Display for Shapes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let count = self.shapes().count();
        if count == 0 {
            return f.write_str("nothing");
        }
        for (index, shape) in self.shapes().enumerate() {
            match index {
                0 => write!(f, "{shape}")?,
                _ if index + 1 == count => write!(f, " or {shape}")?,
                _ => write!(f, ", {shape}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_its_own_flag() {
        let all = Shape::ALL.into_iter().fold(Shapes::empty(), |acc, shape| {
            assert!(!acc.accepts(shape));
            acc | shape.into()
        });
        assert_eq!(all, Shapes::all());
    }

    #[test]
    fn iterate_members() {
        let shapes = Shapes::STRING | Shapes::INTEGER | Shapes::VARIANT;
        assert!(shapes.shapes().eq([Shape::Integer, Shape::String, Shape::Variant]));
    }

    #[test]
    fn display_single() {
        assert_eq!(format!("{}", Shapes::BOOL), "bool");
    }

    #[test]
    fn display_list() {
        let shapes = Shapes::STRING | Shapes::INTEGER | Shapes::VARIANT;
        assert_eq!(format!("{shapes}"), "integer, string or variant");
    }

    #[test]
    fn display_empty() {
        assert_eq!(format!("{}", Shapes::empty()), "nothing");
    }
}
