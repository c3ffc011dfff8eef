//! Members of closed enumerations.

use core::any::Any;

/// A fieldless enum whose members are identified by an ordinal and a name.
///
/// Usually implemented with `#[derive(Variant)]`:
///
/// ```
/// use canon::Variant;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Variant)]
/// enum Color {
///     Red,
///     Green,
///     Blue,
/// }
///
/// assert_eq!(Color::VARIANTS, &["Red", "Green", "Blue"]);
/// assert_eq!(Color::from_ordinal(1), Some(Color::Green));
/// assert_eq!(Color::from_name(b"Blue"), Some(Color::Blue));
/// assert_eq!(Color::Red.name(), "Red");
/// ```
pub trait Variant: Copy + 'static {
    /// The names of the members, indexed by their ordinals.
    const VARIANTS: &'static [&'static str];

    /// The zero-based position of this member in [`Self::VARIANTS`].
    fn ordinal(self) -> usize;

    /// The member at `ordinal`, if there is one.
    fn from_ordinal(ordinal: usize) -> Option<Self>;

    /// The name of this member.
    fn name(self) -> &'static str {
        Self::VARIANTS.get(self.ordinal()).copied().unwrap_or_default()
    }

    /// The member called exactly `name`, if there is one.
    fn from_name(name: &[u8]) -> Option<Self> {
        let ordinal = Self::VARIANTS.iter().position(|candidate| candidate.as_bytes() == name)?;
        Self::from_ordinal(ordinal)
    }
}

/// The tag a [`crate::de::Deserializer`] hands to
/// [`crate::de::Visitor::visit_variant`].
///
/// Every [`Variant`] is a tag of itself. Backends that do not know the
/// concrete enum type present a [`TagRef`] instead.
pub trait Tag {
    /// The ordinal of the member within its enumeration.
    fn ordinal(&self) -> usize;

    /// The name of the member.
    fn name(&self) -> &str;

    /// The member itself, if this tag is typed as `T`.
    fn cast<T: Variant>(&self) -> Option<T> {
        None
    }
}

/// A tag known only by its name and ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagRef<'a> {
    name: &'a str,
    ordinal: usize,
}

impl<'a> TagRef<'a> {
    /// Create a tag.
    pub fn new(name: &'a str, ordinal: usize) -> Self {
        Self { name, ordinal }
    }
}

impl Tag for TagRef<'_> {
    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<V: Variant> Tag for V {
    fn ordinal(&self) -> usize {
        Variant::ordinal(*self)
    }

    fn name(&self) -> &str {
        Variant::name(*self)
    }

    fn cast<T: Variant>(&self) -> Option<T> {
        (self as &dyn Any).downcast_ref::<T>().copied()
    }
}
