use canon::error::DeserializeError;
use canon::stream::{from_bytes, to_bytes};
use canon::value::{Value, VariantTag, from_value, to_value};
use canon::{Deserialize, Error, ErrorKind, Serialize, Shape, Shapes, Variant};
use rstest::rstest;

use crate::utility::{stream_round_trip, value_round_trip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Variant)]
enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Variant)]
enum Level {
    #[canon(rename = "low")]
    Low,
    #[canon(rename = "high")]
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Variant)]
enum Uninhabited {}

fn text(value: &str) -> Value {
    Value::String(value.as_bytes().to_vec())
}

#[test]
fn variants() {
    assert_eq!(Color::VARIANTS, ["Red", "Green", "Blue"]);
    assert_eq!(Level::VARIANTS, ["low", "high"]);
    assert_eq!(Uninhabited::VARIANTS.len(), 0);
    assert_eq!(Uninhabited::from_ordinal(0), None);
    assert_eq!(Color::Blue.ordinal(), 2);
    assert_eq!(Level::from_name(b"high"), Some(Level::High));
}

#[test]
fn round_trip() -> Result<(), Error> {
    for color in [Color::Red, Color::Green, Color::Blue] {
        assert_eq!(stream_round_trip(&color)?, color);
        assert_eq!(value_round_trip(&color)?, color);
    }
    assert_eq!(stream_round_trip(&Level::High)?, Level::High);
    Ok(())
}

#[test]
fn encoded_as_variant() -> Result<(), Error> {
    assert_eq!(to_value(&Color::Green)?, Value::Variant(VariantTag { name: "Green".into(), ordinal: 1 }));
    assert_eq!(canon::ser::shape_of(&Color::Green)?, Shape::Variant);
    assert_eq!(to_bytes(&Color::Blue)?, [0x12, 0, 0, 0, 2, 0, 0, 0, 4, b'B', b'l', b'u', b'e']);
    Ok(())
}

#[rstest]
#[case(Value::Int(0), Color::Red)]
#[case(Value::Int(1), Color::Green)]
#[case(text("Blue"), Color::Blue)]
#[case(Value::Variant(VariantTag { name: "Green".into(), ordinal: 7 }), Color::Green)]
fn resolve(#[case] input: Value, #[case] expected: Color) -> Result<(), Error> {
    assert_eq!(from_value::<Color>(&input)?, expected);
    Ok(())
}

#[rstest]
#[case(Value::Int(99), ErrorKind::UnknownOrdinal { ordinal: 99, expected: Color::VARIANTS })]
#[case(Value::Int(-1), ErrorKind::UnknownOrdinal { ordinal: -1, expected: Color::VARIANTS })]
#[case(text("Purple"), Error::unknown_variant(b"Purple", Color::VARIANTS).kind().clone())]
#[case(text("blue"), Error::unknown_variant(b"blue", Color::VARIANTS).kind().clone())]
#[case(
    Value::Bool(true),
    ErrorKind::InvalidType { expected: Shapes::INTEGER | Shapes::STRING | Shapes::VARIANT, actual: Shape::Bool }
)]
fn reject(#[case] input: Value, #[case] expected: ErrorKind) {
    assert_eq!(from_value::<Color>(&input), Err(expected.into()));
}

#[test]
fn ordinal_through_stream() -> Result<(), Error> {
    assert_eq!(from_bytes::<Color>(&to_bytes(&1u8)?)?, Color::Green);
    assert_eq!(from_bytes::<Level>(&to_bytes("low")?)?, Level::Low);
    Ok(())
}

#[test]
fn foreign_variant_by_name() -> Result<(), Error> {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Variant)]
    enum Paint {
        Blue,
    }

    assert_eq!(from_bytes::<Color>(&to_bytes(&Paint::Blue)?)?, Color::Blue);
    Ok(())
}
