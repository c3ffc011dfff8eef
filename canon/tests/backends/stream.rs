use canon::allocator::Limited;
use canon::byte_order::ByteOrder;
use canon::de::{Deserialize, Ignored};
use canon::io::{FixedMemoryStream, GrowingMemoryStream, StdStream};
use canon::ser::{SerializeSeq, Serialize, Serializer};
use canon::stream::{StreamDeserializer, StreamSerializer, from_bytes, from_bytes_in, to_bytes};
use canon::{Error, ErrorKind};
use rstest::rstest;

use crate::utility::stream_round_trip;

/// Counts down to zero in a sequence of unknown length.
struct Countdown(u8);

impl Serialize for Countdown {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for value in (0..=self.0).rev() {
            seq.serialize_element(&value)?;
        }
        seq.finish()
    }
}

/// Begins a sequence and walks away from it.
struct Abandon;

impl Serialize for Abandon {
    fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
        drop(serializer.serialize_seq(Some(1))?);
        serializer.serialize_null()
    }
}

//------------------------------------------------------------------------------
// Round trips
//------------------------------------------------------------------------------

#[rstest]
#[case(i64::MIN)]
#[case(-1)]
#[case(0)]
#[case(i64::MAX)]
fn signed(#[case] value: i64) -> Result<(), Error> {
    assert_eq!(stream_round_trip(&value)?, value);
    Ok(())
}

#[rstest]
#[case(0)]
#[case(u128::from(u64::MAX) + 1)]
#[case(u128::MAX)]
fn unsigned(#[case] value: u128) -> Result<(), Error> {
    assert_eq!(stream_round_trip(&value)?, value);
    Ok(())
}

#[rstest]
#[case(0.0)]
#[case(-1.5)]
#[case(f64::MAX)]
#[case(f64::INFINITY)]
fn float(#[case] value: f64) -> Result<(), Error> {
    assert_eq!(stream_round_trip(&value)?, value);
    Ok(())
}

#[rstest]
#[case("")]
#[case("hi")]
#[case("árvíztűrő tükörfúrógép")]
fn string(#[case] value: &str) -> Result<(), Error> {
    assert_eq!(stream_round_trip(&value.to_string())?, value);
    Ok(())
}

#[test]
fn option() -> Result<(), Error> {
    assert_eq!(stream_round_trip(&Some(5u8))?, Some(5));
    assert_eq!(stream_round_trip(&None::<u8>)?, None);
    Ok(())
}

#[test]
fn open_sequence() -> Result<(), Error> {
    let bytes = to_bytes(&Countdown(2))?;
    assert_eq!(bytes.first(), Some(&0x0C));
    assert_eq!(bytes.last(), Some(&0xFF));
    assert_eq!(from_bytes::<Vec<u8>>(&bytes)?, vec![2, 1, 0]);
    Ok(())
}

#[test]
fn narrowing_checks_range() -> Result<(), Error> {
    let bytes = to_bytes(&300u16)?;
    assert_eq!(from_bytes::<u16>(&bytes)?, 300);
    assert_eq!(from_bytes::<u8>(&bytes), Err(ErrorKind::InvalidValue(canon::Shape::Integer).into()));
    Ok(())
}

//------------------------------------------------------------------------------
// Configuration
//------------------------------------------------------------------------------

#[test]
fn little_endian() -> Result<(), Error> {
    let mut serializer = StreamSerializer::new(GrowingMemoryStream::new()).set_byte_order(ByteOrder::LittleEndian);
    0x0102u16.serialize(&mut serializer)?;
    let bytes = serializer.take().take();
    assert_eq!(bytes, [0x05, 0x02, 0x01, 0, 0, 0, 0, 0, 0]);

    let mut deserializer = StreamDeserializer::new(FixedMemoryStream::new(&bytes)).little_endian();
    assert_eq!(u16::deserialize(&canon::allocator::Global, &mut deserializer)?, 0x0102);

    let mut deserializer = StreamDeserializer::new(FixedMemoryStream::new(&bytes)).big_endian();
    assert_eq!(
        u16::deserialize(&canon::allocator::Global, &mut deserializer),
        Err(ErrorKind::InvalidValue(canon::Shape::Integer).into())
    );
    Ok(())
}

#[test]
fn std_streams() -> Result<(), Error> {
    let mut serializer = StreamSerializer::new(StdStream::new(Vec::new()));
    (7u8, "seven").serialize(&mut serializer)?;
    let bytes = serializer.take().take();

    let mut deserializer = StreamDeserializer::new(StdStream::new(&bytes[..]));
    let value = <(u8, String)>::deserialize(&canon::allocator::Global, &mut deserializer)?;
    assert_eq!(value, (7, "seven".to_string()));
    deserializer.end()
}

#[test]
fn std_stream_bounds_long_strings() -> Result<(), Error> {
    let bytes = to_bytes(&"x".repeat(1 << 20))?;
    let allocator = Limited::new(16);
    let mut deserializer = StreamDeserializer::new(StdStream::new(&bytes[..]).max_slice(1024));
    assert_eq!(String::deserialize(&allocator, &mut deserializer), Err(ErrorKind::LengthOverflow.into()));
    assert_eq!(allocator.peak(), 0);
    Ok(())
}

#[test]
fn default_depth_limit() {
    let mut bytes = vec![0x0C; 200];
    bytes.extend([0xFF; 200]);
    assert_eq!(from_bytes::<Ignored>(&bytes), Err(ErrorKind::DepthLimitExceeded.into()));
}

#[test]
fn custom_depth_limit() -> Result<(), Error> {
    let bytes = to_bytes(&vec![vec![vec![1u8]]])?;
    let mut deserializer = StreamDeserializer::new(FixedMemoryStream::new(&bytes)).max_depth(2);
    assert_eq!(
        Vec::<Vec<Vec<u8>>>::deserialize(&canon::allocator::Global, &mut deserializer),
        Err(ErrorKind::DepthLimitExceeded.into())
    );
    Ok(())
}

//------------------------------------------------------------------------------
// Failures
//------------------------------------------------------------------------------

#[test]
fn trailing_bytes_release_the_value() -> Result<(), Error> {
    let mut bytes = to_bytes("hi")?;
    bytes.push(0x01);
    let allocator = Limited::new(1024);
    assert_eq!(from_bytes_in::<String, _>(&allocator, &bytes), Err(ErrorKind::TrailingBytes.into()));
    assert!(allocator.peak() > 0);
    assert_eq!(allocator.live(), 0);
    Ok(())
}

#[test]
fn truncated_input() -> Result<(), Error> {
    let bytes = to_bytes(&(1u32, 2u32))?;
    assert_eq!(from_bytes::<(u32, u32)>(&bytes[..bytes.len() - 1]), Err(ErrorKind::UnexpectedEof.into()));
    Ok(())
}

#[test]
fn abandoned_builder_poisons() {
    let mut serializer = StreamSerializer::new(GrowingMemoryStream::new());
    assert_eq!(Abandon.serialize(&mut serializer), Err(ErrorKind::Poisoned.into()));
    assert!(serializer.is_poisoned());
}

#[test]
fn short_sequence_poisons() {
    struct Short;

    impl Serialize for Short {
        fn serialize<S: Serializer>(&self, serializer: &mut S) -> Result<S::Success, S::Error> {
            let mut seq = serializer.serialize_seq(Some(2))?;
            seq.serialize_element(&1u8)?;
            seq.finish()
        }
    }

    assert_eq!(to_bytes(&Short), Err(ErrorKind::InvalidLength { len: 1, expected: 2 }.into()));
}
