use std::collections::{BTreeMap, HashMap};

use canon::stream::{from_bytes, to_bytes};
use canon::value::{Value, from_value, to_value};
use canon::{Error, ErrorKind, Shape};

use crate::utility::{stream_round_trip, value_round_trip};

#[test]
fn composites_round_trip() -> Result<(), Error> {
    let map = BTreeMap::from([("a".to_string(), vec![1u32, 2]), ("b".to_string(), vec![])]);
    assert_eq!(value_round_trip(&map)?, map);
    assert_eq!(stream_round_trip(&map)?, map);

    let lookup = HashMap::from([(1u8, Some(0.5f32)), (2, None)]);
    assert_eq!(value_round_trip(&lookup)?, lookup);
    assert_eq!(stream_round_trip(&lookup)?, lookup);

    let nested = (Box::new(3i8), vec![(true, ())], "s".to_string().into_boxed_str());
    assert_eq!(value_round_trip(&nested)?, nested);
    assert_eq!(stream_round_trip(&nested)?, nested);
    Ok(())
}

#[test]
fn value_through_stream() -> Result<(), Error> {
    let original = (vec!["x".to_string()], BTreeMap::from([(1u8, -1i64)]));
    let value: Value = from_bytes(&to_bytes(&original)?)?;
    assert_eq!(value, to_value(&original)?);
    assert_eq!(from_value::<(Vec<String>, BTreeMap<u8, i64>)>(&value)?, original);
    Ok(())
}

#[test]
fn duplicate_map_keys_keep_the_last() -> Result<(), Error> {
    let value = Value::Map(vec![(Value::Int(1), Value::Bool(false)), (Value::Int(1), Value::Bool(true))]);
    assert_eq!(from_value::<BTreeMap<u8, bool>>(&value)?, BTreeMap::from([(1, true)]));
    Ok(())
}

#[test]
fn integer_beyond_i128() {
    assert_eq!(to_value(&u128::MAX), Err(ErrorKind::InvalidValue(Shape::Integer).into()));
}

#[test]
fn wrong_shape() {
    let error = from_value::<Vec<u8>>(&Value::Bool(true)).map_err(|error| error.kind().clone());
    assert!(matches!(error, Err(ErrorKind::InvalidType { actual: Shape::Bool, .. })));
}
