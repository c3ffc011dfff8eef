use canon::allocator::Limited;
use canon::error::DeserializeError;
use canon::value::{Value, from_value, from_value_in, to_value};
use canon::{Deserialize, Error, ErrorKind, Serialize};

use crate::utility::{stream_round_trip, value_round_trip};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Server {
    host: String,
    port: u16,
    #[canon(rename = "tags")]
    labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[canon(rename = "Configuration")]
struct Config {
    server: Server,
    verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pair(u8, String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Marker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Empty {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Wrapper<T> {
    inner: T,
}

fn server() -> Server {
    Server { host: "localhost".into(), port: 8080, labels: vec!["a".into(), "b".into()] }
}

fn text(value: &str) -> Value {
    Value::String(value.as_bytes().to_vec())
}

fn fields(entries: Vec<(&str, Value)>) -> Value {
    Value::Map(entries.into_iter().map(|(name, value)| (text(name), value)).collect())
}

//------------------------------------------------------------------------------
// Round trips
//------------------------------------------------------------------------------

#[test]
fn named_round_trip() -> Result<(), Error> {
    let config = Config { server: server(), verbose: Some(true) };
    assert_eq!(stream_round_trip(&config)?, config);
    assert_eq!(value_round_trip(&config)?, config);
    Ok(())
}

#[test]
fn named_as_value() -> Result<(), Error> {
    let Value::Struct { name, fields } = to_value(&server())? else {
        panic!("expected a struct");
    };
    assert_eq!(name, "Server");
    let names: Vec<_> = fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["host", "port", "tags"]);
    Ok(())
}

#[test]
fn renamed_struct() -> Result<(), Error> {
    let value = to_value(&Config { server: server(), verbose: None })?;
    assert!(matches!(value, Value::Struct { name, .. } if name == "Configuration"));
    Ok(())
}

#[test]
fn tuple_round_trip() -> Result<(), Error> {
    let pair = Pair(1, "one".into());
    assert_eq!(stream_round_trip(&pair)?, pair);
    assert_eq!(to_value(&pair)?, Value::Tuple(vec![Value::Int(1), text("one")]));
    Ok(())
}

#[test]
fn unit_and_empty() -> Result<(), Error> {
    assert_eq!(to_value(&Marker)?, Value::Void);
    assert_eq!(stream_round_trip(&Marker)?, Marker);
    assert_eq!(stream_round_trip(&Empty {})?, Empty {});
    Ok(())
}

#[test]
fn generic() -> Result<(), Error> {
    let wrapped = Wrapper { inner: Wrapper { inner: 5u64 } };
    assert_eq!(stream_round_trip(&wrapped)?, wrapped);
    assert_eq!(value_round_trip(&Wrapper { inner: "x".to_string() })?.inner, "x");
    Ok(())
}

//------------------------------------------------------------------------------
// Input variations
//------------------------------------------------------------------------------

#[test]
fn from_map_in_any_order() -> Result<(), Error> {
    let input = fields(vec![("tags", Value::Seq(vec![])), ("port", Value::Int(1)), ("host", text("h"))]);
    assert_eq!(from_value::<Server>(&input)?, Server { host: "h".into(), port: 1, labels: vec![] });
    Ok(())
}

#[test]
fn from_sequence() -> Result<(), Error> {
    let input = Value::Seq(vec![text("h"), Value::Int(1), Value::Seq(vec![text("t")])]);
    assert_eq!(from_value::<Server>(&input)?, Server { host: "h".into(), port: 1, labels: vec!["t".into()] });
    Ok(())
}

//------------------------------------------------------------------------------
// Failures
//------------------------------------------------------------------------------

#[test]
fn missing_field_releases_the_others() {
    let input = fields(vec![("host", text("h")), ("tags", Value::Seq(vec![text("t")]))]);
    let allocator = Limited::new(4096);
    assert_eq!(from_value_in::<Server, _>(&allocator, &input), Err(ErrorKind::MissingField("port").into()));
    assert!(allocator.peak() > 0);
    assert_eq!(allocator.live(), 0);
}

#[test]
fn duplicate_field() {
    let input = fields(vec![("port", Value::Int(1)), ("host", text("h")), ("port", Value::Int(2))]);
    let allocator = Limited::new(4096);
    assert_eq!(from_value_in::<Server, _>(&allocator, &input), Err(ErrorKind::DuplicateField("port").into()));
    assert_eq!(allocator.live(), 0);
}

#[test]
fn unknown_field() {
    let input = fields(vec![("host", text("h")), ("extra", Value::Null)]);
    assert_eq!(from_value::<Server>(&input), Err(Error::unknown_field(b"extra", &["host", "port", "tags"])));
}

#[test]
fn nested_error_names_the_path() {
    let input = fields(vec![
        ("server", fields(vec![("host", text("h")), ("port", text("80")), ("tags", Value::Seq(vec![]))])),
        ("verbose", Value::Null),
    ]);
    let error = from_value::<Config>(&input).expect_err("the port is a string");
    assert_eq!(error.to_string(), ".server.port: invalid type: string, expected integer");
}

#[test]
fn tuple_length() {
    let short = Value::Tuple(vec![Value::Int(1)]);
    assert_eq!(from_value::<Pair>(&short), Err(ErrorKind::InvalidLength { len: 1, expected: 2 }.into()));
    let long = Value::Tuple(vec![Value::Int(1), text("a"), Value::Int(2)]);
    let allocator = Limited::new(4096);
    assert_eq!(
        from_value_in::<Pair, _>(&allocator, &long),
        Err(ErrorKind::InvalidLength { len: 3, expected: 2 }.into())
    );
    assert_eq!(allocator.live(), 0);
}

#[test]
fn serialize_error_names_the_field() {
    let error = to_value(&Wrapper { inner: u128::MAX }).expect_err("beyond the value backend's integers");
    assert_eq!(error.kind(), &ErrorKind::InvalidValue(canon::Shape::Integer));
    assert_eq!(error.to_string(), ".inner: the integer value cannot be represented by the target");
}
