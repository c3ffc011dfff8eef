use canon::de::Deserialize;
use canon::error::Error;
use canon::ser::Serialize;
use canon::stream::{from_bytes, to_bytes};
use canon::value::{from_value, to_value};

pub fn stream_round_trip<Value: Serialize + Deserialize>(value: &Value) -> Result<Value, Error> {
    from_bytes(&to_bytes(value)?)
}

pub fn value_round_trip<Value: Serialize + Deserialize>(value: &Value) -> Result<Value, Error> {
    from_value(&to_value(value)?)
}
