use odbc_api::{Bit, IntoParameter, parameter::InputParameter};

use crate::{
    Value,
    date_time::{date_to_text, time_to_text, timestamp_to_text},
};

/// Binds a [`Value`] as an input parameter. Integers, doubles and booleans are bound natively,
/// binary as binary. Everything else is sent as text and converted by the driver.
pub fn to_input_parameter(value: &Value) -> Box<dyn InputParameter> {
    match value {
        Value::Null => Box::new(None::<String>.into_parameter()),
        Value::Boolean(b) => Box::new(Bit::from_bool(*b)),
        Value::Integer(i) => Box::new(*i),
        Value::Double(d) => Box::new(*d),
        Value::Decimal(text) | Value::Text(text) => Box::new(text.clone().into_parameter()),
        Value::Binary(bytes) => Box::new(bytes.clone().into_parameter()),
        Value::Date(date) => Box::new(date_to_text(date).into_parameter()),
        Value::Time(time) => Box::new(time_to_text(time).into_parameter()),
        Value::Timestamp(timestamp) => Box::new(timestamp_to_text(timestamp).into_parameter()),
    }
}
