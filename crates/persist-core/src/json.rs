//! JSON bridge for inspecting and hand-editing state trees.
//!
//! The mapping is lossy in one direction only: JSON has a single number type,
//! so `from_json` picks `Int` for integers that fit in 32 bits, `Long` for
//! other integers and `Double` for everything else. Composites render as
//! objects keyed by component name (`{"x":1.0,"y":2.0}`) and come back as
//! plain objects.

use serde_json::{Map, Number, Value};

use crate::error::{PersistError, Result};
use crate::list::ListState;
use crate::object::ObjectState;
use crate::state::State;

/// Convert a state tree to a JSON value.
///
/// Non-finite floats have no JSON representation and render as `null`.
pub fn to_json(state: &State) -> Value {
    match state {
        State::Bool(value) => Value::Bool(*value),
        State::Int(value) => Value::from(*value),
        State::Long(value) => Value::from(*value),
        State::Float(value) => float_to_json(*value),
        State::Double(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        State::String(value) => Value::String(value.clone()),
        State::List(list) => Value::Array(list.iter().map(to_json).collect()),
        State::Object(object) => Value::Object(
            object
                .iter()
                .map(|(name, value)| (name.clone(), to_json(value)))
                .collect(),
        ),
        composite => Value::Object(
            composite
                .fields()
                .into_iter()
                .map(|(name, value)| (name.into_owned(), to_json(&value)))
                .collect::<Map<_, _>>(),
        ),
    }
}

// Widening through the shortest decimal form keeps `0.1f32` as `0.1` instead
// of `0.10000000149011612`.
fn float_to_json(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// Convert a JSON value to a state tree. `null` and integers beyond the
/// `i64` range are rejected.
pub fn from_json(value: &Value) -> Result<State> {
    Ok(match value {
        Value::Null => {
            return Err(PersistError::UnsupportedJson(
                "null has no state counterpart".to_string(),
            ))
        }
        Value::Bool(value) => State::Bool(*value),
        Value::Number(number) => number_to_state(number)?,
        Value::String(value) => State::String(value.clone()),
        Value::Array(items) => State::List(
            items
                .iter()
                .map(from_json)
                .collect::<Result<ListState>>()?,
        ),
        Value::Object(fields) => {
            let mut object = ObjectState::new();
            for (name, value) in fields {
                object.set(name.clone(), from_json(value)?);
            }
            State::Object(object)
        }
    })
}

fn number_to_state(number: &Number) -> Result<State> {
    if let Some(value) = number.as_i64() {
        return Ok(match i32::try_from(value) {
            Ok(value) => State::Int(value),
            Err(_) => State::Long(value),
        });
    }
    if number.is_u64() {
        return Err(PersistError::UnsupportedJson(format!(
            "integer {number} does not fit in 64 bits"
        )));
    }
    match number.as_f64() {
        Some(value) => Ok(State::Double(value)),
        None => Err(PersistError::UnsupportedJson(format!(
            "number {number} is not representable"
        ))),
    }
}

/// Parse JSON text into a state tree.
pub fn from_json_str(text: &str) -> Result<State> {
    let value: Value = serde_json::from_str(text)?;
    from_json(&value)
}

/// Render a state tree as pretty-printed JSON text.
pub fn to_json_pretty(state: &State) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(state))?)
}
