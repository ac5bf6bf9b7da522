//! Conversion between ledger fields and Firestore typed values.
use std::collections::BTreeMap;

use api_types::document::Value;
use engine::{FieldValue, Fields};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub(crate) fn encode_fields(fields: &Fields) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode(value)))
        .collect()
}

pub(crate) fn decode_fields(raw: BTreeMap<String, Value>) -> Fields {
    raw.into_iter()
        .filter_map(|(name, value)| decode(value).map(|value| (name, value)))
        .collect()
}

fn encode(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::StringValue(text.clone()),
        FieldValue::Number(number) if !number.is_finite() => Value::NullValue(()),
        FieldValue::Number(number) if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER => {
            Value::IntegerValue(format!("{}", *number as i64))
        }
        FieldValue::Number(number) => Value::DoubleValue(*number),
    }
}

fn decode(value: Value) -> Option<FieldValue> {
    match value {
        Value::StringValue(text) | Value::TimestampValue(text) => Some(FieldValue::Text(text)),
        Value::IntegerValue(raw) => match raw.parse::<i64>() {
            Ok(number) => Some(FieldValue::Number(number as f64)),
            Err(_) => Some(FieldValue::Text(raw)),
        },
        Value::DoubleValue(number) => Some(FieldValue::Number(number)),
        Value::BooleanValue(flag) => Some(FieldValue::Text(flag.to_string())),
        Value::ReferenceValue(path) => Some(FieldValue::Text(path)),
        Value::NullValue(())
        | Value::BytesValue(_)
        | Value::GeoPointValue(_)
        | Value::ArrayValue(_)
        | Value::MapValue(_) => None,
    }
}

/// Field path for an update mask; names outside `[A-Za-z_][A-Za-z0-9_]*` are
/// backquoted.
pub(crate) fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
