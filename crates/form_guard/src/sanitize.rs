//! Submit-ready values.
//!
//! `sanitize_values` drops values of fields that are no longer configured,
//! fills in missing fields from their defaults and coerces each value to the
//! shape its input kind implies.

use serde_json::{Number, Value};

use crate::{
    field::{FieldConfig, InputKind},
    state::FormValues,
};

/// Build the map handed to a submit handler. Output order is declaration
/// order; the input is not modified.
pub fn sanitize_values(values: &FormValues, fields: &[FieldConfig]) -> FormValues {
    fields
        .iter()
        .map(|field| {
            let raw = values
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| field.initial_value());
            (field.name.clone(), coerce(field, raw))
        })
        .collect()
}

fn coerce(field: &FieldConfig, value: Value) -> Value {
    match field.kind {
        InputKind::Number => coerce_number(value),
        InputKind::Checkbox if field.is_multi_choice() => coerce_choices(value),
        InputKind::Checkbox => coerce_bool(value),
        InputKind::Email | InputKind::Tel => match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        },
        _ => value,
    }
}

/// Numeric strings become JSON numbers (integers stay integers). Blank
/// input becomes `null`; anything unparsable is passed through untouched.
fn coerce_number(value: Value) -> Value {
    let Value::String(s) = &value else {
        return value;
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Number(n.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(value)
}

fn coerce_bool(value: Value) -> Value {
    match value {
        Value::Bool(_) => value,
        Value::Null => Value::Bool(false),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Value::Bool(true),
            "false" | "off" | "0" | "no" | "" => Value::Bool(false),
            _ => Value::String(s),
        },
        Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|n| n != 0.0)),
        other => other,
    }
}

fn coerce_choices(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Value::Array(Vec::new()),
        Value::String(s) => Value::Array(vec![Value::String(s)]),
        other => other,
    }
}
