//! Validation engine.
//!
//! Pure functions only: nothing here touches controller state. Rules of a
//! field are evaluated in order and evaluation stops at the first failure.
//! Rules other than `required` and custom predicates accept empty values, so
//! optional fields may stay blank.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::{
    field::FieldConfig,
    rule::{RuleKind, ValidationRule},
    state::{FieldError, FieldErrors, FormValues},
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL regex failed")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9 ().\-]{7,20}$").expect("PHONE regex failed")
});

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// Outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

/// Whether a value counts as "not filled in".
///
/// Empty: `null`, a string that is blank after trimming, an empty array or
/// object, and `false` (an unchecked box). Numbers are never empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(_) => false,
    }
}

/// Run `rules` against `value`, stopping at the first failure.
///
/// `values` is the full form, handed to custom predicates.
pub fn validate_field(
    value: &Value,
    rules: &[ValidationRule],
    values: &FormValues,
) -> Result<(), String> {
    for rule in rules {
        if !check_rule(&rule.kind, value, values) {
            trace!(rule = %rule.name(), "rule failed");
            return Err(rule.message());
        }
    }
    Ok(())
}

/// Validate one configured field, including its implicit `required` check.
pub fn validate_config(field: &FieldConfig, values: &FormValues) -> Result<(), String> {
    let missing = Value::Null;
    let value = values.get(&field.name).unwrap_or(&missing);
    if field.needs_implicit_required() && is_empty(value) {
        return Err(RuleKind::Required.default_message());
    }
    validate_field(value, &field.rules, values)
}

/// Validate every configured field and return the failing ones, in
/// declaration order. An empty map means the form is valid.
pub fn validate_form(values: &FormValues, fields: &[FieldConfig]) -> FieldErrors {
    fields
        .iter()
        .filter_map(|field| {
            validate_config(field, values)
                .err()
                .map(|message| (field.name.clone(), message))
        })
        .collect()
}

/// [`validate_form`] packaged as a [`ValidationResult`].
pub fn validate_form_result(values: &FormValues, fields: &[FieldConfig]) -> ValidationResult {
    let errors: Vec<FieldError> = validate_form(values, fields)
        .into_iter()
        .map(|(field, message)| FieldError { field, message })
        .collect();
    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Single dispatch point for every rule kind.
fn check_rule(kind: &RuleKind, value: &Value, values: &FormValues) -> bool {
    match kind {
        RuleKind::Required => !is_empty(value),
        RuleKind::Custom(predicate) => predicate.check(value, values),
        _ if is_empty(value) => true,
        RuleKind::Email => value.as_str().is_some_and(|s| EMAIL.is_match(s.trim())),
        RuleKind::Phone => value.as_str().is_some_and(is_phone),
        RuleKind::MinLength(min) => length_of(value).is_some_and(|len| len >= *min),
        RuleKind::MaxLength(max) => length_of(value).is_some_and(|len| len <= *max),
        RuleKind::Number => as_number(value).is_some(),
        RuleKind::Min(min) => as_number(value).is_some_and(|n| n >= *min),
        RuleKind::Max(max) => as_number(value).is_some_and(|n| n <= *max),
        RuleKind::Pattern(re) => match value {
            Value::String(s) => re.is_match(s),
            Value::Number(n) => re.is_match(&n.to_string()),
            _ => false,
        },
    }
}

fn is_phone(s: &str) -> bool {
    let s = s.trim();
    PHONE.is_match(s) && PHONE_DIGITS.contains(&s.chars().filter(char::is_ascii_digit).count())
}

/// Length for the `minLength` / `maxLength` rules: characters of a string,
/// items of an array. Other shapes have no length.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Parse a value as a finite number. Strings are trimmed first.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}
