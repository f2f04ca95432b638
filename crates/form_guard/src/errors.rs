use std::time::Duration;

use thiserror::Error;

use crate::state::FieldErrors;

/// Configuration and usage errors (bad schema, unknown field names, ...).
///
/// Validation failures are never reported through this type; they are plain
/// data in [`FieldErrors`].
#[derive(Error, Debug)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("unknown validation rule: {0}")]
    UnknownRule(String),

    #[error("rule `{rule}` expects {expected} as its value")]
    InvalidRuleValue { rule: String, expected: &'static str },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("custom rules must be attached in code, not loaded from configuration")]
    CustomRuleInConfig,

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a submit request did not complete.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// A submit is in flight (`retry_after: None`) or the throttle window has
    /// not elapsed yet. Validation was not run.
    #[error("submit throttled, {}", retry_hint(.retry_after))]
    Throttled { retry_after: Option<Duration> },

    /// Full-form validation failed; the submit handler was not invoked.
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    /// The submit handler itself failed. `submitting` has been reset.
    #[error("submit handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!("retry in {wait:?}"),
        None => "another submit is in flight".to_string(),
    }
}

impl SubmitError {
    pub fn is_throttled(&self) -> bool {
        matches!(self, SubmitError::Throttled { .. })
    }

    /// The error map of a rejected submit, if that is what this is.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
