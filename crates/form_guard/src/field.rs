//! Form field type & metadata.
//!
//! This module defines the declarative pieces of a form:
//! - `InputKind`: Enumeration of supported input controls
//! - `FieldOption`: One choice of a select / radio / multi-checkbox input
//! - `FieldConfig`: Metadata + ordered validation rules for a single field
//!
//! Everything here is pure data. Mutation lives in `controller.rs`,
//! rule evaluation in `validate.rs`.
//!
//! Usage:
//! ```ignore
//! use form_guard::{FieldConfig, InputKind, ValidationRule};
//!
//! let field = FieldConfig::new("email", "Email Address", InputKind::Email)
//!     .placeholder("john@example.com")
//!     .required()
//!     .rule(ValidationRule::email());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::rule::ValidationRule;

/// The input control a field is rendered as.
///
/// Notes:
/// - `Checkbox` without options is a single boolean toggle
/// - `Checkbox` with options is a multi-select holding an array of values
/// - `Select` / `Radio` hold one option value as a string
/// - `Number` holds the raw input string until sanitization
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Password,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Url,
}

/// One selectable choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declarative description of a form field.
///
/// `rules` are evaluated in order and the first failure wins. With
/// `required` set, an implicit `required` check runs first unless `rules`
/// already contains one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "validators", default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldConfig {
    /// Create a new field definition with no rules.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default_value: None,
            options: Vec::new(),
            required: false,
            rules: Vec::new(),
            placeholder: None,
        }
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Mark the field required (adds the implicit `required` check).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a validation rule.
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// True for a checkbox group holding several option values.
    pub fn is_multi_choice(&self) -> bool {
        self.kind == InputKind::Checkbox && !self.options.is_empty()
    }

    /// True for a single on/off checkbox.
    pub fn is_toggle(&self) -> bool {
        self.kind == InputKind::Checkbox && self.options.is_empty()
    }

    /// Value the field starts with (and returns to on reset).
    pub fn initial_value(&self) -> Value {
        if let Some(v) = &self.default_value {
            return v.clone();
        }
        if self.is_multi_choice() {
            Value::Array(Vec::new())
        } else if self.is_toggle() {
            Value::Bool(false)
        } else {
            Value::String(String::new())
        }
    }

    /// Whether the implicit `required` check applies.
    pub(crate) fn needs_implicit_required(&self) -> bool {
        self.required && !self.rules.iter().any(ValidationRule::is_required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_value_by_kind() {
        let text = FieldConfig::new("name", "Name", InputKind::Text);
        assert_eq!(text.initial_value(), json!(""));

        let agree = FieldConfig::new("agree", "Agree", InputKind::Checkbox);
        assert_eq!(agree.initial_value(), json!(false));

        let skills = FieldConfig::new("skills", "Skills", InputKind::Checkbox)
            .options(vec![FieldOption::new("rust", "Rust")]);
        assert_eq!(skills.initial_value(), json!([]));

        let years = FieldConfig::new("years", "Years", InputKind::Number).default_value(5);
        assert_eq!(years.initial_value(), json!(5));
    }

    #[test]
    fn implicit_required_only_without_explicit_rule() {
        let implicit = FieldConfig::new("a", "A", InputKind::Text).required();
        assert!(implicit.needs_implicit_required());

        let explicit = FieldConfig::new("a", "A", InputKind::Text)
            .required()
            .rule(ValidationRule::required().with_message("Name please"));
        assert!(!explicit.needs_implicit_required());
    }

    #[test]
    fn input_kind_names() {
        assert_eq!(InputKind::Tel.to_string(), "tel");
        assert_eq!("checkbox".parse::<InputKind>().ok(), Some(InputKind::Checkbox));
    }
}
