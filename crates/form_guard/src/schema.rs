//! Form schema definition.
//!
//! `FormSchema` groups the ordered `FieldConfig` list with presentation
//! metadata (title, description) and the behavioural knobs in
//! `FormOptions` (validation mode, submit throttle).
//!
//! Schemas are built in code or loaded from TOML / JSON:
//! ```toml
//! title = "Sign up"
//! mode = "onBlur"
//! submitThrottleMs = 2000
//!
//! [[fields]]
//! name = "email"
//! label = "Email Address"
//! type = "email"
//! required = true
//! validators = ["required", "email"]
//!
//! [[fields]]
//! name = "name"
//! label = "Full Name"
//! validators = [{ type = "minLength", value = 2, message = "Min 2 characters" }]
//! ```

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{errors::FormError, field::FieldConfig, state::FormValues};

/// Which single-field events re-validate that field. Submitting always
/// validates every field regardless of mode.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ValidationMode {
    #[default]
    OnChange,
    OnBlur,
    OnSubmit,
}

/// Behavioural settings of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    pub mode: ValidationMode,
    /// Minimum time between accepted submits, in milliseconds. Zero only
    /// blocks submits while one is in flight.
    pub submit_throttle_ms: u64,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            submit_throttle_ms: 1000,
        }
    }
}

impl FormOptions {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.submit_throttle_ms)
    }
}

/// Declarative schema for a multi-field form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub options: FormOptions,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl FormSchema {
    /// Create a schema with default options and no title.
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn submit_throttle_ms(mut self, ms: u64) -> Self {
        self.options.submit_throttle_ms = ms;
        self
    }

    /// Parse and check a schema written in TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, FormError> {
        let schema: Self = toml::from_str(text)?;
        schema.check()?;
        Ok(schema)
    }

    /// Parse and check a schema written in JSON.
    pub fn from_json_str(text: &str) -> Result<Self, FormError> {
        let schema: Self = serde_json::from_str(text)?;
        schema.check()?;
        Ok(schema)
    }

    /// Reject empty or duplicate field names.
    pub fn check(&self) -> Result<(), FormError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(FormError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Find a field by its name.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Each field's initial value, in declaration order.
    pub fn default_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.initial_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::InputKind, rule::RuleKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SIGNUP: &str = r#"
title = "Sign up"
mode = "onBlur"
submitThrottleMs = 2000

[[fields]]
name = "email"
label = "Email Address"
type = "email"
required = true
validators = ["required", "email"]

[[fields]]
name = "name"
label = "Full Name"
validators = [{ type = "minLength", value = 2, message = "Min 2 characters" }]

[[fields]]
name = "skills"
label = "Skills"
type = "checkbox"
defaultValue = []
options = [{ value = "rust", label = "Rust" }]
"#;

    #[test]
    fn loads_toml() {
        let schema = FormSchema::from_toml_str(SIGNUP).expect("schema");
        assert_eq!(schema.title.as_deref(), Some("Sign up"));
        assert_eq!(schema.options.mode, ValidationMode::OnBlur);
        assert_eq!(schema.options.throttle(), Duration::from_millis(2000));
        assert_eq!(schema.field_count(), 3);

        let email = schema.field("email").expect("email field");
        assert_eq!(email.kind, InputKind::Email);
        assert!(email.required);
        assert_eq!(email.rules.len(), 2);

        let name = schema.field("name").expect("name field");
        assert_eq!(name.kind, InputKind::Text);
        assert!(matches!(name.rules[0].kind, RuleKind::MinLength(2)));

        assert!(schema.field("skills").expect("skills").is_multi_choice());
    }

    #[test]
    fn options_default_when_absent() {
        let schema = FormSchema::from_json_str(r#"{"fields": [{"name": "a"}]}"#).expect("schema");
        assert_eq!(schema.options, FormOptions::default());
        assert_eq!(schema.options.mode, ValidationMode::OnChange);
        assert_eq!(schema.default_values().get("a"), Some(&json!("")));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"{"fields": [{"name": "a"}, {"name": "a"}]}"#;
        assert!(matches!(
            FormSchema::from_json_str(json),
            Err(FormError::DuplicateField(name)) if name == "a"
        ));
    }

    #[test]
    fn empty_names_are_rejected() {
        let schema = FormSchema::new(vec![FieldConfig::new(" ", "Blank", InputKind::Text)]);
        assert!(matches!(schema.check(), Err(FormError::EmptyFieldName)));
    }

    #[test]
    fn unknown_rule_fails_to_load() {
        let json = r#"{"fields": [{"name": "a", "validators": ["zip"]}]}"#;
        assert!(matches!(FormSchema::from_json_str(json), Err(FormError::Json(_))));
    }

    #[test]
    fn mode_names() {
        assert_eq!(ValidationMode::OnSubmit.to_string(), "onSubmit");
        assert_eq!("onBlur".parse::<ValidationMode>().ok(), Some(ValidationMode::OnBlur));
    }
}
