//! Validation rules.
//!
//! A rule is a tagged variant ([`RuleKind`]) plus an optional message
//! override. Built-in rules can be loaded from configuration, either by bare
//! name (`"email"`) or as a table (`{ type = "minLength", value = 2 }`).
//! Custom predicates only exist in code.
//!
//! ```ignore
//! let rules = vec![
//!     ValidationRule::required(),
//!     ValidationRule::min_length(2).with_message("Min 2 characters"),
//!     ValidationRule::custom(|v, _| v != "admin", "Reserved name"),
//! ];
//! ```

use std::{fmt, str::FromStr, sync::Arc};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{errors::FormError, state::FormValues};

/// Names of the rule kinds, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum RuleName {
    Required,
    Email,
    Phone,
    MinLength,
    MaxLength,
    Number,
    Min,
    Max,
    Pattern,
    Custom,
}

type PredicateFn = dyn Fn(&Value, &FormValues) -> bool + Send + Sync;

/// A user supplied check. Receives the field value and every form value so
/// it can compare fields (e.g. password confirmation).
#[derive(Clone)]
pub struct CustomPredicate(Arc<PredicateFn>);

impl CustomPredicate {
    pub fn new(f: impl Fn(&Value, &FormValues) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn check(&self, value: &Value, values: &FormValues) -> bool {
        (self.0)(value, values)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(..)")
    }
}

/// What a rule checks, with its parameter.
#[derive(Debug, Clone)]
pub enum RuleKind {
    Required,
    Email,
    Phone,
    MinLength(usize),
    MaxLength(usize),
    Number,
    Min(f64),
    Max(f64),
    Pattern(Regex),
    Custom(CustomPredicate),
}

impl RuleKind {
    pub fn name(&self) -> RuleName {
        match self {
            RuleKind::Required => RuleName::Required,
            RuleKind::Email => RuleName::Email,
            RuleKind::Phone => RuleName::Phone,
            RuleKind::MinLength(_) => RuleName::MinLength,
            RuleKind::MaxLength(_) => RuleName::MaxLength,
            RuleKind::Number => RuleName::Number,
            RuleKind::Min(_) => RuleName::Min,
            RuleKind::Max(_) => RuleName::Max,
            RuleKind::Pattern(_) => RuleName::Pattern,
            RuleKind::Custom(_) => RuleName::Custom,
        }
    }

    /// Message used when the rule carries no override.
    pub fn default_message(&self) -> String {
        match self {
            RuleKind::Required => "This field is required".into(),
            RuleKind::Email => "Please enter a valid email address".into(),
            RuleKind::Phone => "Please enter a valid phone number".into(),
            RuleKind::MinLength(n) => format!("Must be at least {n} characters"),
            RuleKind::MaxLength(n) => format!("Must be at most {n} characters"),
            RuleKind::Number => "Must be a valid number".into(),
            RuleKind::Min(n) => format!("Must be at least {n}"),
            RuleKind::Max(n) => format!("Must be at most {n}"),
            RuleKind::Pattern(_) => "Invalid format".into(),
            RuleKind::Custom(_) => "Invalid value".into(),
        }
    }

    fn value(&self) -> Option<Value> {
        match self {
            RuleKind::MinLength(n) | RuleKind::MaxLength(n) => Some(json!(n)),
            RuleKind::Min(n) | RuleKind::Max(n) => Some(json!(n)),
            RuleKind::Pattern(re) => Some(Value::String(re.as_str().to_string())),
            _ => None,
        }
    }
}

/// A rule attached to a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn required() -> Self {
        Self::new(RuleKind::Required)
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email)
    }

    pub fn phone() -> Self {
        Self::new(RuleKind::Phone)
    }

    pub fn min_length(n: usize) -> Self {
        Self::new(RuleKind::MinLength(n))
    }

    pub fn max_length(n: usize) -> Self {
        Self::new(RuleKind::MaxLength(n))
    }

    pub fn number() -> Self {
        Self::new(RuleKind::Number)
    }

    pub fn min(n: f64) -> Self {
        Self::new(RuleKind::Min(n))
    }

    pub fn max(n: f64) -> Self {
        Self::new(RuleKind::Max(n))
    }

    pub fn pattern(pattern: &str) -> Result<Self, FormError> {
        Ok(Self::new(RuleKind::Pattern(Regex::new(pattern)?)))
    }

    pub fn custom(
        f: impl Fn(&Value, &FormValues) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self::new(RuleKind::Custom(CustomPredicate::new(f))).with_message(message)
    }

    /// Override the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> RuleName {
        self.kind.name()
    }

    /// The message reported when this rule fails.
    pub fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.default_message())
    }

    pub fn is_required(&self) -> bool {
        matches!(self.kind, RuleKind::Required)
    }

    /// Build a rule from its configuration name and optional value.
    pub fn from_parts(name: &str, value: Option<&Value>) -> Result<Self, FormError> {
        let rule_name =
            RuleName::from_str(name).map_err(|_| FormError::UnknownRule(name.to_string()))?;
        let kind = match rule_name {
            RuleName::Required => RuleKind::Required,
            RuleName::Email => RuleKind::Email,
            RuleName::Phone => RuleKind::Phone,
            RuleName::Number => RuleKind::Number,
            RuleName::MinLength => RuleKind::MinLength(length_param(rule_name, value)?),
            RuleName::MaxLength => RuleKind::MaxLength(length_param(rule_name, value)?),
            RuleName::Min => RuleKind::Min(number_param(rule_name, value)?),
            RuleName::Max => RuleKind::Max(number_param(rule_name, value)?),
            RuleName::Pattern => {
                let pattern = value.and_then(Value::as_str).ok_or_else(|| {
                    FormError::InvalidRuleValue {
                        rule: rule_name.to_string(),
                        expected: "a regular expression string",
                    }
                })?;
                RuleKind::Pattern(Regex::new(pattern)?)
            }
            RuleName::Custom => return Err(FormError::CustomRuleInConfig),
        };
        Ok(Self::new(kind))
    }
}

fn length_param(rule: RuleName, value: Option<&Value>) -> Result<usize, FormError> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| FormError::InvalidRuleValue {
            rule: rule.to_string(),
            expected: "a non-negative integer",
        })
}

fn number_param(rule: RuleName, value: Option<&Value>) -> Result<f64, FormError> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormError::InvalidRuleValue {
            rule: rule.to_string(),
            expected: "a finite number",
        })
}

/// Configuration shape of a rule: `"email"` or `{ type, value?, message? }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Named(String),
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl TryFrom<RawRule> for ValidationRule {
    type Error = FormError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw {
            RawRule::Named(name) => ValidationRule::from_parts(&name, None),
            RawRule::Detailed {
                kind,
                value,
                message,
            } => {
                let mut rule = ValidationRule::from_parts(&kind, value.as_ref())?;
                rule.message = message;
                Ok(rule)
            }
        }
    }
}

impl From<ValidationRule> for RawRule {
    fn from(rule: ValidationRule) -> Self {
        let value = rule.kind.value();
        let kind = rule.name().to_string();
        if value.is_none() && rule.message.is_none() {
            RawRule::Named(kind)
        } else {
            RawRule::Detailed {
                kind,
                value,
                message: rule.message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn rule_names_are_camel_case() {
        assert_eq!(RuleName::MinLength.to_string(), "minLength");
        assert_eq!(RuleName::from_str("maxLength").ok(), Some(RuleName::MaxLength));
        assert!(RuleName::from_str("min_length").is_err());
    }

    #[test]
    fn every_name_except_custom_parses_with_a_suitable_value() {
        for name in RuleName::iter() {
            let value = match name {
                RuleName::MinLength | RuleName::MaxLength => Some(json!(3)),
                RuleName::Min | RuleName::Max => Some(json!(1.5)),
                RuleName::Pattern => Some(json!("^a+$")),
                _ => None,
            };
            let parsed = ValidationRule::from_parts(name.as_ref(), value.as_ref());
            if name == RuleName::Custom {
                assert!(matches!(parsed, Err(FormError::CustomRuleInConfig)));
            } else {
                assert_eq!(parsed.map(|r| r.name()).ok(), Some(name));
            }
        }
    }

    #[test]
    fn min_length_needs_an_integer() {
        let err = ValidationRule::from_parts("minLength", Some(&json!("two")));
        assert!(matches!(err, Err(FormError::InvalidRuleValue { .. })));
        let err = ValidationRule::from_parts("minLength", None);
        assert!(matches!(err, Err(FormError::InvalidRuleValue { .. })));
    }

    #[test]
    fn unknown_rule_is_reported_by_name() {
        match ValidationRule::from_parts("zip", None) {
            Err(FormError::UnknownRule(name)) => assert_eq!(name, "zip"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        assert!(matches!(
            ValidationRule::pattern("(unclosed"),
            Err(FormError::Pattern(_))
        ));
    }

    #[test]
    fn message_override_wins() {
        let rule = ValidationRule::min_length(2);
        assert_eq!(rule.message(), "Must be at least 2 characters");
        let rule = rule.with_message("Min 2 characters");
        assert_eq!(rule.message(), "Min 2 characters");
    }

    #[test]
    fn deserializes_both_shapes() {
        let rules: Vec<ValidationRule> = serde_json::from_value(json!([
            "required",
            { "type": "minLength", "value": 2, "message": "Min 2 characters" }
        ]))
        .expect("rules");
        assert!(rules[0].is_required());
        assert!(matches!(rules[1].kind, RuleKind::MinLength(2)));
        assert_eq!(rules[1].message(), "Min 2 characters");
    }

    #[test]
    fn serializes_back_to_compact_form() {
        let rules = vec![
            ValidationRule::email(),
            ValidationRule::max_length(10).with_message("Too long"),
        ];
        let value = serde_json::to_value(&rules).expect("serialize");
        assert_eq!(
            value,
            json!(["email", { "type": "maxLength", "value": 10, "message": "Too long" }])
        );
    }
}
