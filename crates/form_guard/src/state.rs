//! Form runtime (mutable) state.
//!
//! Contains only the data the controller mutates while the user edits a
//! form:
//!   * current values, in field declaration order (`values`)
//!   * touched fields (`touched`)
//!   * per-field validation errors (`errors`)
//!   * submit bookkeeping (`submitting`, `submit_count`)
//!
//! Keep this module free of validation and rendering concerns; the
//! controller is the only writer.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name -> current value. Insertion order is declaration order.
pub type FormValues = serde_json::Map<String, Value>;

/// Field name -> error message, for failing fields only.
pub type FieldErrors = IndexMap<String, String>;

/// A single failing field, as handed to renderers and submit callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Mutable state captured while editing a form.
///
/// Fields:
/// - `values`:       Current value of every configured field.
/// - `touched`:      Fields the user changed or blurred at least once.
/// - `errors`:       Validation errors; absent means the field passed when it
///                   was last validated.
/// - `submitting`:   True between an accepted submit and its completion.
/// - `dirty`:        At least one value differs from its default.
/// - `submit_count`: Submit attempts that got past the throttle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub touched: IndexSet<String>,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub dirty: bool,
    pub submit_count: u32,
}

impl FormState {
    /// Fresh state seeded from default values.
    pub fn seeded(defaults: FormValues) -> Self {
        Self {
            values: defaults,
            ..Self::default()
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(|s| s.as_str())
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// The error a renderer should show: only once the field is touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.error(name)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors as a list in declaration order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .map(|(field, message)| FieldError::new(field.clone(), message.clone()))
            .collect()
    }

    /// Store or clear the error entry for one field.
    pub(crate) fn set_error(&mut self, name: &str, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                self.errors.shift_remove(name);
            }
            Err(message) => {
                self.errors.insert(name.to_string(), message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn visible_error_requires_touch() {
        let mut state = FormState::default();
        state.errors.insert("email".into(), "bad".into());
        assert_eq!(state.visible_error("email"), None);
        state.touched.insert("email".into());
        assert_eq!(state.visible_error("email"), Some("bad"));
    }

    #[test]
    fn set_error_clears_on_success() {
        let mut state = FormState::default();
        state.set_error("name", Err("required".into()));
        assert!(!state.is_valid());
        state.set_error("name", Ok(()));
        assert!(state.is_valid());
    }

    #[test]
    fn field_errors_keep_order() {
        let mut state = FormState::seeded(
            json!({"b": "", "a": ""})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        state.set_error("b", Err("first".into()));
        state.set_error("a", Err("second".into()));
        let list = state.field_errors();
        assert_eq!(list[0], FieldError::new("b", "first"));
        assert_eq!(list[1], FieldError::new("a", "second"));
    }
}
