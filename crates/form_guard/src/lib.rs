//! Declarative form validation and form state.
//!
//! Defines the pieces a rendering layer needs to drive a form:
//! - [`FieldConfig`] / [`FormSchema`]: what the form contains and how it
//!   behaves (validation mode, submit throttle); buildable in code or
//!   loadable from TOML / JSON
//! - [`ValidationRule`]: built-in named rules and custom predicates
//! - [`validate_field`] / [`validate_form`]: the pure validation engine
//! - [`sanitize_values`]: submit-ready values coerced by input kind
//! - [`FormController`]: owns [`FormState`] and handles change / blur /
//!   submit / reset events
//!
//! Rendering, themes and styling are left to the host.
//!
//! ```ignore
//! use form_guard::{FieldConfig, FormController, FormSchema, InputKind, ValidationRule};
//!
//! let schema = FormSchema::new(vec![
//!     FieldConfig::new("email", "Email Address", InputKind::Email)
//!         .required()
//!         .rule(ValidationRule::email()),
//! ]);
//! let mut form = FormController::new(schema)?;
//! form.on_change("email", "a@b.com")?;
//! form.submit(|values| async move { send(values).await }).await?;
//! ```

mod controller;
mod errors;
mod field;
pub mod logging;
mod rule;
mod sanitize;
mod schema;
mod state;
mod validate;

pub use controller::{FormController, FormEvent};
pub use errors::{FormError, SubmitError};
pub use field::{FieldConfig, FieldOption, InputKind};
pub use rule::{CustomPredicate, RuleKind, RuleName, ValidationRule};
pub use sanitize::sanitize_values;
pub use schema::{FormOptions, FormSchema, ValidationMode};
pub use state::{FieldError, FieldErrors, FormState, FormValues};
pub use validate::{
    is_empty, validate_config, validate_field, validate_form, validate_form_result,
    ValidationResult,
};
