//! Shared helpers for form_guard integration tests.

#![allow(dead_code)]

use form_guard::{
    FieldConfig, FieldOption, FormController, FormSchema, FormValues, InputKind, ValidationMode,
    ValidationRule,
};
use serde_json::{json, Value};

/// Turn a JSON object literal into a values map.
pub fn values(v: Value) -> FormValues {
    v.as_object().cloned().unwrap_or_default()
}

/// The single-field form used throughout the scenarios.
pub fn email_fields() -> Vec<FieldConfig> {
    vec![FieldConfig::new("email", "Email Address", InputKind::Email)
        .required()
        .rules([ValidationRule::required(), ValidationRule::email()])]
}

/// A sign-up form covering every input kind the rules care about.
pub fn signup_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("name", "Full Name", InputKind::Text)
            .placeholder("John Doe")
            .required()
            .rules([
                ValidationRule::required(),
                ValidationRule::min_length(2).with_message("Min 2 characters"),
            ]),
        FieldConfig::new("email", "Email Address", InputKind::Email)
            .required()
            .rules([ValidationRule::required(), ValidationRule::email()]),
        FieldConfig::new("phone", "Phone Number", InputKind::Tel).rule(ValidationRule::phone()),
        FieldConfig::new("experience", "Years of Experience", InputKind::Number)
            .rule(ValidationRule::number().with_message("Must be a number")),
        FieldConfig::new("skills", "Skills", InputKind::Checkbox)
            .options(vec![
                FieldOption::new("react", "React"),
                FieldOption::new("typescript", "TypeScript"),
                FieldOption::new("nodejs", "Node.js"),
            ])
            .default_value(json!([])),
        FieldConfig::new("agree", "I agree to the terms", InputKind::Checkbox)
            .required()
            .rule(ValidationRule::custom(|v, _| v == &json!(true), "You must agree")),
    ]
}

pub fn controller(
    fields: Vec<FieldConfig>,
    mode: ValidationMode,
    throttle_ms: u64,
) -> FormController {
    form_guard::logging::init();
    let schema = FormSchema::new(fields)
        .mode(mode)
        .submit_throttle_ms(throttle_ms);
    FormController::new(schema).expect("valid schema")
}

/// Fill the sign-up form with values that pass every rule.
pub fn fill_valid_signup(form: &mut FormController) {
    form.on_change("name", "Ada Lovelace").expect("name");
    form.on_change("email", "ada@example.com").expect("email");
    form.on_change("phone", "+44 20 7946 0958").expect("phone");
    form.on_change("experience", "12").expect("experience");
    form.on_change("skills", json!(["react"])).expect("skills");
    form.on_change("agree", true).expect("agree");
}
