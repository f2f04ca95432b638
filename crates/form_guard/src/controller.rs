//! Form state controller.
//!
//! `FormController` owns a [`FormState`] and is the only place it changes.
//! Hosts feed it events (directly or through [`FormController::dispatch`])
//! and read the state back for rendering.
//!
//! Policy:
//!   - The validation mode decides whether a change or a blur re-validates
//!     the affected field. Submitting always validates every field.
//!   - Events for unknown fields are rejected with `FormError::UnknownField`
//!     and leave the state untouched.
//!   - A submit is rejected as throttled, without validating, while another
//!     submit is in flight or within `submit_throttle_ms` of the last submit
//!     that reached the handler.
//!
//! Submitting comes in three flavours: `submit` for async handlers,
//! `submit_sync` for plain closures, and `begin_submit` / `finish_submit`
//! for hosts that run the handler on their own executor. Those hosts call
//! `abort_submit` when a handler will never finish; a dropped `submit` future
//! does that on its own.

use std::{future::Future, time::Duration};

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    errors::{FormError, SubmitError},
    sanitize::sanitize_values,
    schema::{FormSchema, ValidationMode},
    state::{FormState, FormValues},
    validate::{validate_config, validate_form},
};

/// Input emitted by a rendering adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Change { name: String, value: Value },
    Blur { name: String },
    Reset,
}

impl FormEvent {
    pub fn change(name: impl Into<String>, value: impl Into<Value>) -> Self {
        FormEvent::Change {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn blur(name: impl Into<String>) -> Self {
        FormEvent::Blur { name: name.into() }
    }
}

pub struct FormController {
    schema: FormSchema,
    defaults: FormValues,
    state: FormState,
    last_accepted_submit: Option<Instant>,
}

impl FormController {
    /// Mount a form: check the schema and seed values from field defaults.
    pub fn new(schema: FormSchema) -> Result<Self, FormError> {
        schema.check()?;
        let defaults = schema.default_values();
        debug!(
            fields = schema.field_count(),
            mode = %schema.options.mode,
            "form mounted"
        );
        Ok(Self {
            state: FormState::seeded(defaults.clone()),
            defaults,
            schema,
            last_accepted_submit: None,
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn mode(&self) -> ValidationMode {
        self.schema.options.mode
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.state.value(name)
    }

    pub fn visible_error(&self, name: &str) -> Option<&str> {
        self.state.visible_error(name)
    }

    /// True when the current error map is empty. Fields that were never
    /// validated count as passing.
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    pub fn is_submitting(&self) -> bool {
        self.state.submitting
    }

    /// Reducer-style entry point for rendering adapters.
    pub fn dispatch(&mut self, event: FormEvent) -> Result<(), FormError> {
        match event {
            FormEvent::Change { name, value } => self.on_change(&name, value),
            FormEvent::Blur { name } => self.on_blur(&name),
            FormEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    pub fn on_change(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.ensure_field(name)?;
        debug!(field = name, "change");
        self.state.values.insert(name.to_string(), value.into());
        self.state.touched.insert(name.to_string());
        self.state.dirty = self.state.values != self.defaults;
        if self.mode() == ValidationMode::OnChange {
            self.revalidate(name);
        }
        Ok(())
    }

    pub fn on_blur(&mut self, name: &str) -> Result<(), FormError> {
        self.ensure_field(name)?;
        debug!(field = name, "blur");
        self.state.touched.insert(name.to_string());
        if self.mode() == ValidationMode::OnBlur {
            self.revalidate(name);
        }
        Ok(())
    }

    /// Back to defaults with no touched fields and no errors. An in-flight
    /// submit and the throttle window are left alone.
    pub fn reset(&mut self) {
        debug!("reset");
        self.state.values = self.defaults.clone();
        self.state.touched.clear();
        self.state.errors.clear();
        self.state.dirty = false;
    }

    /// Validate every field into the error map without submitting.
    /// Returns whether the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.state.errors = validate_form(&self.state.values, &self.schema.fields);
        self.state.errors.is_empty()
    }

    /// Attach an externally produced error (e.g. a server-side rejection).
    pub fn set_field_error(
        &mut self,
        name: &str,
        message: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_field(name)?;
        self.state.set_error(name, Err(message.into()));
        Ok(())
    }

    pub fn clear_field_error(&mut self, name: &str) -> Result<(), FormError> {
        self.ensure_field(name)?;
        self.state.set_error(name, Ok(()));
        Ok(())
    }

    /// Swap in a new schema. Values of fields that still exist are kept, new
    /// fields start from their defaults, and every trace of removed fields is
    /// dropped.
    pub fn reconfigure(&mut self, schema: FormSchema) -> Result<(), FormError> {
        schema.check()?;
        let defaults = schema.default_values();
        let values: FormValues = defaults
            .iter()
            .map(|(name, default)| {
                let value = self
                    .state
                    .values
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| default.clone());
                (name.clone(), value)
            })
            .collect();

        self.state.touched.retain(|name| defaults.contains_key(name));
        self.state
            .errors
            .retain(|name, _| defaults.contains_key(name));
        self.state.dirty = values != defaults;
        self.state.values = values;
        self.defaults = defaults;
        debug!(fields = schema.field_count(), "form reconfigured");
        self.schema = schema;
        Ok(())
    }

    /// First half of a submit: throttle check, full validation, and on
    /// success `submitting = true` plus the sanitized values for the handler.
    ///
    /// Every `Ok` must be followed by [`FormController::finish_submit`], or by
    /// [`FormController::abort_submit`] if the handler never completes.
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitError> {
        let now = Instant::now();
        if self.state.submitting {
            warn!("submit throttled, another submit is in flight");
            return Err(SubmitError::Throttled { retry_after: None });
        }
        if let Some(retry_after) = self.throttle_remaining(now) {
            warn!(?retry_after, "submit throttled");
            return Err(SubmitError::Throttled {
                retry_after: Some(retry_after),
            });
        }

        self.state.submit_count += 1;
        let errors = validate_form(&self.state.values, &self.schema.fields);
        self.state.errors = errors.clone();
        if !errors.is_empty() {
            let names = self.schema.fields.iter().map(|f| f.name.clone());
            self.state.touched.extend(names);
            debug!(invalid = errors.len(), "submit rejected");
            return Err(SubmitError::Invalid(errors));
        }

        self.state.submitting = true;
        self.last_accepted_submit = Some(now);
        info!(attempt = self.state.submit_count, "submit accepted");
        Ok(sanitize_values(&self.state.values, &self.schema.fields))
    }

    /// Second half of a submit: clears `submitting` whatever the handler
    /// returned and surfaces its failure.
    pub fn finish_submit(&mut self, result: anyhow::Result<()>) -> Result<(), SubmitError> {
        self.state.submitting = false;
        match result {
            Ok(()) => {
                info!("submit completed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "submit handler failed");
                Err(SubmitError::Handler(err))
            }
        }
    }

    /// Give up on an accepted submit whose handler will never report back
    /// (cancelled, timed out, owner gone). Clears `submitting`; the throttle
    /// window opened by that submit still applies.
    pub fn abort_submit(&mut self) {
        if self.state.submitting {
            warn!("submit abandoned before the handler completed");
            self.state.submitting = false;
        }
    }

    /// Validate and hand the sanitized values to an async handler.
    ///
    /// Dropping the returned future while the handler runs aborts the submit.
    pub async fn submit<F, Fut>(&mut self, handler: F) -> Result<(), SubmitError>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let values = self.begin_submit()?;
        let mut in_flight = InFlight {
            form: self,
            armed: true,
        };
        let result = handler(values).await;
        in_flight.armed = false;
        in_flight.form.finish_submit(result)
    }

    /// Validate and hand the sanitized values to a synchronous handler.
    pub fn submit_sync<F>(&mut self, handler: F) -> Result<(), SubmitError>
    where
        F: FnOnce(FormValues) -> anyhow::Result<()>,
    {
        let values = self.begin_submit()?;
        let result = handler(values);
        self.finish_submit(result)
    }

    /// Time left in the throttle window, or `None` once it has elapsed.
    fn throttle_remaining(&self, now: Instant) -> Option<Duration> {
        let window = self.schema.options.throttle();
        let at = self.last_accepted_submit?;
        let remaining = window.saturating_sub(now.saturating_duration_since(at));
        (!remaining.is_zero()).then_some(remaining)
    }

    fn ensure_field(&self, name: &str) -> Result<(), FormError> {
        if self.schema.field(name).is_some() {
            Ok(())
        } else {
            warn!(field = name, "event for unknown field");
            Err(FormError::UnknownField(name.to_string()))
        }
    }

    fn revalidate(&mut self, name: &str) {
        if let Some(field) = self.schema.field(name) {
            let outcome = validate_config(field, &self.state.values);
            debug!(field = name, valid = outcome.is_ok(), "field validated");
            self.state.set_error(name, outcome);
        }
    }
}

/// Aborts the submit if the `submit` future is dropped before the handler
/// returns.
struct InFlight<'a> {
    form: &'a mut FormController,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.form.abort_submit();
        }
    }
}
