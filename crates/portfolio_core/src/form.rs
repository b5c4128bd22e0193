//! Contact and testimonial forms: client-side validation and a single relayed
//! submission per validation pass.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use shared::{
    domain::Rating,
    error::{RelayError, SubmissionError, ValidationError},
};
use tracing::{debug, info, warn};

use crate::relay::FormRelay;

pub type FormValues = BTreeMap<String, String>;

pub const VERIFICATION_FIELD: &str = "h-captcha-response";
const VALIDATION_SUMMARY: &str = "Please fix the highlighted fields and try again.";
const RELAY_SUMMARY: &str = "Something went wrong while sending the form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Contact,
    Testimonial,
}

impl FormKind {
    /// Name of the free-text field that must not be blank.
    pub fn message_field(self) -> &'static str {
        match self {
            Self::Contact => "message",
            Self::Testimonial => "testimonial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub form_id: String,
    pub kind: FormKind,
    pub requires_verification: bool,
}

impl FormConfig {
    pub fn contact(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            kind: FormKind::Contact,
            requires_verification: false,
        }
    }

    pub fn testimonial(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            kind: FormKind::Testimonial,
            requires_verification: false,
        }
    }

    pub fn with_verification(mut self, required: bool) -> Self {
        self.requires_verification = required;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub summary: String,
    pub field_errors: Vec<ValidationError>,
}

impl SubmissionFailure {
    pub fn field_error(&self, field: &str) -> Option<&ValidationError> {
        self.field_errors.iter().find(|error| error.field == field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(FormValues),
    Failed(SubmissionFailure),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Syntactic `local@domain.tld` check. Not an RFC 5322 parser.
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

fn is_blank(values: &FormValues, field: &str) -> bool {
    values.get(field).map_or(true, |value| value.trim().is_empty())
}

pub fn validate(
    config: &FormConfig,
    values: &FormValues,
    verification_token: Option<&str>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if is_blank(values, "name") {
        errors.push(ValidationError::new("name", "name is required"));
    }

    if config.kind == FormKind::Contact {
        match values.get("email").map(|email| email.trim()) {
            None | Some("") => errors.push(ValidationError::new("email", "email is required")),
            Some(email) if !is_valid_email(email) => errors.push(ValidationError::new(
                "email",
                "email must look like name@domain.tld",
            )),
            Some(_) => {}
        }
    }

    let message_field = config.kind.message_field();
    if is_blank(values, message_field) {
        errors.push(ValidationError::new(
            message_field,
            format!("{message_field} is required"),
        ));
    }

    if config.kind == FormKind::Testimonial {
        if let Some(raw) = values.get("rating").filter(|raw| !raw.trim().is_empty()) {
            if let Err(error) = Rating::parse(raw) {
                errors.push(error);
            }
        }
    }

    if config.requires_verification
        && verification_token.map_or(true, |token| token.trim().is_empty())
    {
        errors.push(ValidationError::new(
            VERIFICATION_FIELD,
            "please complete the verification challenge",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

struct FormInner {
    state: SubmissionState,
    verification_token: Option<String>,
    // Bumped by every submit and reset; a relay outcome only lands on its own attempt.
    attempt: u64,
}

/// One form instance. Submissions are serialized: a second `submit` while one is
/// in flight is rejected without touching the relay.
pub struct FormSubmission {
    config: FormConfig,
    relay: Arc<dyn FormRelay>,
    inner: Mutex<FormInner>,
}

impl FormSubmission {
    pub fn new(config: FormConfig, relay: Arc<dyn FormRelay>) -> Self {
        Self {
            config,
            relay,
            inner: Mutex::new(FormInner {
                state: SubmissionState::Idle,
                verification_token: None,
                attempt: 0,
            }),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn state(&self) -> SubmissionState {
        lock_inner(&self.inner).state.clone()
    }

    pub fn set_verification_token(&self, token: impl Into<String>) {
        lock_inner(&self.inner).verification_token = Some(token.into());
    }

    /// Returns the form to `Idle`, dropping any verification token. A submission
    /// still in flight keeps its relay outcome but no longer changes the state.
    pub fn reset(&self) {
        let mut inner = lock_inner(&self.inner);
        inner.state = SubmissionState::Idle;
        inner.verification_token = None;
        inner.attempt += 1;
    }

    pub async fn submit(&self, values: FormValues) -> Result<FormValues, SubmissionError> {
        let (payload, pending) = {
            let mut inner = lock_inner(&self.inner);
            match &inner.state {
                SubmissionState::Submitting => return Err(SubmissionError::AlreadySubmitting),
                SubmissionState::Succeeded(_) => return Err(SubmissionError::AlreadySucceeded),
                SubmissionState::Idle | SubmissionState::Failed(_) => {}
            }

            if let Err(errors) =
                validate(&self.config, &values, inner.verification_token.as_deref())
            {
                debug!(
                    form_id = %self.config.form_id,
                    invalid_fields = errors.len(),
                    "form validation failed"
                );
                inner.state = SubmissionState::Failed(SubmissionFailure {
                    summary: VALIDATION_SUMMARY.to_string(),
                    field_errors: errors.clone(),
                });
                return Err(SubmissionError::Validation(errors));
            }

            inner.attempt += 1;
            inner.state = SubmissionState::Submitting;
            let mut payload = values.clone();
            if let Some(token) = inner.verification_token.as_ref() {
                payload.insert(VERIFICATION_FIELD.to_string(), token.clone());
            }
            let pending = PendingSubmission {
                inner: &self.inner,
                form_id: &self.config.form_id,
                attempt: inner.attempt,
                settled: false,
            };
            (payload, pending)
        };

        let outcome = self.relay.submit(&self.config.form_id, &payload).await;

        match outcome {
            Ok(()) => {
                info!(form_id = %self.config.form_id, "form submitted");
                pending.settle(SubmissionState::Succeeded(values.clone()));
                Ok(values)
            }
            Err(error) => {
                warn!(form_id = %self.config.form_id, %error, "form submission failed");
                pending.settle(SubmissionState::Failed(relay_failure(&error)));
                Err(SubmissionError::Relay(error))
            }
        }
    }
}

/// Holds the `Submitting` state for one attempt. Dropping it unsettled (the submit
/// future was cancelled mid-relay) returns the form to `Idle`.
struct PendingSubmission<'a> {
    inner: &'a Mutex<FormInner>,
    form_id: &'a str,
    attempt: u64,
    settled: bool,
}

impl PendingSubmission<'_> {
    fn settle(mut self, state: SubmissionState) {
        self.settled = true;
        let mut inner = lock_inner(self.inner);
        if inner.attempt == self.attempt && inner.state.is_submitting() {
            inner.state = state;
        } else {
            debug!(form_id = self.form_id, "form was reset while submitting; outcome not recorded");
        }
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock_inner(self.inner);
        if inner.attempt == self.attempt && inner.state.is_submitting() {
            inner.state = SubmissionState::Idle;
            warn!(form_id = self.form_id, "submission abandoned before the relay answered");
        }
    }
}

fn lock_inner(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    inner
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn relay_failure(error: &RelayError) -> SubmissionFailure {
    SubmissionFailure {
        summary: RELAY_SUMMARY.to_string(),
        field_errors: error.field_errors.clone(),
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
