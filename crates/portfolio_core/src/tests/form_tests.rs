use super::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

struct TestRelay {
    calls: AtomicUsize,
    received: Mutex<Vec<FormValues>>,
    fail_with: Option<RelayError>,
    gate: Option<Arc<Notify>>,
}

impl TestRelay {
    fn ok() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
            fail_with: None,
            gate: None,
        }
    }

    fn failing(error: RelayError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::ok()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::ok()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormRelay for TestRelay {
    async fn submit(&self, _form_id: &str, values: &FormValues) -> Result<(), RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().await.push(values.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn contact_values(email: &str) -> FormValues {
    FormValues::from([
        ("name".to_string(), "Ada".to_string()),
        ("email".to_string(), email.to_string()),
        ("message".to_string(), "Hello there".to_string()),
    ])
}

fn testimonial_values() -> FormValues {
    FormValues::from([
        ("name".to_string(), "Grace".to_string()),
        ("company".to_string(), "Navy".to_string()),
        ("testimonial".to_string(), "Fast and careful".to_string()),
        ("rating".to_string(), "4".to_string()),
    ])
}

#[test]
fn email_shape_checks() {
    for bad in ["", "plain", "a@b", "@example.com", "a@.com", "a@example.", "a b@x.io", "a@b@c.io"] {
        assert!(!is_valid_email(bad), "accepted {bad:?}");
    }
    for good in ["a@b.co", "first.last@mail.example.org", "  ada@example.com "] {
        assert!(is_valid_email(good), "rejected {good:?}");
    }
}

#[test]
fn validate_reports_one_error_per_field() {
    let config = FormConfig::contact("c").with_verification(true);
    let errors = validate(&config, &FormValues::new(), None).expect_err("must fail");
    let fields: Vec<&str> = errors.iter().map(|error| error.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "email", "message", VERIFICATION_FIELD]);
}

#[test]
fn testimonial_rating_must_be_in_range() {
    let config = FormConfig::testimonial("t");
    let mut values = testimonial_values();
    values.insert("rating".into(), "7".into());
    let errors = validate(&config, &values, None).expect_err("must fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "rating");

    values.remove("rating");
    validate(&config, &values, None).expect("rating is optional");
}

#[tokio::test]
async fn malformed_email_fails_without_relay_call() {
    let relay = Arc::new(TestRelay::ok());
    let form = FormSubmission::new(FormConfig::contact("contact-id"), relay.clone());

    let err = form
        .submit(contact_values("ada.example.com"))
        .await
        .expect_err("must fail");

    let SubmissionError::Validation(errors) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "email");
    assert_eq!(relay.calls(), 0);

    let SubmissionState::Failed(failure) = form.state() else {
        panic!("expected failed state");
    };
    assert!(failure.field_error("email").is_some());
}

#[tokio::test]
async fn valid_submission_succeeds_once_with_submitted_values() {
    let relay = Arc::new(TestRelay::ok());
    let form = FormSubmission::new(FormConfig::contact("contact-id"), relay.clone());

    let values = form
        .submit(contact_values("ada@example.com"))
        .await
        .expect("submit");

    assert_eq!(values.get("name").map(String::as_str), Some("Ada"));
    assert_eq!(form.state(), SubmissionState::Succeeded(values));
    assert_eq!(relay.calls(), 1);

    let err = form
        .submit(contact_values("ada@example.com"))
        .await
        .expect_err("succeeded is terminal");
    assert_eq!(err, SubmissionError::AlreadySucceeded);
    assert_eq!(relay.calls(), 1);
}

#[tokio::test]
async fn second_submit_while_submitting_is_rejected() {
    let gate = Arc::new(Notify::new());
    let relay = Arc::new(TestRelay::gated(Arc::clone(&gate)));
    let form = Arc::new(FormSubmission::new(
        FormConfig::contact("contact-id"),
        relay.clone(),
    ));

    let first = {
        let form = Arc::clone(&form);
        tokio::spawn(async move { form.submit(contact_values("ada@example.com")).await })
    };

    while !form.state().is_submitting() {
        tokio::task::yield_now().await;
    }

    let err = form
        .submit(contact_values("ada@example.com"))
        .await
        .expect_err("must reject");
    assert_eq!(err, SubmissionError::AlreadySubmitting);

    gate.notify_one();
    first.await.expect("join").expect("first submit");
    assert_eq!(relay.calls(), 1);
    assert!(matches!(form.state(), SubmissionState::Succeeded(_)));
}

#[tokio::test]
async fn relay_failure_keeps_field_errors_and_allows_retry() {
    let relay = Arc::new(TestRelay::failing(RelayError {
        status: Some(422),
        message: "form has errors".into(),
        field_errors: vec![ValidationError::new("email", "should be an email")],
    }));
    let form = FormSubmission::new(FormConfig::contact("contact-id"), relay.clone());

    let err = form
        .submit(contact_values("ada@example.com"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, SubmissionError::Relay(_)));

    let SubmissionState::Failed(failure) = form.state() else {
        panic!("expected failed state");
    };
    assert_eq!(failure.summary, RELAY_SUMMARY);
    assert_eq!(
        failure.field_error("email").map(|e| e.message.as_str()),
        Some("should be an email")
    );

    // Failed is not terminal; a new attempt reaches the relay again.
    let _ = form.submit(contact_values("ada@example.com")).await;
    assert_eq!(relay.calls(), 2);
}

#[tokio::test]
async fn verification_token_is_required_and_forwarded() {
    let relay = Arc::new(TestRelay::ok());
    let form = FormSubmission::new(
        FormConfig::testimonial("testimonial-id").with_verification(true),
        relay.clone(),
    );

    let err = form
        .submit(testimonial_values())
        .await
        .expect_err("token missing");
    assert!(matches!(err, SubmissionError::Validation(ref errors) if errors[0].field == VERIFICATION_FIELD));
    assert_eq!(relay.calls(), 0);

    form.set_verification_token("captcha-token");
    let values = form.submit(testimonial_values()).await.expect("submit");

    assert!(!values.contains_key(VERIFICATION_FIELD));
    let received = relay.received.lock().await;
    assert_eq!(
        received[0].get(VERIFICATION_FIELD).map(String::as_str),
        Some("captcha-token")
    );
}

#[tokio::test]
async fn reset_clears_state_and_token() {
    let relay = Arc::new(TestRelay::ok());
    let form = FormSubmission::new(
        FormConfig::contact("contact-id").with_verification(true),
        relay.clone(),
    );
    form.set_verification_token("token");
    form.submit(contact_values("ada@example.com"))
        .await
        .expect("submit");

    form.reset();
    assert_eq!(form.state(), SubmissionState::Idle);

    let err = form
        .submit(contact_values("ada@example.com"))
        .await
        .expect_err("token was cleared");
    assert!(matches!(err, SubmissionError::Validation(_)));
    assert_eq!(relay.calls(), 1);
}

#[tokio::test]
async fn abandoned_submit_releases_the_form() {
    let gate = Arc::new(Notify::new());
    let relay = Arc::new(TestRelay::gated(Arc::clone(&gate)));
    let form = FormSubmission::new(FormConfig::contact("contact-id"), relay.clone());

    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        form.submit(contact_values("ada@example.com")),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(form.state(), SubmissionState::Idle);

    // Stored permit lets the retry through the gate.
    gate.notify_one();
    form.submit(contact_values("ada@example.com"))
        .await
        .expect("retry reaches the relay");
    assert_eq!(relay.calls(), 2);
    assert!(matches!(form.state(), SubmissionState::Succeeded(_)));
}

#[tokio::test]
async fn reset_during_submit_is_not_overwritten() {
    let gate = Arc::new(Notify::new());
    let relay = Arc::new(TestRelay::gated(Arc::clone(&gate)));
    let form = Arc::new(FormSubmission::new(
        FormConfig::contact("contact-id"),
        relay.clone(),
    ));

    let first = {
        let form = Arc::clone(&form);
        tokio::spawn(async move { form.submit(contact_values("ada@example.com")).await })
    };
    while !form.state().is_submitting() {
        tokio::task::yield_now().await;
    }

    form.reset();
    gate.notify_one();
    first.await.expect("join").expect("relay still accepted it");

    assert_eq!(form.state(), SubmissionState::Idle);
    assert_eq!(relay.calls(), 1);
}
