use super::*;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::error::{ErrorCode, RelayError};
use tokio::net::TcpListener;
use url::Url;

use crate::{config::DEFAULT_REQUEST_TIMEOUT, contact::ContactConfig, form::FormConfig};

struct AcceptingRelay;

#[async_trait]
impl FormRelay for AcceptingRelay {
    async fn submit(&self, _form_id: &str, _values: &FormValues) -> Result<(), RelayError> {
        Ok(())
    }
}

async fn user_handler(Path(username): Path<String>) -> Response {
    match username.as_str() {
        "ghost" => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::NOT_FOUND.into_response()
        }
        _ => Json(json!({
            "login": username,
            "avatar_url": format!("https://avatars.example/{username}"),
            "html_url": format!("https://github.com/{username}"),
            "name": null,
            "public_repos": 1,
            "followers": 2,
            "public_gists": 3
        }))
        .into_response(),
    }
}

async fn repos_handler(Path(username): Path<String>) -> Response {
    Json(json!([{
        "id": 1,
        "name": "site",
        "description": null,
        "html_url": format!("https://github.com/{username}/site"),
        "owner": { "login": username }
    }]))
    .into_response()
}

async fn listing_handler(Path(form_id): Path<String>) -> Response {
    match form_id.as_str() {
        "private" => return StatusCode::UNAUTHORIZED.into_response(),
        "stored" => {
            return Json(json!({
                "submissions": [
                    { "data": { "name": "Grace", "testimonial": "Fast and careful", "rating": 4 } }
                ]
            }))
            .into_response()
        }
        _ => {}
    }
    Json(json!({ "submissions": [] })).into_response()
}

async fn spawn_backend() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/users/:username", get(user_handler))
        .route("/users/:username/repos", get(repos_handler))
        .route("/forms/:form_id/submissions", get(listing_handler));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn config(base: &Url, testimonial_form_id: &str) -> PortfolioConfig {
    PortfolioConfig {
        username: "octo".into(),
        github_api_base: base.clone(),
        relay_base: base.clone(),
        request_timeout: DEFAULT_REQUEST_TIMEOUT,
        contact_form: FormConfig::contact("contact-id"),
        testimonial_form: FormConfig::testimonial(testimonial_form_id),
        contact: ContactConfig {
            phone: Some("+1 555 0100".into()),
            whatsapp: None,
        },
    }
}

fn testimonial_values() -> FormValues {
    FormValues::from([
        ("name".to_string(), "Grace".to_string()),
        ("testimonial".to_string(), "Fast and careful".to_string()),
        ("rating".to_string(), "4".to_string()),
    ])
}

#[tokio::test]
async fn loads_all_sections() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "testimonial-id"),
        Arc::new(AcceptingRelay),
    )
    .expect("session");

    session.start("octo").await;
    session.wait_for_loads().await;
    let view = session.snapshot().await;

    assert_eq!(view.hero.name.as_deref(), Some("octo"));
    let projects = view.projects.ready().expect("projects");
    assert_eq!(projects.cards.len(), 1);
    assert_eq!(view.stats.ready().map(|stats| stats.gist_count), Some(3));
    assert!(!view.testimonials_loading);
    assert_eq!(view.testimonials.len(), 3);
    assert_eq!(view.contact_links.phone.as_deref(), Some("tel:+15550100"));
    assert_eq!(view.contact_links.whatsapp, None);
}

#[tokio::test]
async fn missing_profile_is_unavailable_and_hero_is_empty() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "private"),
        Arc::new(AcceptingRelay),
    )
    .expect("session");
    let mut events = session.subscribe_events();

    session.start("ghost").await;
    session.wait_for_loads().await;
    let view = session.snapshot().await;

    assert_eq!(view.hero, HeroView::default());
    assert!(matches!(
        view.projects,
        Loadable::Unavailable(ref error) if error.code == ErrorCode::NotFound
    ));
    assert!(matches!(view.stats, Loadable::Unavailable(_)));
    // Listing failure falls back to the seed list.
    assert_eq!(view.testimonials, seed_testimonials());

    let mut saw_profile_event = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::ProfileUpdated(Loadable::Unavailable(_)) = event {
            saw_profile_event = true;
        }
    }
    assert!(saw_profile_event);
}

#[tokio::test]
async fn submitted_testimonial_is_appended_without_moving_carousel() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "testimonial-id"),
        Arc::new(AcceptingRelay),
    )
    .expect("session");
    session.start("octo").await;
    session.wait_for_loads().await;

    assert_eq!(session.go_to_testimonial(1).await, 1);
    let appended = session
        .submit_testimonial(testimonial_values())
        .await
        .expect("submit");

    let view = session.snapshot().await;
    assert_eq!(view.testimonials.len(), 4);
    assert_eq!(view.testimonials.last(), Some(&appended));
    assert_eq!(view.testimonial_index, 1);
    assert_eq!(appended.author_name, "Grace");
    assert!(matches!(
        session.testimonial_form().state(),
        SubmissionState::Succeeded(_)
    ));

    assert_eq!(session.go_to_testimonial(99).await, 3);
    assert_eq!(session.next_testimonial().await, 3);
    assert_eq!(session.prev_testimonial().await, 2);
    assert_eq!(session.next_testimonial().await, 3);
    assert_eq!(
        session.current_testimonial().await.expect("current"),
        appended
    );
}

#[tokio::test]
async fn invalid_contact_is_rejected_before_relay() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "testimonial-id"),
        Arc::new(crate::relay::MissingFormRelay),
    )
    .expect("session");

    let err = session
        .submit_contact(FormValues::from([
            ("name".to_string(), "Ada".to_string()),
            ("email".to_string(), "ada-at-example".to_string()),
            ("message".to_string(), "hi".to_string()),
        ]))
        .await
        .expect_err("must fail");

    assert!(matches!(err, SubmissionError::Validation(ref errors) if errors[0].field == "email"));
}

#[tokio::test]
async fn shutdown_discards_in_flight_loads() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "testimonial-id"),
        Arc::new(AcceptingRelay),
    )
    .expect("session");

    session.start("slow").await;
    session.shutdown().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let view = session.snapshot().await;
    assert!(view.stats.is_loading());
    assert!(view.projects.is_loading());
}

#[tokio::test]
async fn restarting_with_new_subject_discards_previous_load() {
    let base = spawn_backend().await;
    let session = PortfolioSession::new_with_form_relay(
        &config(&base, "testimonial-id"),
        Arc::new(AcceptingRelay),
    )
    .expect("session");

    session.start("slow").await;
    session.start("octo").await;
    session.wait_for_loads().await;

    let view = session.snapshot().await;
    assert_eq!(view.hero.handle.as_deref(), Some("@octo"));
}

#[tokio::test]
async fn reload_does_not_duplicate_a_stored_submission() {
    let base = spawn_backend().await;
    let session =
        PortfolioSession::new_with_form_relay(&config(&base, "stored"), Arc::new(AcceptingRelay))
            .expect("session");
    session.start("octo").await;
    session.wait_for_loads().await;
    assert_eq!(session.snapshot().await.testimonials.len(), 4);

    session
        .submit_testimonial(testimonial_values())
        .await
        .expect("submit");
    assert_eq!(session.snapshot().await.testimonials.len(), 5);

    // The listing now carries the submission; the reload keeps a single copy.
    session.start("octo").await;
    session.wait_for_loads().await;
    let view = session.snapshot().await;
    assert_eq!(view.testimonials.len(), 4);
    assert_eq!(
        view.testimonials
            .iter()
            .filter(|entry| entry.author_name == "Grace")
            .count(),
        1
    );
    assert_eq!(session.go_to_testimonial(0).await, 0);
    assert_eq!(session.prev_testimonial().await, 0);
}
