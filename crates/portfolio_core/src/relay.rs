//! Third-party form relay: submits form values and lists previously relayed submissions.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use shared::{
    error::{FetchError, RelayError},
    protocol::{RelayResponse, SubmissionListing},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::form::FormValues;

pub const RELAY_BASE: &str = "https://formspree.io";
const GENERIC_RELAY_FAILURE: &str = "the form relay rejected the submission";

#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn submit(&self, form_id: &str, values: &FormValues) -> Result<(), RelayError>;
}

pub struct MissingFormRelay;

#[async_trait]
impl FormRelay for MissingFormRelay {
    async fn submit(&self, form_id: &str, _values: &FormValues) -> Result<(), RelayError> {
        Err(RelayError::transport(format!(
            "no form relay configured for form {form_id}"
        )))
    }
}

#[derive(Debug, Clone)]
pub struct HttpFormRelay {
    http: Client,
    base: Url,
}

impl HttpFormRelay {
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url)
    }

    /// Lists submissions previously relayed for `form_id`.
    pub async fn list_submissions(&self, form_id: &str) -> Result<SubmissionListing, FetchError> {
        let url = self
            .endpoint(&["forms", form_id, "submissions"])
            .ok_or_else(|| FetchError::Network(format!("invalid relay base url {}", self.base)))?;

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| FetchError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16(), url.as_str()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::Network(error.to_string()))?;
        serde_json::from_slice(&body).map_err(|error| FetchError::Decode(error.to_string()))
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn submit(&self, form_id: &str, values: &FormValues) -> Result<(), RelayError> {
        let url = self.endpoint(&["f", form_id]).ok_or_else(|| {
            RelayError::transport(format!("invalid relay base url {}", self.base))
        })?;

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(values)
            .send()
            .await
            .map_err(|error| RelayError::transport(error.to_string()))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| RelayError {
            status: Some(status.as_u16()),
            message: format!("failed to read relay response: {error}"),
            field_errors: Vec::new(),
        })?;

        // An empty 2xx body counts as accepted; anything else must say `ok`.
        let parsed: RelayResponse = if body.is_empty() {
            RelayResponse {
                ok: status.is_success(),
                errors: Vec::new(),
            }
        } else {
            match serde_json::from_slice(&body) {
                Ok(parsed) => parsed,
                Err(error) => {
                    debug!(form_id, %error, "relay response is not json");
                    RelayResponse::default()
                }
            }
        };

        if status.is_success() && parsed.ok && parsed.errors.is_empty() {
            info!(form_id, "form submission relayed");
            return Ok(());
        }

        let mut message = None;
        let mut field_errors = Vec::new();
        for error in parsed.errors {
            let text = error.message.clone();
            match error.into_validation_error() {
                Some(field_error) => field_errors.push(field_error),
                None => {
                    message.get_or_insert(text);
                }
            }
        }

        warn!(
            form_id,
            status = status.as_u16(),
            field_errors = field_errors.len(),
            "form relay rejected submission"
        );
        Err(RelayError {
            status: Some(status.as_u16()),
            message: message.unwrap_or_else(|| GENERIC_RELAY_FAILURE.to_string()),
            field_errors,
        })
    }
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
