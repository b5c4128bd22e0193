use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::{contact::ContactConfig, form::FormConfig};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a session needs, resolved and validated once at startup.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub username: String,
    pub github_api_base: Url,
    pub relay_base: Url,
    pub request_timeout: Duration,
    pub contact_form: FormConfig,
    pub testimonial_form: FormConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("username must not be blank")]
    BlankUsername,
    #[error("{field} must not be blank")]
    BlankFormId { field: &'static str },
    #[error("{field} is not a usable base url: {value}")]
    InvalidBaseUrl { field: &'static str, value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

impl PortfolioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::BlankUsername);
        }
        if self.contact_form.form_id.trim().is_empty() {
            return Err(ConfigError::BlankFormId {
                field: "contact_form_id",
            });
        }
        if self.testimonial_form.form_id.trim().is_empty() {
            return Err(ConfigError::BlankFormId {
                field: "testimonial_form_id",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Parses a base url that path segments can be appended to.
pub fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl {
        field,
        value: raw.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(url)
}
