use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    RateLimited,
    Http,
    Network,
    Decode,
    Validation,
    Relay,
}

/// Serializable summary of a failure, suitable for a view-model's "unavailable" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure while reading from the profile API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },
    #[error("rate limited (HTTP {status})")]
    RateLimited { status: u16 },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn from_status(status: u16, url: impl Into<String>) -> Self {
        if status == 403 || status == 429 {
            Self::RateLimited { status }
        } else {
            Self::Http {
                status,
                url: url.into(),
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::Network,
            Self::Http { status: 404, .. } => ErrorCode::NotFound,
            Self::Http { .. } => ErrorCode::Http,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::Decode(_) => ErrorCode::Decode,
        }
    }
}

impl From<&FetchError> for ApiError {
    fn from(value: &FetchError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(value: FetchError) -> Self {
        Self::from(&value)
    }
}

/// A single client-side or relay-reported field problem.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The relay refused or failed to accept a submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RelayError {
    pub status: Option<u16>,
    pub message: String,
    pub field_errors: Vec<ValidationError>,
}

impl RelayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<ValidationError>),
    #[error("submission failed: {0}")]
    Relay(#[from] RelayError),
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("form already submitted; reset it before submitting again")]
    AlreadySucceeded,
}

impl SubmissionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) | Self::AlreadySubmitting | Self::AlreadySucceeded => {
                ErrorCode::Validation
            }
            Self::Relay(_) => ErrorCode::Relay,
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("collection is empty")]
pub struct EmptyCollection;
