//! Wire shapes for the profile API and the form relay, and their conversion into domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Profile, Repository, RepositoryId, Stats},
    error::ValidationError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    #[serde(default)]
    pub public_gists: u32,
}

impl From<UserPayload> for Profile {
    fn from(value: UserPayload) -> Self {
        Self {
            login: value.login,
            display_name: non_blank(value.name),
            avatar_url: value.avatar_url,
            html_url: value.html_url,
            bio: non_blank(value.bio),
            public_repo_count: value.public_repos,
            follower_count: value.followers,
            gist_count: value.public_gists,
        }
    }
}

/// Only the counters are read; everything else in the user payload is ignored.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatsPayload {
    pub followers: u32,
    pub public_repos: u32,
    pub public_gists: u32,
}

impl From<StatsPayload> for Stats {
    fn from(value: StatsPayload) -> Self {
        Self {
            follower_count: value.followers,
            public_repo_count: value.public_repos,
            gist_count: value.public_gists,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
    pub owner: OwnerPayload,
}

impl From<RepositoryPayload> for Repository {
    fn from(value: RepositoryPayload) -> Self {
        Self {
            id: RepositoryId(value.id),
            name: value.name,
            description: non_blank(value.description),
            language: non_blank(value.language),
            star_count: value.stargazers_count,
            fork_count: value.forks_count,
            homepage_url: non_blank(value.homepage),
            html_url: value.html_url,
            owner_login: value.owner.login,
        }
    }
}

/// Body of a relay response. Success is `{"ok": true}`; failures carry `errors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<RelayFieldError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayFieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

impl RelayFieldError {
    /// Relay errors without a field name apply to the form as a whole.
    pub fn into_validation_error(self) -> Option<ValidationError> {
        self.field
            .map(|field| ValidationError::new(field, self.message))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionListing {
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl SubmissionRecord {
    /// Flattens the record into string values; numbers are rendered, other shapes dropped.
    pub fn string_fields(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
