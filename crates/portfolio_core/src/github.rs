//! Profile API clients: the full profile bundle for the hero and projects
//! sections, and the narrower stats projection.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Profile, Repository, Stats},
    error::FetchError,
    protocol::{RepositoryPayload, StatsPayload, UserPayload},
};
use tracing::{debug, info};
use url::Url;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const REPOSITORY_PAGE_SIZE: u32 = 6;
const CLIENT_USER_AGENT: &str = "portfolio-view-model";

/// Builds the HTTP client shared by every remote call, with API headers and a request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
}

#[derive(Debug, Clone)]
struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Network(format!("invalid API base url {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "profile api request");
        let response = self
            .http
            .get(url.clone())
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

/// A profile together with its most recently updated repositories, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBundle {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}

#[derive(Debug, Clone)]
pub struct ProfileClient {
    api: ApiClient,
}

impl ProfileClient {
    pub fn new(http: Client, base: Url) -> Self {
        Self {
            api: ApiClient { http, base },
        }
    }

    /// Loads the profile, then the repository page. Either failure fails the whole load;
    /// nothing from the first request is returned on its own.
    pub async fn load_profile(&self, username: &str) -> Result<ProfileBundle, FetchError> {
        let profile_url = self.api.endpoint(&["users", username])?;
        let user: UserPayload = self.api.get_json(profile_url).await?;

        let mut repos_url = self.api.endpoint(&["users", username, "repos"])?;
        repos_url
            .query_pairs_mut()
            .append_pair("per_page", &REPOSITORY_PAGE_SIZE.to_string())
            .append_pair("sort", "updated");
        let repos: Vec<RepositoryPayload> = self.api.get_json(repos_url).await?;

        let bundle = ProfileBundle {
            profile: user.into(),
            repositories: repos.into_iter().map(Repository::from).collect(),
        };
        info!(
            login = %bundle.profile.login,
            repositories = bundle.repositories.len(),
            "profile loaded"
        );
        Ok(bundle)
    }
}

#[derive(Debug, Clone)]
pub struct StatsClient {
    api: ApiClient,
}

impl StatsClient {
    pub fn new(http: Client, base: Url) -> Self {
        Self {
            api: ApiClient { http, base },
        }
    }

    pub async fn load_stats(&self, username: &str) -> Result<Stats, FetchError> {
        let url = self.api.endpoint(&["users", username])?;
        let payload: StatsPayload = self.api.get_json(url).await?;
        Ok(payload.into())
    }
}

#[cfg(test)]
#[path = "tests/github_tests.rs"]
mod tests;
