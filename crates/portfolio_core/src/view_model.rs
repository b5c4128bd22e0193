//! Render-ready state derived from remote data.

use shared::{
    domain::{Repository, Stats},
    error::{ApiError, FetchError},
};

use crate::github::ProfileBundle;

pub const NO_DESCRIPTION: &str = "No description provided.";
const PROFILE_HOST: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Unavailable(ApiError),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Unavailable(error.into()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Hero section. Every field is `None` unless the profile loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeroView {
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub public_repo_count: Option<u32>,
    pub follower_count: Option<u32>,
}

impl HeroView {
    pub fn from_profile(profile: &Loadable<ProfileBundle>) -> Self {
        let Some(bundle) = profile.ready() else {
            return Self::default();
        };
        let profile = &bundle.profile;
        Self {
            avatar_url: Some(profile.avatar_url.clone()),
            name: Some(profile.headline_name().to_string()),
            handle: Some(format!("@{}", profile.login)),
            public_repo_count: Some(profile.public_repo_count),
            follower_count: Some(profile.follower_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub name: String,
    pub description: String,
    pub language: Option<String>,
    pub star_count: u32,
    pub fork_count: u32,
    pub code_url: String,
    pub demo_url: Option<String>,
}

impl From<&Repository> for ProjectCard {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            language: repo.language.clone(),
            star_count: repo.star_count,
            fork_count: repo.fork_count,
            code_url: repo.html_url.clone(),
            demo_url: repo.homepage_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsView {
    pub cards: Vec<ProjectCard>,
    pub more_url: String,
}

impl ProjectsView {
    /// `fallback_owner` is used for the "more projects" link when no repository names an owner.
    pub fn from_profile(profile: &Loadable<ProfileBundle>, fallback_owner: &str) -> Loadable<Self> {
        match profile {
            Loadable::Loading => Loadable::Loading,
            Loadable::Unavailable(error) => Loadable::Unavailable(error.clone()),
            Loadable::Ready(bundle) => {
                let owner = bundle
                    .repositories
                    .first()
                    .map(|repo| repo.owner_login.as_str())
                    .unwrap_or(fallback_owner);
                Loadable::Ready(Self {
                    cards: bundle.repositories.iter().map(ProjectCard::from).collect(),
                    more_url: format!("{PROFILE_HOST}/{owner}"),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatItem {
    pub label: &'static str,
    pub value: u32,
}

pub fn stat_items(stats: &Stats) -> [StatItem; 3] {
    [
        StatItem {
            label: "Followers",
            value: stats.follower_count,
        },
        StatItem {
            label: "Repositories",
            value: stats.public_repo_count,
        },
        StatItem {
            label: "Gists",
            value: stats.gist_count,
        },
    ]
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
