use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(RepositoryId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub display_name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub public_repo_count: u32,
    pub follower_count: u32,
    pub gist_count: u32,
}

impl Profile {
    /// Name shown in the hero section; the login stands in when no display name is set.
    pub fn headline_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepositoryId,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub star_count: u32,
    pub fork_count: u32,
    pub homepage_url: Option<String>,
    pub html_url: String,
    pub owner_login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub follower_count: u32,
    pub public_repo_count: u32,
    pub gist_count: u32,
}

/// Star rating attached to a testimonial. Always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(ValidationError::new(
                "rating",
                format!("rating must be between {} and {}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let stars = raw
            .trim()
            .parse::<u8>()
            .map_err(|_| ValidationError::new("rating", "rating must be a whole number"))?;
        Self::new(stars)
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author_name: String,
    pub author_title: String,
    pub avatar_url: String,
    pub rating: Rating,
}

impl Testimonial {
    /// Same submitted content. The avatar is assigned on display and is ignored.
    pub fn same_submission(&self, other: &Self) -> bool {
        self.quote == other.quote
            && self.author_name == other.author_name
            && self.author_title == other.author_title
            && self.rating == other.rating
    }
}
