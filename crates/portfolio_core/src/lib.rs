//! View-model layer for the portfolio: remote profile data, the contact and
//! testimonial forms, and the testimonial carousel.

pub mod carousel;
pub mod config;
pub mod contact;
pub mod content;
pub mod form;
pub mod github;
pub mod relay;
pub mod session;
pub mod testimonials;
pub mod view_model;

pub use carousel::Carousel;
pub use config::{ConfigError, PortfolioConfig};
pub use contact::{ContactConfig, ContactLinks};
pub use form::{FormConfig, FormKind, FormSubmission, FormValues, SubmissionState};
pub use github::{ProfileBundle, ProfileClient, StatsClient};
pub use relay::{FormRelay, HttpFormRelay, MissingFormRelay};
pub use session::{PortfolioSession, PortfolioView, SessionEvent};
pub use testimonials::TestimonialFeed;
pub use view_model::{HeroView, Loadable, ProjectCard, ProjectsView};
