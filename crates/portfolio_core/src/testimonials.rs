//! Testimonial list: the authored seed plus submissions relayed through the testimonial form.

use rand::Rng;
use shared::domain::{Rating, Testimonial};
use tracing::{info, warn};

use crate::{form::FormValues, relay::HttpFormRelay};

const AVATAR_POOL: u32 = 60;
const DEFAULT_QUOTE: &str = "Great work!";
const DEFAULT_AUTHOR: &str = "Anonymous";
const DEFAULT_TITLE: &str = "Client";

pub fn seed_testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            quote: "Delivered our e-commerce platform on time with excellent quality. The site is user-friendly and looks great on all devices.".into(),
            author_name: "Azhr Sheikh".into(),
            author_title: "CEO of Profitmarts Inc.".into(),
            avatar_url: avatar_url(32),
            rating: Rating::default(),
        },
        Testimonial {
            quote: "The gym membership system streamlined our business operations and increased customer satisfaction.".into(),
            author_name: "Azhr Sheikh".into(),
            author_title: "Gym Owner".into(),
            avatar_url: avatar_url(41),
            rating: Rating::default(),
        },
        Testimonial {
            quote: "Professional, responsive, and very knowledgeable. Highly recommended for full-stack projects.".into(),
            author_name: "Kratik Sharma".into(),
            author_title: "Pandit Booking Service Founder".into(),
            avatar_url: avatar_url(55),
            rating: Rating::default(),
        },
    ]
}

fn avatar_url(slot: u32) -> String {
    format!("https://randomuser.me/api/portraits/men/{slot}.jpg")
}

fn non_blank<'a>(values: &'a FormValues, field: &str) -> Option<&'a str> {
    values
        .get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Maps testimonial form values (fresh or relayed) into a displayable entry,
/// filling defaults for anything missing.
pub fn testimonial_from_fields(values: &FormValues) -> Testimonial {
    let rating = non_blank(values, "rating")
        .and_then(|raw| Rating::parse(raw).ok())
        .unwrap_or_default();

    Testimonial {
        quote: non_blank(values, "testimonial")
            .unwrap_or(DEFAULT_QUOTE)
            .to_string(),
        author_name: non_blank(values, "name").unwrap_or(DEFAULT_AUTHOR).to_string(),
        author_title: non_blank(values, "company")
            .unwrap_or(DEFAULT_TITLE)
            .to_string(),
        avatar_url: avatar_url(rand::rng().random_range(0..AVATAR_POOL)),
        rating,
    }
}

#[derive(Debug, Clone)]
pub struct TestimonialFeed {
    relay: HttpFormRelay,
    form_id: String,
}

impl TestimonialFeed {
    pub fn new(relay: HttpFormRelay, form_id: impl Into<String>) -> Self {
        Self {
            relay,
            form_id: form_id.into(),
        }
    }

    /// Seed entries followed by relayed submissions. Never fails: if the listing
    /// cannot be read the seed list is returned on its own.
    pub async fn load_testimonials(&self) -> Vec<Testimonial> {
        let mut testimonials = seed_testimonials();
        match self.relay.list_submissions(&self.form_id).await {
            Ok(listing) => {
                let relayed = listing
                    .submissions
                    .iter()
                    .map(|record| testimonial_from_fields(&record.string_fields()));
                testimonials.extend(relayed);
                info!(
                    form_id = %self.form_id,
                    total = testimonials.len(),
                    "testimonials loaded"
                );
            }
            Err(error) => {
                warn!(
                    form_id = %self.form_id,
                    %error,
                    "testimonial listing unavailable; using seed list"
                );
            }
        }
        testimonials
    }
}

#[cfg(test)]
#[path = "tests/testimonials_tests.rs"]
mod tests;
