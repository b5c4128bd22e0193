//! Owns the remote loads and the two forms for one rendered portfolio.

use std::sync::{Arc, Mutex as StdMutex};

use shared::{
    domain::{Stats, Testimonial},
    error::{EmptyCollection, SubmissionError},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    carousel::Carousel,
    config::PortfolioConfig,
    contact::ContactLinks,
    form::{FormKind, FormSubmission, FormValues, SubmissionState},
    github::{build_http_client, ProfileBundle, ProfileClient, StatsClient},
    relay::{FormRelay, HttpFormRelay},
    testimonials::{seed_testimonials, testimonial_from_fields, TestimonialFeed},
    view_model::{HeroView, Loadable, ProjectsView},
};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    ProfileUpdated(Loadable<ProfileBundle>),
    StatsUpdated(Loadable<Stats>),
    TestimonialsLoaded { count: usize },
    TestimonialAppended(Testimonial),
    FormStateChanged {
        kind: FormKind,
        state: SubmissionState,
    },
}

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone)]
pub struct PortfolioView {
    pub hero: HeroView,
    pub projects: Loadable<ProjectsView>,
    pub stats: Loadable<Stats>,
    pub testimonials: Vec<Testimonial>,
    pub testimonial_index: usize,
    pub testimonials_loading: bool,
    pub contact_links: ContactLinks,
}

struct SessionState {
    subject: Option<String>,
    closed: bool,
    profile: Loadable<ProfileBundle>,
    stats: Loadable<Stats>,
    testimonials: Carousel<Testimonial>,
    testimonials_loading: bool,
    appended: Vec<Testimonial>,
}

impl SessionState {
    fn accepts(&self, subject: &str) -> bool {
        !self.closed && self.subject.as_deref() == Some(subject)
    }
}

pub struct PortfolioSession {
    profiles: ProfileClient,
    stats: StatsClient,
    feed: TestimonialFeed,
    contact_form: FormSubmission,
    testimonial_form: FormSubmission,
    contact_links: ContactLinks,
    state: Arc<Mutex<SessionState>>,
    tasks: StdMutex<Vec<JoinHandle<()>>>,
    aborts: StdMutex<Vec<AbortHandle>>,
    events: broadcast::Sender<SessionEvent>,
}

impl PortfolioSession {
    pub fn new(config: &PortfolioConfig) -> Result<Self, reqwest::Error> {
        let http = build_http_client(config.request_timeout)?;
        let relay = HttpFormRelay::new(http.clone(), config.relay_base.clone());
        Ok(Self::assemble(config, http, relay.clone(), Arc::new(relay)))
    }

    /// Same as [`PortfolioSession::new`] but with form submissions routed through `relay`.
    pub fn new_with_form_relay(
        config: &PortfolioConfig,
        relay: Arc<dyn FormRelay>,
    ) -> Result<Self, reqwest::Error> {
        let http = build_http_client(config.request_timeout)?;
        let listing = HttpFormRelay::new(http.clone(), config.relay_base.clone());
        Ok(Self::assemble(config, http, listing, relay))
    }

    fn assemble(
        config: &PortfolioConfig,
        http: reqwest::Client,
        listing: HttpFormRelay,
        relay: Arc<dyn FormRelay>,
    ) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            profiles: ProfileClient::new(http.clone(), config.github_api_base.clone()),
            stats: StatsClient::new(http, config.github_api_base.clone()),
            feed: TestimonialFeed::new(listing, config.testimonial_form.form_id.clone()),
            contact_form: FormSubmission::new(config.contact_form.clone(), Arc::clone(&relay)),
            testimonial_form: FormSubmission::new(config.testimonial_form.clone(), relay),
            contact_links: ContactLinks::from_config(&config.contact),
            state: Arc::new(Mutex::new(SessionState {
                subject: None,
                closed: false,
                profile: Loadable::Loading,
                stats: Loadable::Loading,
                testimonials: Carousel::new(seed_testimonials()),
                testimonials_loading: true,
                appended: Vec::new(),
            })),
            tasks: StdMutex::new(Vec::new()),
            aborts: StdMutex::new(Vec::new()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn contact_form(&self) -> &FormSubmission {
        &self.contact_form
    }

    pub fn testimonial_form(&self) -> &FormSubmission {
        &self.testimonial_form
    }

    /// Starts the profile, stats and testimonial loads for `username`. Loads from an
    /// earlier `start` are aborted and their results discarded.
    pub async fn start(&self, username: &str) {
        self.abort_tasks();

        {
            let mut state = self.state.lock().await;
            state.subject = Some(username.to_string());
            state.closed = false;
            state.profile = Loadable::Loading;
            state.stats = Loadable::Loading;
            state.testimonials_loading = true;
        }
        info!(username, "portfolio session starting");

        let handles = vec![
            self.spawn_profile_load(username.to_string()),
            self.spawn_stats_load(username.to_string()),
            self.spawn_testimonial_load(username.to_string()),
        ];
        lock_unpoisoned(&self.aborts).extend(handles.iter().map(JoinHandle::abort_handle));
        lock_unpoisoned(&self.tasks).extend(handles);
    }

    fn spawn_profile_load(&self, subject: String) -> JoinHandle<()> {
        let client = self.profiles.clone();
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.load_profile(&subject).await;
            if let Err(error) = &result {
                warn!(username = %subject, %error, "profile unavailable");
            }
            let loaded = Loadable::from_result(result);

            let mut state = state.lock().await;
            if !state.accepts(&subject) {
                debug!(username = %subject, "discarding stale profile load");
                return;
            }
            state.profile = loaded.clone();
            let _ = events.send(SessionEvent::ProfileUpdated(loaded));
        })
    }

    fn spawn_stats_load(&self, subject: String) -> JoinHandle<()> {
        let client = self.stats.clone();
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.load_stats(&subject).await;
            if let Err(error) = &result {
                warn!(username = %subject, %error, "stats unavailable");
            }
            let loaded = Loadable::from_result(result);

            let mut state = state.lock().await;
            if !state.accepts(&subject) {
                debug!(username = %subject, "discarding stale stats load");
                return;
            }
            state.stats = loaded.clone();
            let _ = events.send(SessionEvent::StatsUpdated(loaded));
        })
    }

    fn spawn_testimonial_load(&self, subject: String) -> JoinHandle<()> {
        let feed = self.feed.clone();
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut testimonials = feed.load_testimonials().await;

            let mut state = state.lock().await;
            if !state.accepts(&subject) {
                return;
            }
            // Entries appended this session stay after whatever the feed returned,
            // unless the listing already carries them.
            for entry in &state.appended {
                if !testimonials.iter().any(|known| known.same_submission(entry)) {
                    testimonials.push(entry.clone());
                }
            }
            let count = testimonials.len();
            state.testimonials.replace_items(testimonials);
            state.testimonials_loading = false;
            let _ = events.send(SessionEvent::TestimonialsLoaded { count });
        })
    }

    /// Waits for every in-flight load to finish.
    pub async fn wait_for_loads(&self) {
        let handles: Vec<JoinHandle<()>> = lock_unpoisoned(&self.tasks).drain(..).collect();
        for handle in handles {
            if let Err(error) = handle.await {
                if !error.is_cancelled() {
                    warn!(%error, "portfolio load task failed");
                }
            }
        }
    }

    /// Aborts in-flight loads; nothing is written to the session afterwards.
    pub async fn shutdown(&self) {
        self.abort_tasks();
        self.state.lock().await.closed = true;
        info!("portfolio session closed");
    }

    fn abort_tasks(&self) {
        // Abort handles outlive a `wait_for_loads` that took the join handles.
        for handle in lock_unpoisoned(&self.aborts).drain(..) {
            handle.abort();
        }
        lock_unpoisoned(&self.tasks).clear();
    }

    pub async fn snapshot(&self) -> PortfolioView {
        let state = self.state.lock().await;
        let fallback_owner = state.subject.clone().unwrap_or_default();
        PortfolioView {
            hero: HeroView::from_profile(&state.profile),
            projects: ProjectsView::from_profile(&state.profile, &fallback_owner),
            stats: state.stats.clone(),
            testimonials: state.testimonials.items().to_vec(),
            testimonial_index: state.testimonials.index(),
            testimonials_loading: state.testimonials_loading,
            contact_links: self.contact_links.clone(),
        }
    }

    pub async fn current_testimonial(&self) -> Result<Testimonial, EmptyCollection> {
        self.state.lock().await.testimonials.current_item().cloned()
    }

    pub async fn next_testimonial(&self) -> usize {
        let mut state = self.state.lock().await;
        state.testimonials.next();
        state.testimonials.index()
    }

    pub async fn prev_testimonial(&self) -> usize {
        let mut state = self.state.lock().await;
        state.testimonials.prev();
        state.testimonials.index()
    }

    pub async fn go_to_testimonial(&self, index: isize) -> usize {
        let mut state = self.state.lock().await;
        state.testimonials.go_to(index);
        state.testimonials.index()
    }

    pub async fn submit_contact(&self, values: FormValues) -> Result<FormValues, SubmissionError> {
        let result = self.contact_form.submit(values).await;
        self.publish_form_state(&self.contact_form);
        result
    }

    /// Submits a testimonial; on success the new entry is appended to the carousel
    /// without moving its position.
    pub async fn submit_testimonial(
        &self,
        values: FormValues,
    ) -> Result<Testimonial, SubmissionError> {
        let result = self.testimonial_form.submit(values).await;
        self.publish_form_state(&self.testimonial_form);
        let submitted = result?;

        let testimonial = testimonial_from_fields(&submitted);
        {
            let mut state = self.state.lock().await;
            if state.closed {
                return Ok(testimonial);
            }
            state.appended.push(testimonial.clone());
            state.testimonials.push(testimonial.clone());
        }
        let _ = self
            .events
            .send(SessionEvent::TestimonialAppended(testimonial.clone()));
        Ok(testimonial)
    }

    fn publish_form_state(&self, form: &FormSubmission) {
        let _ = self.events.send(SessionEvent::FormStateChanged {
            kind: form.config().kind,
            state: form.state(),
        });
    }
}

fn lock_unpoisoned<T>(mutex: &StdMutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Drop for PortfolioSession {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
