use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_core::{
    content,
    form::SubmissionState,
    view_model::{stat_items, Loadable},
    FormValues, PortfolioSession, PortfolioView,
};
use shared::error::SubmissionError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Portfolio sections rendered from the profile API and form relay")]
struct Args {
    /// Profile to render instead of the configured one.
    #[arg(long, global = true)]
    username: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every section and print it.
    Show,
    /// Send a message through the contact form.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        verification_token: Option<String>,
    },
    /// Share a testimonial; it is appended to the carousel on success.
    Testimonial {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        text: String,
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long)]
        verification_token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(username) = args.username {
        settings.username = username;
    }
    let config = settings.into_config().context("invalid portfolio configuration")?;
    let session = PortfolioSession::new(&config).context("failed to build HTTP client")?;

    match args.command.unwrap_or(Command::Show) {
        Command::Show => {
            load_sections(&session, &config.username).await;
            render(&session.snapshot().await);
        }
        Command::Contact {
            name,
            email,
            message,
            verification_token,
        } => {
            if let Some(token) = verification_token {
                session.contact_form().set_verification_token(token);
            }
            let values = FormValues::from([
                ("name".to_string(), name),
                ("email".to_string(), email),
                ("message".to_string(), message),
            ]);
            match session.submit_contact(values).await {
                Ok(_) => println!("Message sent! Thanks for reaching out."),
                Err(error) => report_submission_failure(
                    &error,
                    &session.contact_form().state(),
                ),
            }
        }
        Command::Testimonial {
            name,
            company,
            text,
            rating,
            verification_token,
        } => {
            load_sections(&session, &config.username).await;
            if let Some(token) = verification_token {
                session.testimonial_form().set_verification_token(token);
            }
            let mut values = FormValues::from([
                ("name".to_string(), name),
                ("testimonial".to_string(), text),
            ]);
            if let Some(company) = company {
                values.insert("company".to_string(), company);
            }
            if let Some(rating) = rating {
                values.insert("rating".to_string(), rating.to_string());
            }
            match session.submit_testimonial(values).await {
                Ok(testimonial) => {
                    println!("Thank you for your testimonial, {}!", testimonial.author_name);
                    render_testimonials(&session.snapshot().await);
                }
                Err(error) => report_submission_failure(
                    &error,
                    &session.testimonial_form().state(),
                ),
            }
        }
    }

    session.shutdown().await;
    Ok(())
}

/// Starts the loads and waits for them, abandoning them on Ctrl-C.
async fn load_sections(session: &PortfolioSession, username: &str) {
    session.start(username).await;
    tokio::select! {
        _ = session.wait_for_loads() => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted; abandoning in-flight loads");
            session.shutdown().await;
        }
    }
    info!(username, "sections loaded");
}

fn report_submission_failure(error: &SubmissionError, state: &SubmissionState) {
    warn!(code = ?error.code(), %error, "form submission failed");
    if let SubmissionState::Failed(failure) = state {
        eprintln!("{}", failure.summary);
        for field_error in &failure.field_errors {
            eprintln!("  {}: {}", field_error.field, field_error.message);
        }
    } else {
        eprintln!("{error}");
    }
}

fn render(view: &PortfolioView) {
    match &view.hero.name {
        Some(name) => {
            println!("# {name}");
            if let Some(handle) = &view.hero.handle {
                println!("{handle}");
            }
            if let Some(avatar) = &view.hero.avatar_url {
                println!("avatar: {avatar}");
            }
            if let (Some(repos), Some(followers)) =
                (view.hero.public_repo_count, view.hero.follower_count)
            {
                println!("Public Repos: {repos}  Followers: {followers}");
            }
        }
        None => println!("# Portfolio"),
    }

    println!("\n## About");
    for paragraph in content::ABOUT {
        println!("{paragraph}");
    }

    println!("\n## Skills");
    let skills: Vec<&str> = content::SKILLS.iter().map(|skill| skill.name).collect();
    println!("{}", skills.join(", "));

    println!("\n## Projects");
    match &view.projects {
        Loadable::Loading => println!("Loading projects..."),
        Loadable::Unavailable(error) => println!("Projects unavailable ({})", error.message),
        Loadable::Ready(projects) => {
            for card in &projects.cards {
                println!("- {} [{} stars, {} forks]", card.name, card.star_count, card.fork_count);
                println!("  {}", card.description);
                if let Some(language) = &card.language {
                    println!("  language: {language}");
                }
                println!("  code: {}", card.code_url);
                if let Some(demo) = &card.demo_url {
                    println!("  demo: {demo}");
                }
            }
            println!("More on {}", projects.more_url);
        }
    }

    println!("\n## Clients");
    for client in content::CLIENTS {
        println!("- {}: {}", client.name, client.description);
    }

    println!("\n## GitHub Stats");
    match &view.stats {
        Loadable::Loading => println!("Loading..."),
        Loadable::Unavailable(_) => println!("Stats unavailable"),
        Loadable::Ready(stats) => {
            for item in stat_items(stats) {
                println!("{}: {}", item.label, item.value);
            }
        }
    }

    render_testimonials(view);

    println!("\n## Certifications");
    for cert in content::CERTIFICATIONS {
        println!("- {} ({}, {})", cert.name, cert.issuer, cert.year);
    }

    println!("\n## Contact");
    match (&view.contact_links.phone, &view.contact_links.whatsapp) {
        (None, None) => println!("Use the contact form."),
        (phone, whatsapp) => {
            if let Some(phone) = phone {
                println!("call: {phone}");
            }
            if let Some(whatsapp) = whatsapp {
                println!("whatsapp: {whatsapp}");
            }
        }
    }

    println!();
    let links: Vec<String> = content::SOCIAL_LINKS
        .iter()
        .map(|link| format!("{}: {}", link.label, link.url))
        .collect();
    println!("{}", links.join("  "));
}

fn render_testimonials(view: &PortfolioView) {
    println!("\n## Testimonials");
    if view.testimonials_loading {
        println!("Loading testimonials...");
        return;
    }
    let Some(current) = view.testimonials.get(view.testimonial_index) else {
        println!("No testimonials yet.");
        return;
    };
    let stars = "*".repeat(usize::from(current.rating.stars()));
    println!("\"{}\"", current.quote);
    println!("  {}, {} {stars}", current.author_name, current.author_title);
    println!(
        "  [{}/{}]",
        view.testimonial_index + 1,
        view.testimonials.len()
    );
}
