use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use portfolio_core::{
    config::{parse_base_url, DEFAULT_REQUEST_TIMEOUT},
    github::GITHUB_API_BASE,
    relay::RELAY_BASE,
    ContactConfig, FormConfig, PortfolioConfig,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "portfolio.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub github_api_base: String,
    pub relay_base: String,
    pub contact_form_id: String,
    pub testimonial_form_id: String,
    pub contact_requires_verification: bool,
    pub testimonial_requires_verification: bool,
    pub request_timeout_secs: u64,
    pub contact_phone: Option<String>,
    pub whatsapp_number: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: "gaura2003".into(),
            github_api_base: GITHUB_API_BASE.into(),
            relay_base: RELAY_BASE.into(),
            contact_form_id: "xldbzlop".into(),
            testimonial_form_id: "xvgalqdp".into(),
            contact_requires_verification: false,
            testimonial_requires_verification: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            contact_phone: None,
            whatsapp_number: None,
        }
    }
}

/// Keys accepted in `portfolio.toml`; anything absent keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    username: Option<String>,
    github_api_base: Option<String>,
    relay_base: Option<String>,
    contact_form_id: Option<String>,
    testimonial_form_id: Option<String>,
    contact_requires_verification: Option<bool>,
    testimonial_requires_verification: Option<bool>,
    request_timeout_secs: Option<u64>,
    contact_phone: Option<String>,
    whatsapp_number: Option<String>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.username {
        settings.username = v;
    }
    if let Some(v) = file_cfg.github_api_base {
        settings.github_api_base = v;
    }
    if let Some(v) = file_cfg.relay_base {
        settings.relay_base = v;
    }
    if let Some(v) = file_cfg.contact_form_id {
        settings.contact_form_id = v;
    }
    if let Some(v) = file_cfg.testimonial_form_id {
        settings.testimonial_form_id = v;
    }
    if let Some(v) = file_cfg.contact_requires_verification {
        settings.contact_requires_verification = v;
    }
    if let Some(v) = file_cfg.testimonial_requires_verification {
        settings.testimonial_requires_verification = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if file_cfg.contact_phone.is_some() {
        settings.contact_phone = file_cfg.contact_phone;
    }
    if file_cfg.whatsapp_number.is_some() {
        settings.whatsapp_number = file_cfg.whatsapp_number;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PORTFOLIO_USERNAME") {
        settings.username = v;
    }
    if let Some(v) = lookup("APP__USERNAME") {
        settings.username = v;
    }

    if let Some(v) = lookup("APP__GITHUB_API_BASE") {
        settings.github_api_base = v;
    }
    if let Some(v) = lookup("APP__RELAY_BASE") {
        settings.relay_base = v;
    }

    if let Some(v) = lookup("APP__CONTACT_FORM_ID") {
        settings.contact_form_id = v;
    }
    if let Some(v) = lookup("APP__TESTIMONIAL_FORM_ID") {
        settings.testimonial_form_id = v;
    }

    if let Some(v) = lookup("APP__CONTACT_REQUIRES_VERIFICATION").and_then(|v| parse_flag(&v)) {
        settings.contact_requires_verification = v;
    }
    if let Some(v) = lookup("APP__TESTIMONIAL_REQUIRES_VERIFICATION").and_then(|v| parse_flag(&v))
    {
        settings.testimonial_requires_verification = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("CONTACT_PHONE") {
        settings.contact_phone = Some(v);
    }
    if let Some(v) = lookup("WHATSAPP_NUMBER") {
        settings.whatsapp_number = Some(v);
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    pub fn into_config(self) -> anyhow::Result<PortfolioConfig> {
        let config = PortfolioConfig {
            username: self.username.trim().to_string(),
            github_api_base: parse_base_url("github_api_base", &self.github_api_base)?,
            relay_base: parse_base_url("relay_base", &self.relay_base)?,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            contact_form: FormConfig::contact(self.contact_form_id.trim())
                .with_verification(self.contact_requires_verification),
            testimonial_form: FormConfig::testimonial(self.testimonial_form_id.trim())
                .with_verification(self.testimonial_requires_verification),
            contact: ContactConfig {
                phone: self.contact_phone,
                whatsapp: self.whatsapp_number,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
