use serde::{Deserialize, Serialize};

/// Outbound contact numbers supplied at startup. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactConfig {
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactLinks {
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl ContactLinks {
    pub fn from_config(config: &ContactConfig) -> Self {
        Self {
            phone: config.phone.as_deref().and_then(phone_link),
            whatsapp: config.whatsapp.as_deref().and_then(whatsapp_link),
        }
    }
}

fn phone_link(raw: &str) -> Option<String> {
    let number: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if number.chars().any(|c| c.is_ascii_digit()) {
        Some(format!("tel:{number}"))
    } else {
        None
    }
}

fn whatsapp_link(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("https://wa.me/{digits}"))
    }
}
