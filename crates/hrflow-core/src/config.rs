//! Configuration loading.
//!
//! Typed settings for the outbound mail transport and HR notification
//! routing, with environment-variable loaders and defaults in one place so
//! individual crates do not repeat the lookups.

use serde::{Deserialize, Serialize};

/// Environment variable names.
pub mod env_vars {
    pub const DATA_DIR: &str = "HRFLOW_DATA_DIR";
    pub const SMTP_SERVER: &str = "HRFLOW_SMTP_SERVER";
    pub const SMTP_PORT: &str = "HRFLOW_SMTP_PORT";
    pub const SMTP_USERNAME: &str = "HRFLOW_SMTP_USERNAME";
    pub const SMTP_PASSWORD: &str = "HRFLOW_SMTP_PASSWORD";
    pub const MAIL_FROM: &str = "HRFLOW_MAIL_FROM";
    pub const MAIL_USE_TLS: &str = "HRFLOW_MAIL_USE_TLS";
    /// Comma-separated list of HR personnel addresses.
    pub const HR_NOTIFICATION_EMAILS: &str = "HRFLOW_HR_NOTIFICATION_EMAILS";
}

/// Default settings.
pub mod defaults {
    pub const DATA_DIR: &str = "data";
    pub const SMTP_PORT: u16 = 587;
}

/// Data directory for persistent storage, from the environment or the
/// default.
pub fn data_dir() -> String {
    std::env::var(env_vars::DATA_DIR).unwrap_or_else(|_| defaults::DATA_DIR.to_string())
}

/// SMTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Load from the environment. Returns `None` when no server is
    /// configured, in which case email dispatch stays disabled.
    pub fn from_env() -> Option<Self> {
        let server = std::env::var(env_vars::SMTP_SERVER).ok()?;
        let port = std::env::var(env_vars::SMTP_PORT)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults::SMTP_PORT);
        let username = std::env::var(env_vars::SMTP_USERNAME).unwrap_or_default();
        let password = std::env::var(env_vars::SMTP_PASSWORD).unwrap_or_default();
        let from_address = std::env::var(env_vars::MAIL_FROM).unwrap_or_else(|_| username.clone());
        let use_tls = std::env::var(env_vars::MAIL_USE_TLS)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        Some(Self {
            server,
            port,
            username,
            password,
            from_address,
            use_tls,
        })
    }
}

/// Notification routing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// HR personnel who receive review/approval requests.
    pub hr_emails: Vec<String>,
}

impl NotifyConfig {
    pub fn new(hr_emails: Vec<String>) -> Self {
        Self { hr_emails }
    }

    /// Load the HR address list from the environment.
    pub fn from_env() -> Self {
        let hr_emails = std::env::var(env_vars::HR_NOTIFICATION_EMAILS)
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { hr_emails }
    }
}
