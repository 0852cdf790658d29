// src/config/mail.rs
use serde::Deserialize;

use super::{MissingVars, Secret};

pub const ENV_SENDER_EMAIL: &str = "DIGEST_SENDER_EMAIL";
pub const ENV_SMTP_PASSWORD: &str = "DIGEST_SMTP_PASSWORD";
pub const ENV_RECIPIENT_EMAIL: &str = "DIGEST_RECIPIENT_EMAIL";

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}
fn default_from_name() -> String {
    "Paper Digest".to_string()
}
fn default_subject() -> String {
    "Daily arXiv digest".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// Implicit-TLS submission port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Display name on the `From` header.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log the message instead of submitting it.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from_name: default_from_name(),
            subject: default_subject(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }
}

/// Sender/recipient identity plus the sender's SMTP secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub sender: String,
    pub password: Secret,
    pub recipient: String,
}

impl MailCredentials {
    /// All three variables are required; reports every missing one at once.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, MissingVars>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sender = lookup(ENV_SENDER_EMAIL);
        let password = lookup(ENV_SMTP_PASSWORD);
        let recipient = lookup(ENV_RECIPIENT_EMAIL);

        match (sender, password, recipient) {
            (Some(sender), Some(password), Some(recipient)) => Ok(Self {
                sender: sender.trim().to_string(),
                password: Secret::new(password),
                recipient: recipient.trim().to_string(),
            }),
            (s, p, r) => {
                let mut missing = Vec::new();
                if s.is_none() {
                    missing.push(ENV_SENDER_EMAIL);
                }
                if p.is_none() {
                    missing.push(ENV_SMTP_PASSWORD);
                }
                if r.is_none() {
                    missing.push(ENV_RECIPIENT_EMAIL);
                }
                Err(MissingVars(missing))
            }
        }
    }
}
