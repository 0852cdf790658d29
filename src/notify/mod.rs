// src/notify/mod.rs
pub mod email;

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::config::AppConfig;
use crate::curate::Report;

pub use email::SmtpMailer;

/// Replaced by the run date (YYYY-MM-DD) in the subject line.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Fully addressed plain-text message, transport-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from_addr: String,
    pub to_addr: String,
    pub subject: String,
    pub body: String,
}

/// Fixed addressing for every digest of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from_name: String,
    pub from_addr: String,
    pub to_addr: String,
    /// May contain `{date}`.
    pub subject: String,
}

#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn submit(&self, mail: &OutgoingMail) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Dry-run transport: logs the message instead of sending it.
pub struct LogMailer;

#[async_trait::async_trait]
impl MailTransport for LogMailer {
    async fn submit(&self, mail: &OutgoingMail) -> Result<()> {
        tracing::info!(
            from = %mail.from_addr,
            to = %mail.to_addr,
            subject = %mail.subject,
            body_len = mail.body.len(),
            "dry run: digest not sent"
        );
        tracing::debug!(body = %mail.body, "dry run body");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    /// Nothing to send; not a failure.
    Skipped,
    Failed(String),
}

enum Delivery {
    Ready {
        transport: Arc<dyn MailTransport>,
        envelope: Envelope,
    },
    Unavailable(String),
}

pub struct Notifier {
    delivery: Delivery,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, envelope: Envelope) -> Self {
        Self {
            delivery: Delivery::Ready {
                transport,
                envelope,
            },
        }
    }

    /// A notifier that can never deliver; every report yields `Failed(reason)`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            delivery: Delivery::Unavailable(reason.into()),
        }
    }

    /// SMTP (or log-only when `dry_run`) delivery, or unavailable when the
    /// mail credentials are missing or the relay cannot be configured.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let creds = match &cfg.mail_credentials {
            Ok(c) => c,
            Err(missing) => {
                tracing::warn!(%missing, "email disabled");
                return Self::unavailable(missing.to_string());
            }
        };
        let envelope = Envelope {
            from_name: cfg.mail.from_name.clone(),
            from_addr: creds.sender.clone(),
            to_addr: creds.recipient.clone(),
            subject: cfg.mail.subject.clone(),
        };
        if cfg.mail.dry_run {
            return Self::new(Arc::new(LogMailer), envelope);
        }
        match SmtpMailer::new(&cfg.mail, creds) {
            Ok(m) => Self::new(Arc::new(m), envelope),
            Err(e) => {
                tracing::warn!(error = ?e, "email disabled");
                Self::unavailable(format!("{e:#}"))
            }
        }
    }

    pub async fn notify(&self, report: Option<&Report>) -> NotifyOutcome {
        self.notify_on(report, Utc::now().date_naive()).await
    }

    /// Same as [`Notifier::notify`] with an explicit date for the subject.
    pub async fn notify_on(&self, report: Option<&Report>, date: NaiveDate) -> NotifyOutcome {
        let Some(report) = report else {
            tracing::info!("nothing to send");
            return NotifyOutcome::Skipped;
        };

        let (transport, envelope) = match &self.delivery {
            Delivery::Ready {
                transport,
                envelope,
            } => (transport, envelope),
            Delivery::Unavailable(reason) => {
                tracing::warn!(%reason, "digest not sent");
                return NotifyOutcome::Failed(reason.clone());
            }
        };

        let mail = OutgoingMail {
            from_name: envelope.from_name.clone(),
            from_addr: envelope.from_addr.clone(),
            to_addr: envelope.to_addr.clone(),
            subject: render_subject(&envelope.subject, date),
            body: report.as_str().to_string(),
        };

        match transport.submit(&mail).await {
            Ok(()) => {
                tracing::info!(transport = transport.name(), to = %mail.to_addr, "digest sent");
                NotifyOutcome::Sent
            }
            Err(e) => {
                tracing::error!(error = ?e, transport = transport.name(), "sending digest failed");
                NotifyOutcome::Failed(format!("{e:#}"))
            }
        }
    }
}

pub fn render_subject(template: &str, date: NaiveDate) -> String {
    template.replace(DATE_PLACEHOLDER, &date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_date_placeholder() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(render_subject("arXiv digest {date}", d), "arXiv digest 2025-03-04");
        assert_eq!(render_subject("fixed", d), "fixed");
    }

    #[tokio::test]
    async fn unavailable_fails_only_when_there_is_a_report() {
        let n = Notifier::unavailable("missing environment variable(s): DIGEST_SMTP_PASSWORD");
        assert_eq!(n.notify(None).await, NotifyOutcome::Skipped);
        let r = Report::new("hello");
        match n.notify(Some(&r)).await {
            NotifyOutcome::Failed(reason) => assert!(reason.contains("DIGEST_SMTP_PASSWORD")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        let n = Notifier::new(
            Arc::new(LogMailer),
            Envelope {
                from_name: "Paper Digest".into(),
                from_addr: "me@example.test".into(),
                to_addr: "you@example.test".into(),
                subject: "s".into(),
            },
        );
        assert_eq!(n.notify(Some(&Report::new("x"))).await, NotifyOutcome::Sent);
    }
}
