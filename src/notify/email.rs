use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{Address, AsyncTransport, Tokio1Executor};

use super::{MailTransport, OutgoingMail};
use crate::config::{MailConfig, MailCredentials};

/// SMTP submission over implicit TLS.
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig, creds: &MailCredentials) -> Result<Self> {
        let creds = Credentials::new(creds.sender.clone(), creds.password.expose().to_string());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .with_context(|| format!("invalid smtp host {:?}", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        Ok(Self { mailer })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn submit(&self, mail: &OutgoingMail) -> Result<()> {
        let msg = build_message(mail)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Plain-text message with `From: "<name>" <addr>`.
pub fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from_addr: Address = mail
        .from_addr
        .parse()
        .with_context(|| format!("invalid sender address {:?}", mail.from_addr))?;
    let to: Mailbox = mail
        .to_addr
        .parse()
        .with_context(|| format!("invalid recipient address {:?}", mail.to_addr))?;
    let name = Some(mail.from_name.clone()).filter(|n| !n.trim().is_empty());

    Message::builder()
        .from(Mailbox::new(name, from_addr))
        .to(to)
        .subject(mail.subject.clone())
        .header(header::ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .context("build email")
}
