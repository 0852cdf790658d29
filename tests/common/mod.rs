// tests/common/mod.rs
// Recording stubs for the three external collaborators.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use paper_digest::curate::{ChatRequest, TextGenerator};
use paper_digest::notify::{Envelope, MailTransport, Notifier, OutgoingMail};
use paper_digest::{Candidate, FeedSource};
use parking_lot::Mutex;

pub fn cand(link: &str, title: &str) -> Candidate {
    Candidate {
        title: title.to_string(),
        summary: format!("summary of {title}"),
        link: link.to_string(),
        published: "2025-06-11T17:59:58Z".to_string(),
    }
}

/// Answers per query from a fixed table; unknown queries fail.
#[derive(Default)]
pub struct StubFeed {
    answers: HashMap<String, Result<Vec<Candidate>, String>>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl StubFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, query: &str, entries: Vec<Candidate>) -> Self {
        self.answers.insert(query.to_string(), Ok(entries));
        self
    }

    pub fn err(mut self, query: &str, reason: &str) -> Self {
        self.answers
            .insert(query.to_string(), Err(reason.to_string()));
        self
    }
}

#[async_trait]
impl FeedSource for StubFeed {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        self.calls.lock().push((query.to_string(), max_results));
        match self.answers.get(query) {
            Some(Ok(v)) => Ok(v.iter().take(max_results).cloned().collect()),
            Some(Err(reason)) => Err(anyhow!("{reason}")),
            None => Err(anyhow!("no stub answer for {query:?}")),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Replies with queued answers in order and records every request.
pub struct RecordingGenerator {
    replies: Mutex<Vec<Result<String, String>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingGenerator {
    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn with(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl TextGenerator for RecordingGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        self.requests.lock().push(request.clone());
        let next = {
            let mut q = self.replies.lock();
            if q.is_empty() {
                Err("no reply queued".to_string())
            } else {
                q.remove(0)
            }
        };
        Box::pin(async move { next.map_err(|e| anyhow!("{e}")) })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub fail_with: Option<String>,
    pub sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(reason.to_string()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn submit(&self, mail: &OutgoingMail) -> Result<()> {
        self.sent.lock().push(mail.clone());
        match &self.fail_with {
            Some(reason) => Err(anyhow!("{reason}")),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn envelope() -> Envelope {
    Envelope {
        from_name: "Paper Digest".to_string(),
        from_addr: "me@example.test".to_string(),
        to_addr: "you@example.test".to_string(),
        subject: "Daily arXiv digest".to_string(),
    }
}

pub fn notifier_with(transport: Arc<RecordingTransport>) -> Notifier {
    Notifier::new(transport, envelope())
}
