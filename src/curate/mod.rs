// src/curate/mod.rs
//! Curation: hand the candidate list to a text generator under a persona prompt
//! and keep whatever text comes back. Ranking and selection happen remotely;
//! nothing here parses or validates the model output.

pub mod generator;
pub mod prompt;

use std::fmt;

use anyhow::{Context, Result};

use crate::collect::types::Candidate;
use crate::config::CurateConfig;

pub use generator::{ChatMessage, ChatRequest, DynGenerator, Role, TextGenerator};
pub use prompt::PromptTemplate;

/// Final digest text. Opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record per candidate, `Field: value` per line, blank line between records.
pub fn render_candidate_block(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| {
            format!(
                "Title: {}\nSummary: {}\nLink: {}\nPublished: {}",
                c.title, c.summary, c.link, c.published
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct Curator {
    generator: DynGenerator,
    prompt: PromptTemplate,
    model: String,
    temperature: Option<f32>,
    max_input: usize,
}

impl Curator {
    pub fn new(generator: DynGenerator, prompt: PromptTemplate, cfg: &CurateConfig) -> Self {
        Self {
            generator,
            prompt,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_input: cfg.max_input.max(1),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.generator.provider_name()
    }

    /// Report for `candidates`, or `None` when there is nothing to curate or
    /// the generator failed (the failure is logged here).
    pub async fn curate(&self, candidates: &[Candidate]) -> Option<Report> {
        match self.try_curate(candidates).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = ?e, provider = self.provider_name(), "curation failed");
                None
            }
        }
    }

    /// Like [`Curator::curate`] but keeps "nothing to do" (`Ok(None)`) apart
    /// from "failed" (`Err`).
    pub async fn try_curate(&self, candidates: &[Candidate]) -> Result<Option<Report>> {
        if candidates.is_empty() {
            tracing::info!("no candidates, skipping curation");
            return Ok(None);
        }

        let selected = &candidates[..candidates.len().min(self.max_input)];
        let block = render_candidate_block(selected);
        tracing::info!(
            candidates = candidates.len(),
            sent = selected.len(),
            model = %self.model,
            "requesting digest"
        );

        let first = self
            .generator
            .generate(&self.request(vec![
                ChatMessage::system(&self.prompt.system),
                ChatMessage::user(self.prompt.render_user(&block)),
            ]))
            .await
            .context("digest request")?;

        let Some(follow_up) = self.prompt.follow_up() else {
            return Ok(Some(Report::new(first)));
        };

        let insight = self
            .generator
            .generate(&self.request(vec![
                ChatMessage::system(&self.prompt.system),
                ChatMessage::assistant(first.as_str()),
                ChatMessage::user(follow_up),
            ]))
            .await
            .context("insight follow-up request")?;

        Ok(Some(Report::new(format!(
            "{first}\n\n{}\n\n{insight}",
            self.prompt.separator
        ))))
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
        }
    }
}
