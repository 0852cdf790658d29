// src/config/ai.rs
use serde::Deserialize;

use super::Secret;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_input() -> usize {
    10
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurateConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// How many candidates (in collection order) are sent to the model.
    #[serde(default = "default_max_input")]
    pub max_input: usize,
    /// Sampling temperature; omitted from the request when `None`.
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// "ENV" (or absent) means: read from OPENAI_API_KEY.
    /// Cleared once resolved so the file value never travels further.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_input: default_max_input(),
            temperature: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl CurateConfig {
    pub(crate) fn sanitized(mut self) -> Self {
        self.max_input = self.max_input.max(1);
        self.timeout_secs = self.timeout_secs.max(1);
        if let Some(t) = self.temperature {
            self.temperature = Some(t.clamp(0.0, 2.0));
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        self
    }

    pub(crate) fn resolve_api_key<F>(&self, lookup: &F) -> Option<Secret>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() && !k.eq_ignore_ascii_case("env") => Some(Secret::new(k)),
            _ => lookup(ENV_OPENAI_API_KEY).map(Secret::new),
        }
    }
}
