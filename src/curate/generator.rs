//! Text generation: provider abstraction + OpenAI chat completions client.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Secret;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One generation call. Serializes as an OpenAI chat completions body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// "Send messages, get text back."
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynGenerator = Arc<dyn TextGenerator>;

/// Factory: OpenAI when a key is present, otherwise a generator that refuses
/// every call without touching the network.
pub fn build_generator(
    base_url: &str,
    api_key: Option<&Secret>,
    timeout_secs: u64,
) -> Result<DynGenerator> {
    match api_key {
        Some(key) => Ok(Arc::new(OpenAiGenerator::new(
            base_url,
            key.clone(),
            timeout_secs,
        )?)),
        None => Ok(Arc::new(DisabledGenerator {
            reason: format!("{} is not set", crate::config::ai::ENV_OPENAI_API_KEY),
        })),
    }
}

// ------------------------------------------------------------
// Concrete providers
// ------------------------------------------------------------

/// OpenAI provider (Chat Completions API).
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: Secret,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(base_url: &str, api_key: Secret, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("paper-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building openai http client")?;
        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    async fn generate_impl(&self, request: &ChatRequest) -> Result<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        let body = resp.text().await.context("openai response body")?;
        if !status.is_success() {
            bail!("openai returned {status}: {}", api_error_message(&body));
        }
        parse_chat_response(&body)
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.generate_impl(request))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Fails every call; used when no API key is configured.
pub struct DisabledGenerator {
    reason: String,
}

impl TextGenerator for DisabledGenerator {
    fn generate<'a>(
        &'a self,
        _request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move { Err(anyhow!("text generation disabled: {}", self.reason)) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

// ------------------------------------------------------------
// Wire helpers
// ------------------------------------------------------------

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}
#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

/// Extract `choices[0].message.content`. Empty text counts as a failure.
pub fn parse_chat_response(body: &str) -> Result<String> {
    let resp: Resp = serde_json::from_str(body).context("decoding chat completion")?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if content.is_empty() {
        bail!("chat completion had no content");
    }
    Ok(content)
}

/// Best-effort `error.message` from an error body, else a short prefix of it.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrBody {
        error: ErrDetail,
    }
    #[derive(Deserialize)]
    struct ErrDetail {
        message: String,
    }
    match serde_json::from_str::<ErrBody>(body) {
        Ok(e) => e.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}
