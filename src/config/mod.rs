// src/config/mod.rs
//! Run configuration: one value object built at process start and passed down.
//!
//! Non-secret settings come from a TOML file (all keys optional), secrets come
//! from the environment. Components never read the environment themselves.

pub mod ai;
pub mod feed;
pub mod mail;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use ai::CurateConfig;
pub use feed::FeedConfig;
pub use mail::{MailConfig, MailCredentials};

pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";
pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const ENV_DRY_RUN: &str = "DIGEST_DRY_RUN";

/// Opaque credential. `Debug`/`Display` never show the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(len={})", self.0.len())
    }
}

/// Shape of `config/digest.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub feed: FeedConfig,
    pub curate: CurateConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub curate: CurateConfig,
    pub mail: MailConfig,
    /// `None` when `OPENAI_API_KEY` is unset; curation then refuses to run.
    pub api_key: Option<Secret>,
    /// `Err` carries the names of the missing variables; notification then refuses to run.
    pub mail_credentials: Result<MailCredentials, MissingVars>,
}

/// Environment variables that were required but absent (or blank).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVars(pub Vec<&'static str>);

impl fmt::Display for MissingVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing environment variable(s): {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingVars {}

impl AppConfig {
    /// Load using `$DIGEST_CONFIG_PATH`, then `config/digest.toml`, then built-in defaults;
    /// secrets from the process environment.
    pub fn load() -> Result<Self> {
        let file = load_file_config_default()?;
        Ok(Self::from_parts(file, |k| std::env::var(k).ok()))
    }

    /// Assemble from an already-parsed file config and an environment lookup.
    pub fn from_parts<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let mut curate = file.curate.sanitized();
        let api_key = curate.resolve_api_key(&lookup);
        curate.api_key = None;

        let mut mail = file.mail;
        if lookup(ENV_DRY_RUN).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            mail.dry_run = true;
        }
        let mail_credentials = MailCredentials::from_lookup(&lookup);

        Self {
            feed: file.feed.sanitized(),
            curate,
            mail,
            api_key,
            mail_credentials,
        }
    }

    /// Safe diagnostics: presence and lengths only.
    pub fn log_summary(&self) {
        tracing::info!(
            queries = self.feed.queries.len(),
            results_per_query = self.feed.results_per_query,
            model = %self.curate.model,
            max_input = self.curate.max_input,
            key_len = self.api_key.as_ref().map(Secret::len).unwrap_or(0),
            mail_ready = self.mail_credentials.is_ok(),
            dry_run = self.mail.dry_run,
            "config loaded"
        );
    }
}

/// Parse a config file from an explicit path.
pub fn load_file_config_from(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    parse_file_config(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Env path first (must exist), then `config/digest.toml`, then defaults.
pub fn load_file_config_default() -> Result<FileConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_file_config_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_file_config_from(&default);
    }
    Ok(FileConfig::default())
}

pub fn parse_file_config(s: &str) -> Result<FileConfig> {
    Ok(toml::from_str(s)?)
}
