// src/collect/arxiv.rs
//! arXiv Atom API provider.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::collect::normalize_text;
use crate::collect::types::{Candidate, FeedSource};
use crate::config::FeedConfig;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn href_of(l: &Link) -> Option<&str> {
    l.href.as_deref().map(str::trim).filter(|h| !h.is_empty())
}

impl Entry {
    /// Prefer the `alternate` (abstract page) link, then any link, then the entry id.
    fn primary_link(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .and_then(href_of)
            .or_else(|| self.links.iter().find_map(href_of))
            .or_else(|| self.id.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .map(str::to_string)
    }

    fn is_api_error(&self) -> bool {
        self.id.as_deref().is_some_and(|id| id.contains("/api/errors"))
    }
}

/// Build the search URL. The query is form-encoded, so quotes, spaces,
/// parentheses and colons never reach the wire raw.
pub fn build_query_url(endpoint: &Url, query: &str, max_results: usize) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("search_query", query)
        .append_pair("start", "0")
        .append_pair("max_results", &max_results.to_string())
        .append_pair("sortBy", "submittedDate")
        .append_pair("sortOrder", "descending");
    url
}

/// Parse an Atom response body into candidates.
pub fn parse_feed(body: &str) -> Result<Vec<Candidate>> {
    let t0 = std::time::Instant::now();
    let feed: Feed = from_str(body).context("parsing arxiv atom xml")?;

    if let Some(err) = feed.entries.iter().find(|e| e.is_api_error()) {
        bail!(
            "arxiv api error: {}",
            normalize_text(err.summary.as_deref().unwrap_or("unknown"))
        );
    }

    let mut out = Vec::with_capacity(feed.entries.len());
    for entry in &feed.entries {
        let Some(link) = entry.primary_link() else {
            tracing::debug!(title = ?entry.title, "skipping entry without link");
            continue;
        };
        out.push(Candidate {
            title: normalize_text(entry.title.as_deref().unwrap_or_default()),
            summary: normalize_text(entry.summary.as_deref().unwrap_or_default()),
            link,
            published: entry
                .published
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("digest_feed_parse_ms").record(ms);
    counter!("digest_feed_entries_total").increment(out.len() as u64);
    Ok(out)
}

pub struct ArxivFeed {
    mode: Mode,
}

enum Mode {
    /// Same document for every query; for tests and offline runs.
    Fixture(String),
    Http { endpoint: Url, client: reqwest::Client },
}

impl ArxivFeed {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Result<Self> {
        let endpoint = Url::parse(cfg.endpoint.trim())
            .with_context(|| format!("invalid feed endpoint {:?}", cfg.endpoint))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("paper-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building feed http client")?;
        Ok(Self {
            mode: Mode::Http { endpoint, client },
        })
    }
}

#[async_trait]
impl FeedSource for ArxivFeed {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>> {
        match &self.mode {
            Mode::Fixture(s) => {
                let mut v = parse_feed(s)?;
                v.truncate(max_results);
                Ok(v)
            }
            Mode::Http { endpoint, client } => {
                let url = build_query_url(endpoint, query, max_results);
                tracing::debug!(%url, "arxiv request");
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("arxiv http get()")?
                    .error_for_status()
                    .context("arxiv non-2xx")?
                    .text()
                    .await
                    .context("arxiv http .text()")?;
                parse_feed(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "arxiv"
    }
}
