// src/collect/mod.rs
pub mod arxiv;
pub mod types;

use crate::collect::types::{Candidate, FeedSource};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_feed_entries_total",
            "Total entries parsed from feed responses."
        );
        describe_counter!(
            "digest_feed_errors_total",
            "Feed queries that failed (transport, status, parse)."
        );
        describe_counter!(
            "digest_candidates_total",
            "Candidates left after deduplication by link."
        );
        describe_histogram!("digest_feed_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Collapse whitespace runs and trim. arXiv hard-wraps titles and abstracts.
///
/// Input is already XML-unescaped plain text (often with LaTeX such as `$n<k$`),
/// so nothing else is decoded or removed here.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Candidates keyed by `link`.
///
/// At most one candidate per link. A later insert with a known link replaces
/// the stored value but keeps the position where the link was first seen, so
/// output order is first-seen order.
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    index: HashMap<String, usize>,
    items: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the link was new, `false` if it replaced an earlier entry.
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        match self.index.get(&candidate.link) {
            Some(&pos) => {
                self.items[pos] = candidate;
                false
            }
            None => {
                self.index.insert(candidate.link.clone(), self.items.len());
                self.items.push(candidate);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, link: &str) -> Option<&Candidate> {
        self.index.get(link).map(|&pos| &self.items[pos])
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.items
    }
}

impl Extend<Candidate> for CandidateSet {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        for c in iter {
            self.insert(c);
        }
    }
}

/// Merged candidates plus how many queries failed.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub candidates: Vec<Candidate>,
    pub queries: usize,
    pub failed: usize,
}

impl Collection {
    /// Every query failed (and there was at least one), as opposed to a quiet day.
    pub fn all_failed(&self) -> bool {
        self.queries > 0 && self.failed == self.queries
    }
}

/// Run every query once against `feed` and merge the results.
///
/// A failing query is logged and skipped; if nothing succeeds the result is
/// simply empty.
pub async fn collect(
    feed: &dyn FeedSource,
    queries: &[String],
    results_per_query: usize,
) -> Vec<Candidate> {
    collect_counted(feed, queries, results_per_query)
        .await
        .candidates
}

/// Same as [`collect`], keeping the failed-query count.
pub async fn collect_counted(
    feed: &dyn FeedSource,
    queries: &[String],
    results_per_query: usize,
) -> Collection {
    ensure_metrics_described();

    let mut set = CandidateSet::new();
    let mut failed = 0usize;
    for q in queries {
        match feed.fetch(q, results_per_query).await {
            Ok(entries) => {
                tracing::info!(provider = feed.name(), query = %q, entries = entries.len(), "feed query done");
                set.extend(entries);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(error = ?e, provider = feed.name(), query = %q, "feed query failed");
                counter!("digest_feed_errors_total").increment(1);
            }
        }
    }

    counter!("digest_candidates_total").increment(set.len() as u64);
    tracing::info!(
        queries = queries.len(),
        failed,
        candidates = set.len(),
        "collection finished"
    );
    Collection {
        candidates: set.into_vec(),
        queries: queries.len(),
        failed,
    }
}
