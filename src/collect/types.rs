// src/collect/types.rs
use anyhow::Result;

/// One feed entry. `published` is kept exactly as the feed supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub summary: String,
    pub link: String, // dedup key
    pub published: String,
}

/// A paper-listing feed that answers one search query per call.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<Candidate>>;
    fn name(&self) -> &'static str;
}
