// src/config/feed.rs
use serde::Deserialize;

pub const DEFAULT_ARXIV_ENDPOINT: &str = "https://export.arxiv.org/api/query";

fn default_endpoint() -> String {
    DEFAULT_ARXIV_ENDPOINT.to_string()
}
fn default_queries() -> Vec<String> {
    vec![
        r#"cat:cs.RO AND ("SLAM" OR "Spatial AI" OR "Scene Graph")"#.to_string(),
        r#"cat:cs.CV AND ("Embodied AI" OR "3D Reconstruction" OR "Multimodal")"#.to_string(),
    ]
}
fn default_results_per_query() -> usize {
    15
}
fn default_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Raw arXiv search expressions; encoded when the request URL is built.
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    #[serde(default = "default_results_per_query")]
    pub results_per_query: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            queries: default_queries(),
            results_per_query: default_results_per_query(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedConfig {
    /// Trim queries, drop blanks, clamp counts.
    pub(crate) fn sanitized(mut self) -> Self {
        self.queries = self
            .queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        self.results_per_query = self.results_per_query.max(1);
        self.timeout_secs = self.timeout_secs.max(1);
        if self.endpoint.trim().is_empty() {
            self.endpoint = default_endpoint();
        }
        self
    }
}
