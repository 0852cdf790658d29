// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod collect;
pub mod config;
pub mod curate;
pub mod notify;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::collect::types::{Candidate, FeedSource};
pub use crate::config::AppConfig;
pub use crate::curate::{Curator, PromptTemplate, Report};
pub use crate::notify::{Notifier, NotifyOutcome};
pub use crate::pipeline::{run, RunSummary, StageOutcome};
