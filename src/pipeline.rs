// src/pipeline.rs
//! collect -> curate -> notify, once. No error crosses a stage boundary:
//! each stage reports an outcome and the run always finishes.

use anyhow::Result;

use crate::collect::arxiv::ArxivFeed;
use crate::collect::collect_counted;
use crate::collect::types::FeedSource;
use crate::config::{AppConfig, FeedConfig};
use crate::curate::generator::build_generator;
use crate::curate::{Curator, PromptTemplate};
use crate::notify::{Notifier, NotifyOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Collection produced `n` candidates.
    Ok(usize),
    /// Curation produced its report.
    Done,
    /// Nothing to work on / nothing produced.
    Empty,
    /// Curation error, or every feed query failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub collect: StageOutcome,
    pub curate: StageOutcome,
    pub notify: NotifyOutcome,
}

impl RunSummary {
    pub fn log(&self) {
        tracing::info!(
            collect = ?self.collect,
            curate = ?self.curate,
            notify = ?self.notify,
            "run finished"
        );
    }

    /// True when every stage either did its job or had nothing to do.
    pub fn is_clean(&self) -> bool {
        !matches!(self.collect, StageOutcome::Failed(_))
            && !matches!(self.curate, StageOutcome::Failed(_))
            && !matches!(self.notify, NotifyOutcome::Failed(_))
    }
}

pub async fn run(
    feed: &dyn FeedSource,
    feed_cfg: &FeedConfig,
    curator: &Curator,
    notifier: &Notifier,
) -> RunSummary {
    tracing::info!(queries = feed_cfg.queries.len(), "collecting");
    let collection =
        collect_counted(feed, &feed_cfg.queries, feed_cfg.results_per_query).await;
    let collect_outcome = if collection.all_failed() {
        StageOutcome::Failed(format!("all {} feed queries failed", collection.queries))
    } else if collection.candidates.is_empty() {
        StageOutcome::Empty
    } else {
        StageOutcome::Ok(collection.candidates.len())
    };
    let candidates = collection.candidates;

    tracing::info!(candidates = candidates.len(), "curating");
    let (report, curate_outcome) = match curator.try_curate(&candidates).await {
        Ok(Some(r)) => (Some(r), StageOutcome::Done),
        Ok(None) => (None, StageOutcome::Empty),
        Err(e) => {
            tracing::error!(error = ?e, provider = curator.provider_name(), "curation failed");
            (None, StageOutcome::Failed(format!("{e:#}")))
        }
    };

    tracing::info!(has_report = report.is_some(), "notifying");
    let notify_outcome = notifier.notify(report.as_ref()).await;

    RunSummary {
        collect: collect_outcome,
        curate: curate_outcome,
        notify: notify_outcome,
    }
}

/// Build the production components from `cfg` and run once.
/// Errors only if a component cannot be constructed at all.
pub async fn run_with_config(cfg: &AppConfig, prompt: PromptTemplate) -> Result<RunSummary> {
    let feed = ArxivFeed::from_config(&cfg.feed)?;
    if cfg.api_key.is_none() {
        tracing::warn!(
            "{} missing; curation will not run",
            crate::config::ai::ENV_OPENAI_API_KEY
        );
    }
    let generator = build_generator(
        &cfg.curate.base_url,
        cfg.api_key.as_ref(),
        cfg.curate.timeout_secs,
    )?;
    let curator = Curator::new(generator, prompt, &cfg.curate);
    let notifier = Notifier::from_config(cfg);

    Ok(run(&feed, &cfg.feed, &curator, &notifier).await)
}
