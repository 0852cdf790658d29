//! paper-digest — one run: fetch arXiv listings, have them curated, email the digest.
//! Meant to be triggered externally (cron, systemd timer, CI schedule).

use paper_digest::config::AppConfig;
use paper_digest::curate::prompt::load_prompt_default;
use paper_digest::pipeline::run_with_config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `DIGEST_LOG_FORMAT=json` for JSON lines.
/// Filter from `DIGEST_LOG`, e.g. `paper_digest=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DIGEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new("paper_digest=info,warn"));

    let json = std::env::var("DIGEST_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env when present; real environment wins.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load()?;
    cfg.log_summary();
    let prompt = load_prompt_default()?;

    let summary = run_with_config(&cfg, prompt).await?;
    summary.log();
    Ok(())
}
