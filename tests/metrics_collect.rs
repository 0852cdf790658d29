// tests/metrics_collect.rs
#![cfg(feature = "strict-metrics")]
mod common;

use common::{cand, StubFeed};
use metrics_exporter_prometheus::PrometheusBuilder;
use paper_digest::collect::arxiv::ArxivFeed;
use paper_digest::collect::collect;

#[tokio::test]
async fn metrics_exposed_after_collect() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("recorder");

    let feed = StubFeed::new()
        .ok("ok", vec![cand("a", "a")])
        .err("bad", "boom");
    let _ = collect(&feed, &["ok".to_string(), "bad".to_string()], 5).await;

    let xml = std::fs::read_to_string("tests/fixtures/arxiv_query.xml").expect("fixture");
    let arxiv = ArxivFeed::from_fixture_str(&xml);
    let _ = collect(&arxiv, &["q".to_string()], 5).await;

    let out = handle.render();
    assert!(out.contains("digest_feed_errors_total"));
    assert!(out.contains("digest_candidates_total"));
    assert!(out.contains("digest_feed_entries_total"));
    assert!(out.contains("digest_feed_parse_ms"));
}
