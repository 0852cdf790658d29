// tests/collect_dedup.rs
mod common;

use common::{cand, StubFeed};
use paper_digest::collect::{collect, collect_counted};
use std::collections::HashSet;

fn queries(qs: &[&str]) -> Vec<String> {
    qs.iter().map(|q| q.to_string()).collect()
}

#[tokio::test]
async fn shared_link_across_queries_is_kept_once() {
    let feed = StubFeed::new()
        .ok(
            "q1",
            vec![cand("l1", "one"), cand("l2", "two"), cand("shared", "shared from q1")],
        )
        .ok(
            "q2",
            vec![cand("shared", "shared from q2"), cand("l4", "four"), cand("l5", "five")],
        );

    let out = collect(&feed, &queries(&["q1", "q2"]), 15).await;

    assert_eq!(out.len(), 5);
    let links: HashSet<_> = out.iter().map(|c| c.link.as_str()).collect();
    assert_eq!(links.len(), out.len(), "links must be unique");

    // later query wins for the shared link
    let shared = out.iter().find(|c| c.link == "shared").unwrap();
    assert_eq!(shared.title, "shared from q2");
}

#[tokio::test]
async fn every_query_is_fetched_once_with_the_limit() {
    let feed = StubFeed::new().ok("a", vec![]).ok("b", vec![]);
    let _ = collect(&feed, &queries(&["a", "b"]), 7).await;

    let calls = feed.calls.lock().clone();
    assert_eq!(calls, vec![("a".to_string(), 7), ("b".to_string(), 7)]);
}

#[tokio::test]
async fn all_empty_queries_yield_empty_result() {
    let feed = StubFeed::new().ok("a", vec![]).ok("b", vec![]);
    let out = collect(&feed, &queries(&["a", "b"]), 15).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn failing_query_does_not_abort_the_rest() {
    let feed = StubFeed::new()
        .err("broken", "connection reset")
        .ok("fine", vec![cand("x", "x"), cand("y", "y")]);

    let out = collect(&feed, &queries(&["broken", "fine"]), 15).await;
    assert_eq!(out.len(), 2);
    assert_eq!(feed.calls.lock().len(), 2);
}

#[tokio::test]
async fn all_failing_queries_yield_empty_result() {
    let feed = StubFeed::new().err("a", "timeout").err("b", "502");
    let out = collect(&feed, &queries(&["a", "b"]), 15).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn duplicates_within_one_query_are_collapsed() {
    let feed = StubFeed::new().ok(
        "q",
        vec![cand("a", "a1"), cand("b", "b"), cand("a", "a2"), cand("a", "a3")],
    );
    let out = collect(&feed, &queries(&["q"]), 15).await;
    let links: Vec<_> = out.iter().map(|c| c.link.as_str()).collect();
    assert_eq!(links, vec!["a", "b"]);
    assert_eq!(out[0].title, "a3");
}

#[tokio::test]
async fn failed_queries_are_counted() {
    let feed = StubFeed::new().err("a", "timeout").ok("b", vec![cand("x", "x")]);
    let c = collect_counted(&feed, &queries(&["a", "b"]), 15).await;
    assert_eq!(c.queries, 2);
    assert_eq!(c.failed, 1);
    assert!(!c.all_failed());
    assert_eq!(c.candidates.len(), 1);

    let down = StubFeed::new().err("a", "timeout");
    assert!(collect_counted(&down, &queries(&["a"]), 15).await.all_failed());

    let none = StubFeed::new();
    assert!(!collect_counted(&none, &[], 15).await.all_failed());
}
