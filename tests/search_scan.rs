// tests/search_scan.rs
//
// Multi-source search strategy: concurrent fan-out over the fixed subset
// (reddit, hackernews, google_trends), per-branch isolation, cap 15.

use std::sync::Arc;
use std::time::Duration;

use trendscope::aggregator::Aggregator;
use trendscope::config::SourcesConfig;
use trendscope::fallback::FallbackProvider;
use trendscope::sources::SourceRegistry;
use trendscope::testing::{topics, MockAdapter};
use trendscope::topic::AggregationRequest;

fn aggregator_with(mocks: &[Arc<MockAdapter>]) -> Aggregator {
    let mut reg = SourceRegistry::new(SourcesConfig::default_seed());
    for m in mocks {
        reg.register(m.clone());
    }
    Aggregator::new(Arc::new(reg), FallbackProvider::embedded())
}

#[tokio::test(start_paused = true)]
async fn search_queries_the_fixed_subset_only() {
    let reddit = Arc::new(MockAdapter::ok("reddit", topics("reddit", 3, 60.0)));
    let hn = Arc::new(MockAdapter::ok("hackernews", topics("hackernews", 3, 50.0)));
    let google = Arc::new(MockAdapter::ok("google_trends", topics("google_trends", 3, 70.0)));
    let youtube = Arc::new(MockAdapter::ok("youtube", topics("youtube", 3, 90.0)));

    let agg = aggregator_with(&[reddit.clone(), hn.clone(), google.clone(), youtube.clone()]);
    let out = agg.trending(&AggregationRequest::search("rust")).await;

    assert_eq!(reddit.search_calls(), 1);
    assert_eq!(hn.search_calls(), 1);
    assert_eq!(google.search_calls(), 1);
    assert_eq!(youtube.search_calls(), 0, "youtube is outside the search subset");
    assert_eq!(youtube.fetch_calls(), 0);
    assert_eq!(out.len(), 9);
}

#[tokio::test(start_paused = true)]
async fn failed_branch_leaves_the_others_intact() {
    let reddit = Arc::new(MockAdapter::failing("reddit"));
    let hn = Arc::new(MockAdapter::ok("hackernews", topics("hackernews", 4, 50.0)));
    let google = Arc::new(MockAdapter::ok("google_trends", topics("google_trends", 4, 70.0)));

    let agg = aggregator_with(&[reddit, hn, google]);
    let out = agg.trending(&AggregationRequest::search("ai")).await;

    assert_eq!(out.len(), 8);
    assert_eq!(out.iter().filter(|t| t.platform == "google_trends").count(), 4);
    assert_eq!(out.iter().filter(|t| t.platform == "hackernews").count(), 4);
    // Scores pass through a failed sibling unchanged.
    assert!(out[..4].iter().all(|t| t.score == 70.0));
}

#[tokio::test(start_paused = true)]
async fn branches_run_concurrently_not_sequentially() {
    let delay = Duration::from_secs(10);
    let reddit = Arc::new(MockAdapter::ok("reddit", topics("reddit", 2, 60.0)).with_delay(delay));
    let hn =
        Arc::new(MockAdapter::ok("hackernews", topics("hackernews", 2, 50.0)).with_delay(delay));
    let google = Arc::new(
        MockAdapter::ok("google_trends", topics("google_trends", 2, 70.0)).with_delay(delay),
    );

    let agg = aggregator_with(&[reddit, hn, google]);
    let started = tokio::time::Instant::now();
    let out = agg.trending(&AggregationRequest::search("rust")).await;

    // Joined fan-out: total wait tracks the slowest branch, not the sum.
    assert!(started.elapsed() < Duration::from_secs(11));
    assert_eq!(out.len(), 6);
}

#[tokio::test(start_paused = true)]
async fn all_branches_failing_yields_empty_not_error() {
    let agg = aggregator_with(&[
        Arc::new(MockAdapter::failing("reddit")),
        Arc::new(MockAdapter::failing("hackernews")),
        Arc::new(MockAdapter::failing("google_trends")),
    ]);
    let out = agg.trending(&AggregationRequest::search("anything")).await;
    assert!(out.is_empty());
}

#[tokio::test(start_paused = true)]
async fn search_results_are_capped_at_15() {
    let agg = aggregator_with(&[
        Arc::new(MockAdapter::ok("reddit", topics("reddit", 10, 60.0))),
        Arc::new(MockAdapter::ok("hackernews", topics("hackernews", 10, 50.0))),
        Arc::new(MockAdapter::ok("google_trends", topics("google_trends", 10, 70.0))),
    ]);
    let out = agg.trending(&AggregationRequest::search("rust")).await;
    assert_eq!(out.len(), 15);
    for w in out.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
}
