// tests/single_source.rs
//
// Single-source strategy: one guarded call, fallback datasets on every
// failure mode, cap 20.

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
async fn healthy_source_is_ranked_and_capped_at_20() {
    let m = Arc::new(MockAdapter::ok("reddit", topics("reddit", 40, 50.0)));
    let agg = aggregator_with(&[m.clone()]);

    let out = agg.trending(&AggregationRequest::single("reddit")).await;
    assert_eq!(out.len(), 20);
    assert_eq!(m.fetch_calls(), 1);
    for w in out.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
}

#[tokio::test(start_paused = true)]
async fn unavailable_adapter_returns_exactly_its_fallback_without_fetching() {
    let m = Arc::new(MockAdapter::unavailable("lastfm"));
    let agg = aggregator_with(&[m.clone()]);

    let out = agg.trending(&AggregationRequest::single("lastfm")).await;
    let expected = FallbackProvider::embedded().provide("lastfm");

    assert_eq!(m.fetch_calls(), 0, "no fetch attempt for unavailable source");
    assert_eq!(out.len(), expected.len());
    for (got, want) in out.iter().zip(&expected) {
        assert_eq!(got.id, want.id);
        assert_eq!(got.title, want.title);
        assert_eq!(got.platform, "lastfm");
    }
}

#[tokio::test(start_paused = true)]
async fn source_error_degrades_to_fallback() {
    let m = Arc::new(MockAdapter::failing("currents"));
    let agg = aggregator_with(&[m.clone()]);

    let out = agg.trending(&AggregationRequest::single("currents")).await;
    assert_eq!(m.fetch_calls(), 1);
    assert!(!out.is_empty());
    assert!(out.iter().all(|t| t.platform == "currents"));
    assert!(out.iter().all(|t| t.score == 1.0), "fallback entries carry score 1");
}

#[tokio::test(start_paused = true)]
async fn timeout_degrades_to_fallback() {
    let m = Arc::new(
        MockAdapter::ok("youtube", topics("youtube", 5, 90.0))
            .with_delay(Duration::from_secs(300)),
    );
    let agg = aggregator_with(&[m.clone()]);

    let out = agg.trending(&AggregationRequest::single("youtube")).await;
    assert!(!out.is_empty());
    assert!(out.iter().all(|t| t.engagement == 0), "must be fallback, not live data");
}

#[tokio::test(start_paused = true)]
async fn empty_result_also_degrades_to_fallback() {
    let m = Arc::new(MockAdapter::ok("reddit", Vec::new()));
    let agg = aggregator_with(&[m.clone()]);

    let out = agg.trending(&AggregationRequest::single("reddit")).await;
    assert!(!out.is_empty());
    assert!(out[0].id.starts_with("reddit-fallback"));
}
