//! # Aggregation Coordinator
//!
//! Drives one of three strategies per request:
//!
//! - **broad scan** (no platform filter): bounded-sequential walk over the
//!   priority sources with an early exit once enough diverse signal exists;
//! - **single source** (platform filter): one guarded call, fallback data on
//!   failure;
//! - **multi-source search** (search term): concurrent fan-out over a small
//!   fixed subset, joined when all branches settle.
//!
//! No per-source failure ever propagates to the caller: worst case is an
//! empty list. The accumulator is owned by the coordinator for the duration
//! of one request; nothing is shared across requests.

pub mod deadline;

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::config::EngineConfig;
use crate::fallback::FallbackProvider;
use crate::ranker;
use crate::sources::{SourceAdapter, SourceRegistry};
use crate::topic::{AggregationRequest, Topic};

/// The three sources queried by the search strategy. Small and fixed: true
/// fan-out is acceptable here because latency matters more than burst-load
/// avoidance, and all three work without credentials.
const SEARCH_SOURCES: [&str; 3] = ["reddit", "hackernews", "google_trends"];

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "aggregate_requests_total",
            "Aggregation requests, labeled by strategy."
        );
        describe_counter!(
            "aggregate_source_success_total",
            "Source calls that contributed at least one topic."
        );
        describe_counter!(
            "aggregate_source_failures_total",
            "Source calls lost to timeout, error, or missing credentials."
        );
        describe_counter!(
            "aggregate_early_exit_total",
            "Broad scans stopped early by the success/quantity threshold."
        );
        describe_histogram!("aggregate_fetch_ms", "Guarded source call duration.");
    });
}

pub struct Aggregator {
    registry: Arc<SourceRegistry>,
    fallback: FallbackProvider,
}

impl Aggregator {
    pub fn new(registry: Arc<SourceRegistry>, fallback: FallbackProvider) -> Self {
        ensure_metrics_described();
        Self { registry, fallback }
    }

    fn engine(&self) -> &EngineConfig {
        &self.registry.config().engine
    }

    /// The aggregation entry point. Never errors; worst case an empty list.
    pub async fn trending(&self, req: &AggregationRequest) -> Vec<Topic> {
        if let Some(term) = req.search.as_deref() {
            counter!("aggregate_requests_total", "strategy" => "search").increment(1);
            return self.search_scan(term).await;
        }
        match req.platform.as_deref() {
            None | Some("all") => {
                counter!("aggregate_requests_total", "strategy" => "broad").increment(1);
                self.broad_scan().await
            }
            Some(platform) => {
                counter!("aggregate_requests_total", "strategy" => "single").increment(1);
                self.single_source(platform).await
            }
        }
    }

    /// Broad scan: priority order, one source in flight at a time. Bounding
    /// concurrency is deliberate; it keeps outbound pressure off downstream
    /// rate limits.
    async fn broad_scan(&self) -> Vec<Topic> {
        let engine = self.engine().clone();
        let order = self.registry.scan_order();
        let scan = &order[..order.len().min(engine.max_priority_sources)];

        let mut accumulated: Vec<Topic> = Vec::new();
        let mut successful_sources = 0usize;

        for (i, (descriptor, adapter)) in scan.iter().enumerate() {
            match self.guarded_fetch(adapter.clone()).await {
                Some(topics) if !topics.is_empty() => {
                    let kept = topics.len().min(descriptor.per_source_cap);
                    accumulated.extend(topics.into_iter().take(kept));
                    successful_sources += 1;
                    tracing::info!(
                        source = adapter.name(),
                        kept,
                        total = accumulated.len(),
                        "source contributed"
                    );
                }
                Some(_) => {
                    tracing::info!(source = adapter.name(), "source returned no items");
                }
                // Failure already logged and counted; the scan continues.
                None => {}
            }

            // Early exit: enough diverse signal trades completeness for
            // latency. Checked only after the source's outcome is known.
            if successful_sources >= engine.early_exit_min_sources
                && accumulated.len() >= engine.early_exit_min_items
            {
                counter!("aggregate_early_exit_total").increment(1);
                tracing::info!(
                    successful_sources,
                    items = accumulated.len(),
                    "early exit, skipping remaining sources"
                );
                break;
            }

            if i + 1 < scan.len() {
                tokio::time::sleep(engine.inter_source_pause()).await;
            }
        }

        ranker::rank(accumulated, engine.broad_cap)
    }

    /// Single source: nothing to exit early from. Failure, timeout, or an
    /// empty result all degrade to the source's fallback dataset; a caller
    /// asking for one platform gets an informational entry over an empty
    /// page.
    async fn single_source(&self, platform: &str) -> Vec<Topic> {
        let cap = self.engine().single_cap;
        let Some(adapter) = self.registry.adapter(platform) else {
            tracing::warn!(platform, "unknown platform requested");
            return Vec::new();
        };

        if !adapter.is_available() {
            counter!("aggregate_source_failures_total", "reason" => "unavailable").increment(1);
            tracing::warn!(source = adapter.name(), "not configured, serving fallback");
            return ranker::rank(self.fallback.provide(platform), cap);
        }

        match self.guarded_fetch(adapter).await {
            Some(topics) if !topics.is_empty() => ranker::rank(topics, cap),
            _ => ranker::rank(self.fallback.provide(platform), cap),
        }
    }

    /// Multi-source search: all branches in flight simultaneously, each
    /// isolated. A failed branch contributes zero items without affecting
    /// the others.
    async fn search_scan(&self, term: &str) -> Vec<Topic> {
        let [a, b, c] = SEARCH_SOURCES;
        let (ra, rb, rc) = tokio::join!(
            self.search_branch(a, term),
            self.search_branch(b, term),
            self.search_branch(c, term),
        );

        let mut merged = ra;
        merged.extend(rb);
        merged.extend(rc);
        ranker::rank(merged, self.engine().search_cap)
    }

    async fn search_branch(&self, name: &str, term: &str) -> Vec<Topic> {
        let Some(adapter) = self.registry.adapter(name) else {
            return Vec::new();
        };
        if !adapter.is_available() {
            return Vec::new();
        }

        let budget = self
            .registry
            .descriptor(name)
            .map(|d| d.timeout())
            .unwrap_or_else(|| std::time::Duration::from_secs(40));

        let started = Instant::now();
        let result = deadline::guard(adapter.name(), budget, adapter.search(term)).await;
        histogram!("aggregate_fetch_ms").record(started.elapsed().as_secs_f64() * 1_000.0);

        match result {
            Ok(topics) => {
                counter!("aggregate_source_success_total").increment(1);
                sanitize(topics)
            }
            Err(failure) => {
                counter!("aggregate_source_failures_total", "reason" => failure.kind())
                    .increment(1);
                tracing::warn!(source = failure.source(), error = %failure, "search branch lost");
                Vec::new()
            }
        }
    }

    /// One guarded fetch: availability check, deadline race, sanitization.
    /// Returns `None` on any failure; the failure is logged and counted here
    /// so callers only decide what the loss means for their strategy.
    async fn guarded_fetch(&self, adapter: Arc<dyn SourceAdapter>) -> Option<Vec<Topic>> {
        if !adapter.is_available() {
            counter!("aggregate_source_failures_total", "reason" => "unavailable").increment(1);
            tracing::warn!(source = adapter.name(), "skipped, not configured");
            return None;
        }

        let budget = self
            .registry
            .descriptor(adapter.name())
            .map(|d| d.timeout())
            .unwrap_or_else(|| std::time::Duration::from_secs(40));

        let started = Instant::now();
        let result = deadline::guard(adapter.name(), budget, adapter.fetch()).await;
        histogram!("aggregate_fetch_ms").record(started.elapsed().as_secs_f64() * 1_000.0);

        match result {
            Ok(topics) => {
                counter!("aggregate_source_success_total").increment(1);
                Some(sanitize(topics))
            }
            Err(failure) => {
                counter!("aggregate_source_failures_total", "reason" => failure.kind())
                    .increment(1);
                tracing::warn!(source = failure.source(), error = %failure, "source lost");
                None
            }
        }
    }
}

/// Enforce the output invariant before anything reaches the ranker: drop
/// entries with empty titles, clamp out-of-range scores.
fn sanitize(topics: Vec<Topic>) -> Vec<Topic> {
    topics.into_iter().filter_map(Topic::sanitized).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcesConfig;
    use crate::testing::{topics, MockAdapter};

    fn aggregator(adapters: Vec<Arc<dyn SourceAdapter>>) -> Aggregator {
        let mut reg = SourceRegistry::new(SourcesConfig::default_seed());
        for a in adapters {
            reg.register(a);
        }
        Aggregator::new(Arc::new(reg), FallbackProvider::embedded())
    }

    #[tokio::test(start_paused = true)]
    async fn broad_scan_caps_items_per_source() {
        let agg = aggregator(vec![Arc::new(MockAdapter::ok("youtube", topics("youtube", 40, 80.0)))]);
        let out = agg.trending(&AggregationRequest::broad()).await;
        // one source, per-source cap 15
        assert_eq!(out.len(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn broad_scan_survives_every_source_failing() {
        let agg = aggregator(vec![
            Arc::new(MockAdapter::failing("youtube")),
            Arc::new(MockAdapter::failing("reddit")),
            Arc::new(MockAdapter::failing("hackernews")),
        ]);
        let out = agg.trending(&AggregationRequest::broad()).await;
        assert!(out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_topics_never_reach_the_ranker() {
        let mut bad = topics("reddit", 3, 50.0);
        bad[0].title = String::new();
        bad[1].score = -4.0;
        let agg = aggregator(vec![Arc::new(MockAdapter::ok("reddit", bad))]);
        let out = agg.trending(&AggregationRequest::single("reddit")).await;
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| !t.title.is_empty() && t.score >= 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_platform_returns_empty() {
        let agg = aggregator(vec![]);
        let out = agg.trending(&AggregationRequest::single("myspace")).await;
        assert!(out.is_empty());
    }
}
