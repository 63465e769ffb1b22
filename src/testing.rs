// Test mocks for the aggregation pipeline.
//
// One mock covering the one trait boundary: MockAdapter (SourceAdapter),
// scriptable per call with call counting, artificial delay, and failure
// injection. Plus helpers for constructing topic batches.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::sources::SourceAdapter;
use crate::topic::Topic;

/// Build `n` well-formed topics for one platform, all with the same score.
pub fn topics(platform: &str, n: usize, score: f32) -> Vec<Topic> {
    (0..n)
        .map(|i| Topic {
            id: format!("{platform}-{i}"),
            platform: platform.to_string(),
            title: format!("{platform} topic {i}"),
            summary: format!("summary {i}"),
            url: format!("https://{platform}.test/{i}"),
            score,
            engagement: 100 + i as u64,
            fetched_at: Utc::now(),
            keywords: vec!["test".into()],
        })
        .collect()
}

/// Scriptable source adapter. Counts `fetch`/`search` invocations so tests
/// can assert which sources the coordinator actually touched.
pub struct MockAdapter {
    name: &'static str,
    payload: Result<Vec<Topic>, String>,
    available: bool,
    delay: Duration,
    fetch_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl MockAdapter {
    pub fn ok(name: &'static str, payload: Vec<Topic>) -> Self {
        Self {
            name,
            payload: Ok(payload),
            available: true,
            delay: Duration::ZERO,
            fetch_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            payload: Err("injected fetch failure".to_string()),
            ..Self::ok(name, Vec::new())
        }
    }

    /// Structurally unavailable: `is_available() == false`, as with missing
    /// credentials. `fetch` still counts calls so tests can prove the
    /// coordinator never attempted one.
    pub fn unavailable(name: &'static str) -> Self {
        Self {
            available: false,
            ..Self::ok(name, Vec::new())
        }
    }

    /// Delay each call; combine with `start_paused` runtimes to simulate
    /// slow sources without real waiting.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> Result<Vec<Topic>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.payload {
            Ok(v) => Ok(v.clone()),
            Err(msg) => bail!("{msg}"),
        }
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await
    }

    async fn search(&self, _query: &str) -> Result<Vec<Topic>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
