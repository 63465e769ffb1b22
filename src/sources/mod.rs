// src/sources/mod.rs
pub mod providers;

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{SourceDescriptor, SourcesConfig};
use crate::topic::Topic;

/// One external source of trending topics.
///
/// Adapters must not block indefinitely; the coordinator bounds every call
/// with the deadline guard, but adapters are expected to carry their own
/// network timeouts as defense in depth.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Retrieve the source's current trending topics.
    async fn fetch(&self) -> Result<Vec<Topic>>;

    /// Search the source for a term. Sources outside the search subset keep
    /// the default empty implementation.
    async fn search(&self, _query: &str) -> Result<Vec<Topic>> {
        Ok(Vec::new())
    }

    /// Whether required credentials/configuration are present. Checked by
    /// the health report and to short-circuit straight to fallback data.
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str;
}

/// Registry mapping source name to adapter + descriptor, populated once at
/// process start and injected wherever sources are consumed. Dispatch is a
/// lookup; adding a source never touches coordinator logic.
pub struct SourceRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
    config: SourcesConfig,
}

impl SourceRegistry {
    pub fn new(config: SourcesConfig) -> Self {
        Self {
            adapters: HashMap::new(),
            config,
        }
    }

    /// Build the production registry: every seeded source gets its concrete
    /// adapter, credentialed from the environment.
    pub fn from_env(config: SourcesConfig) -> Self {
        use providers::*;

        let client = shared_client();
        let mut reg = Self::new(config);
        reg.register(Arc::new(youtube::YouTubeAdapter::from_env(client.clone())));
        reg.register(Arc::new(tiktok::TikTokAdapter::from_env(client.clone())));
        reg.register(Arc::new(google_trends::GoogleTrendsAdapter::new(
            client.clone(),
        )));
        reg.register(Arc::new(instagram::InstagramAdapter::from_env(
            client.clone(),
        )));
        reg.register(Arc::new(reddit::RedditAdapter::new(client.clone())));
        reg.register(Arc::new(hackernews::HackerNewsAdapter::new(client.clone())));
        reg.register(Arc::new(currents::CurrentsAdapter::from_env(client.clone())));
        reg.register(Arc::new(lastfm::LastFmAdapter::from_env(client)));
        reg
    }

    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn adapter(&self, name: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn descriptor(&self, name: &str) -> Option<&SourceDescriptor> {
        self.config.descriptor(name)
    }

    pub fn config(&self) -> &SourcesConfig {
        &self.config
    }

    /// Registered sources in broad-scan priority order.
    pub fn scan_order(&self) -> Vec<(&SourceDescriptor, Arc<dyn SourceAdapter>)> {
        self.config
            .by_priority()
            .into_iter()
            .filter_map(|d| self.adapter(&d.name).map(|a| (d, a)))
            .collect()
    }

    /// Adapters registered without a descriptor. They never enter a scan,
    /// which is a wiring mistake worth surfacing in the health report.
    pub fn undescribed(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .adapters
            .keys()
            .filter(|n| self.config.descriptor(n).is_none())
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// One pooled HTTP client for every adapter. The client-level timeout is a
/// second line of defense behind the per-source deadline guard.
pub fn shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("trendscope/0.1 (trend aggregation engine)")
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(45))
        .build()
        .unwrap_or_default()
}
