//! # Engine configuration
//!
//! Static per-source descriptors plus the coordinator's tunables.
//!
//! - Loads from TOML (`config/sources.toml` or `$TRENDSCOPE_SOURCES_PATH`).
//! - Falls back to a built-in `default_seed()` when no file is present.
//! - Descriptors are immutable after startup and shared read-only across
//!   requests; adapters must not mutate them.

use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

pub const ENV_SOURCES_PATH: &str = "TRENDSCOPE_SOURCES_PATH";
pub const DEFAULT_SOURCES_PATH: &str = "config/sources.toml";

/// Static configuration for one adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    /// Wall-clock budget for one `fetch` through the deadline guard.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Max items kept from this source per request.
    #[serde(default = "default_per_source_cap")]
    pub per_source_cap: usize,
    /// Scan order for the broad strategy; lower scans first.
    pub priority: u32,
}

impl SourceDescriptor {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    40_000
}

fn default_per_source_cap() -> usize {
    15
}

/// Coordinator tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Broad scan stops after this many priority sources even without an
    /// early exit.
    #[serde(default = "default_max_priority_sources")]
    pub max_priority_sources: usize,
    /// Early exit once this many sources have contributed...
    #[serde(default = "default_early_exit_sources")]
    pub early_exit_min_sources: usize,
    /// ...and this many items have accumulated.
    #[serde(default = "default_early_exit_items")]
    pub early_exit_min_items: usize,
    /// Pause between sequential sources to smooth outbound bursts.
    #[serde(default = "default_inter_source_pause_ms")]
    pub inter_source_pause_ms: u64,
    /// Result caps per strategy.
    #[serde(default = "default_broad_cap")]
    pub broad_cap: usize,
    #[serde(default = "default_single_cap")]
    pub single_cap: usize,
    #[serde(default = "default_search_cap")]
    pub search_cap: usize,
}

fn default_max_priority_sources() -> usize {
    6
}
fn default_early_exit_sources() -> usize {
    2
}
fn default_early_exit_items() -> usize {
    25
}
fn default_inter_source_pause_ms() -> u64 {
    500
}
fn default_broad_cap() -> usize {
    90
}
fn default_single_cap() -> usize {
    20
}
fn default_search_cap() -> usize {
    15
}

impl Default for EngineConfig {
    fn default() -> Self {
        // serde defaults double as the canonical values
        toml::from_str("").expect("empty engine config deserializes")
    }
}

impl EngineConfig {
    pub fn inter_source_pause(&self) -> Duration {
        Duration::from_millis(self.inter_source_pause_ms)
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub sources: Vec<SourceDescriptor>,
}

impl SourcesConfig {
    /// Load from a TOML file, falling back to the built-in seed on any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "sources config unparsable, using seed");
                Self::default_seed()
            }),
            Err(_) => Self::default_seed(),
        }
    }

    /// Load using `$TRENDSCOPE_SOURCES_PATH`, then `config/sources.toml`,
    /// then the seed.
    pub fn load_default() -> Self {
        if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
            return Self::load_from_file(p);
        }
        Self::load_from_file(DEFAULT_SOURCES_PATH)
    }

    /// Built-in descriptor table: the six priority sources scanned by the
    /// broad strategy, then the credential-gated long tail.
    pub fn default_seed() -> Self {
        let sources = [
            ("youtube", 1),
            ("tiktok", 2),
            ("google_trends", 3),
            ("instagram", 4),
            ("reddit", 5),
            ("hackernews", 6),
            ("currents", 7),
            ("lastfm", 8),
        ]
        .into_iter()
        .map(|(name, priority)| SourceDescriptor {
            name: name.to_string(),
            timeout_ms: default_timeout_ms(),
            per_source_cap: default_per_source_cap(),
            priority,
        })
        .collect();

        Self {
            engine: EngineConfig::default(),
            sources,
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|d| d.name == name)
    }

    /// Descriptors in broad-scan order.
    pub fn by_priority(&self) -> Vec<&SourceDescriptor> {
        let mut v: Vec<&SourceDescriptor> = self.sources.iter().collect();
        v.sort_by_key(|d| d.priority);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_six_priority_sources_first() {
        let cfg = SourcesConfig::default_seed();
        let ordered = cfg.by_priority();
        assert!(ordered.len() >= 6);
        assert_eq!(ordered[0].name, "youtube");
        assert_eq!(ordered[5].name, "hackernews");
    }

    #[test]
    fn engine_defaults_are_stable() {
        let e = EngineConfig::default();
        assert_eq!(e.max_priority_sources, 6);
        assert_eq!(e.early_exit_min_sources, 2);
        assert_eq!(e.early_exit_min_items, 25);
        assert_eq!(e.inter_source_pause_ms, 500);
        assert_eq!((e.broad_cap, e.single_cap, e.search_cap), (90, 20, 15));
    }

    #[test]
    fn toml_overrides_and_defaults_compose() {
        let toml = r#"
            [engine]
            broad_cap = 45

            [[sources]]
            name = "reddit"
            priority = 1

            [[sources]]
            name = "youtube"
            priority = 2
            timeout_ms = 10000
        "#;
        let cfg: SourcesConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.engine.broad_cap, 45);
        assert_eq!(cfg.engine.single_cap, 20);
        assert_eq!(cfg.descriptor("reddit").unwrap().timeout_ms, 40_000);
        assert_eq!(cfg.descriptor("youtube").unwrap().timeout_ms, 10_000);
        assert_eq!(cfg.by_priority()[0].name, "reddit");
    }

    #[test]
    fn unreadable_file_falls_back_to_seed() {
        let cfg = SourcesConfig::load_from_file("does/not/exist.toml");
        assert!(cfg.descriptor("reddit").is_some());
    }
}
