//! # Fallback Provider
//!
//! Per-source static datasets returned when an adapter is unavailable or
//! fails, preserving the response shape under degradation. Datasets live in
//! declarative TOML (`config/fallback.toml`, embedded as the default and
//! overridable from disk), so they can change without touching orchestration
//! logic.

use chrono::Utc;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::topic::Topic;

const EMBEDDED: &str = include_str!("../config/fallback.toml");
pub const ENV_FALLBACK_PATH: &str = "TRENDSCOPE_FALLBACK_PATH";

#[derive(Debug, Clone, Deserialize)]
struct FallbackEntry {
    platform: String,
    title: String,
    summary: String,
    url: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FallbackFile {
    #[serde(default)]
    entries: Vec<FallbackEntry>,
}

#[derive(Debug, Clone)]
pub struct FallbackProvider {
    entries: Vec<FallbackEntry>,
}

impl FallbackProvider {
    /// Embedded default dataset. Infallible: the embedded TOML is validated
    /// by the `embedded_dataset_parses` test.
    pub fn embedded() -> Self {
        let file: FallbackFile =
            toml::from_str(EMBEDDED).unwrap_or(FallbackFile { entries: vec![] });
        Self {
            entries: file.entries,
        }
    }

    /// Load from a TOML file, falling back to the embedded dataset on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<FallbackFile>(&s) {
                Ok(file) => Self {
                    entries: file.entries,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "fallback config unparsable, using embedded");
                    Self::embedded()
                }
            },
            Err(_) => Self::embedded(),
        }
    }

    /// Honor `$TRENDSCOPE_FALLBACK_PATH` when set, otherwise embedded.
    pub fn load_default() -> Self {
        match std::env::var(ENV_FALLBACK_PATH) {
            Ok(p) => Self::load_from_file(p),
            Err(_) => Self::embedded(),
        }
    }

    /// Always succeeds. Unknown sources get an empty list, which is still a
    /// valid response shape.
    pub fn provide(&self, source: &str) -> Vec<Topic> {
        self.entries
            .iter()
            .filter(|e| e.platform == source)
            .enumerate()
            .map(|(i, e)| Topic {
                id: format!("{}-fallback-{}", e.platform, i + 1),
                platform: e.platform.clone(),
                title: e.title.clone(),
                summary: e.summary.clone(),
                url: e.url.clone(),
                score: 1.0,
                engagement: 0,
                fetched_at: Utc::now(),
                keywords: e.keywords.clone(),
            })
            .collect()
    }
}
