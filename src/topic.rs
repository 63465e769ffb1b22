// src/topic.rs
// The unit of output plus the ephemeral per-call request shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trending topic as returned to callers.
///
/// `score` is a source-defined heuristic in 0–100, comparable across sources
/// only approximately. `id` is unique within one response, not globally
/// stable. Topics are created fresh per request and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub platform: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub score: f32,
    pub engagement: u64,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Topic {
    /// Repair a topic so it satisfies the output invariant, or reject it.
    /// Negative scores are clamped to 0; an empty title is unrecoverable.
    pub fn sanitized(mut self) -> Option<Topic> {
        self.title = normalize_text(&self.title);
        self.summary = normalize_text(&self.summary);
        if self.title.is_empty() {
            return None;
        }
        if self.score < 0.0 {
            self.score = 0.0;
        }
        if self.score > 100.0 {
            self.score = 100.0;
        }
        Some(self)
    }
}

/// One aggregation call. No request state survives past the call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregationRequest {
    /// Absent or "all" selects the broad scan over every priority source.
    pub platform: Option<String>,
    /// Present selects the concurrent multi-source search strategy.
    pub search: Option<String>,
}

impl AggregationRequest {
    pub fn broad() -> Self {
        Self::default()
    }

    pub fn single(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            search: None,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            platform: None,
            search: Some(term.into()),
        }
    }
}

/// Normalize display text: decode HTML entities, strip tags, collapse
/// whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // Length cap: 500 chars, enough for any summary we surface.
    if out.chars().count() > 500 {
        out = out.chars().take(500).collect();
    }

    out
}

/// Derive a short display title from free-form content: first sentence when
/// it is usefully sized, otherwise a truncated prefix.
pub fn extract_title(content: &str) -> String {
    let content = normalize_text(content);
    if content.is_empty() {
        return "Untitled".to_string();
    }

    let first_sentence = content
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    let len = first_sentence.chars().count();
    if len > 10 && len <= 100 {
        return first_sentence.to_string();
    }

    let prefix: String = content.chars().take(60).collect();
    if content.chars().count() > 60 {
        format!("{}...", prefix.trim_end())
    } else {
        prefix
    }
}

/// Logarithmic 0–100 viral score from raw engagement counts, weighted per
/// platform (comments and shares signal more intent than likes).
pub fn viral_score(likes: u64, comments: u64, shares: u64, platform: &str) -> f32 {
    let (wl, wc, ws) = match platform {
        "linkedin" => (1.0, 3.0, 5.0),
        "tiktok" => (1.0, 2.0, 4.0),
        "twitter" => (1.0, 2.0, 3.0),
        "youtube" | "instagram" => (1.0, 2.0, 0.0),
        _ => (1.0, 2.0, 1.0),
    };
    let base = likes as f64 * wl + comments as f64 * wc + shares as f64 * ws;
    ((base + 1.0).log10() * 25.0).min(100.0) as f32
}
