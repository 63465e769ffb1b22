// src/sources/providers/lastfm.rs
// Last.fm global top-tracks chart. Requires LASTFM_API_KEY.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::SourceFailure;
use crate::sources::SourceAdapter;
use crate::topic::{viral_score, Topic};

pub const ENV_API_KEY: &str = "LASTFM_API_KEY";
const API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    tracks: Tracks,
}
#[derive(Debug, Deserialize)]
struct Tracks {
    #[serde(default)]
    track: Vec<Track>,
}
#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    url: String,
    #[serde(default)]
    playcount: Option<String>,
    #[serde(default)]
    listeners: Option<String>,
    artist: Artist,
}
#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

fn count(v: &Option<String>) -> u64 {
    v.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0)
}

pub struct LastFmAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl LastFmAdapter {
    pub fn from_env(client: reqwest::Client) -> Self {
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());
        Self { client, api_key }
    }

    fn map_chart(resp: ChartResponse) -> Vec<Topic> {
        resp.tracks
            .track
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let listeners = count(&t.listeners);
                let playcount = count(&t.playcount);
                Topic {
                    id: format!("lastfm-{i}"),
                    platform: "lastfm".to_string(),
                    title: format!("{} - {}", t.artist.name, t.name),
                    summary: format!("{listeners} listeners, {playcount} plays"),
                    url: t.url,
                    score: viral_score(listeners, 0, 0, "lastfm"),
                    engagement: playcount,
                    fetched_at: Utc::now(),
                    keywords: vec!["music".into(), "charts".into(), t.artist.name.to_lowercase()],
                }
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for LastFmAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceFailure::Unavailable { name: "lastfm" }.into());
        };

        let resp: ChartResponse = self
            .client
            .get(API_URL)
            .query(&[
                ("method", "chart.gettoptracks"),
                ("api_key", key),
                ("format", "json"),
                ("limit", "30"),
            ])
            .send()
            .await
            .context("lastfm request")?
            .error_for_status()
            .context("lastfm status")?
            .json()
            .await
            .context("lastfm body")?;

        Ok(Self::map_chart(resp))
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "lastfm"
    }
}
