// src/sources/providers/youtube.rs
// YouTube Data API v3 most-popular chart. Requires YOUTUBE_API_KEY.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::SourceFailure;
use crate::sources::SourceAdapter;
use crate::topic::{viral_score, Topic};

pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<Video>,
}
#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}
#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    tags: Vec<String>,
}
#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount", default)]
    view_count: Option<String>,
    #[serde(rename = "likeCount", default)]
    like_count: Option<String>,
    #[serde(rename = "commentCount", default)]
    comment_count: Option<String>,
}

fn count(v: &Option<String>) -> u64 {
    v.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0)
}

pub struct YouTubeAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl YouTubeAdapter {
    pub fn from_env(client: reqwest::Client) -> Self {
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());
        Self { client, api_key }
    }

    fn map_videos(list: VideoList) -> Vec<Topic> {
        list.items
            .into_iter()
            .map(|v| {
                let views = count(&v.statistics.view_count);
                let likes = count(&v.statistics.like_count);
                let comments = count(&v.statistics.comment_count);
                let mut keywords: Vec<String> = v
                    .snippet
                    .tags
                    .into_iter()
                    .take(4)
                    .map(|t| t.to_lowercase())
                    .collect();
                keywords.push("youtube".into());
                Topic {
                    id: format!("youtube-{}", v.id),
                    platform: "youtube".to_string(),
                    title: v.snippet.title,
                    summary: format!("{} views on {}", views, v.snippet.channel_title),
                    url: format!("https://www.youtube.com/watch?v={}", v.id),
                    score: viral_score(likes, comments, 0, "youtube"),
                    engagement: views,
                    fetched_at: Utc::now(),
                    keywords,
                }
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for YouTubeAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceFailure::Unavailable { name: "youtube" }.into());
        };

        let list: VideoList = self
            .client
            .get(VIDEOS_URL)
            .query(&[
                ("part", "snippet,statistics"),
                ("chart", "mostPopular"),
                ("maxResults", "25"),
                ("regionCode", "US"),
                ("key", key),
            ])
            .send()
            .await
            .context("youtube request")?
            .error_for_status()
            .context("youtube status")?
            .json()
            .await
            .context("youtube body")?;

        Ok(Self::map_videos(list))
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statistics_and_builds_watch_url() {
        let raw = r#"{ "items": [ {
            "id": "dQw4w9WgXcQ",
            "snippet": { "title": "A video", "description": "d",
                         "channelTitle": "Channel", "tags": ["Music", "Pop"] },
            "statistics": { "viewCount": "1000000", "likeCount": "50000",
                            "commentCount": "1200" }
        } ] }"#;
        let list: VideoList = serde_json::from_str(raw).unwrap();
        let topics = YouTubeAdapter::map_videos(list);
        let t = &topics[0];
        assert_eq!(t.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(t.engagement, 1_000_000);
        assert!(t.keywords.contains(&"music".to_string()));
        assert!(t.score > 0.0);
    }

    #[test]
    fn hidden_statistics_map_to_zero() {
        let raw = r#"{ "items": [ {
            "id": "x", "snippet": { "title": "t" }
        } ] }"#;
        let list: VideoList = serde_json::from_str(raw).unwrap();
        let topics = YouTubeAdapter::map_videos(list);
        assert_eq!(topics[0].engagement, 0);
        assert_eq!(topics[0].score, 0.0);
    }
}
