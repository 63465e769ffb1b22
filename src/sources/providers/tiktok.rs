// src/sources/providers/tiktok.rs
// TikTok discover/trending via the dataset-scraper vendor. Structurally
// unavailable without SCRAPER_API_TOKEN.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use crate::error::SourceFailure;
use crate::sources::providers::scraper::ScraperClient;
use crate::sources::SourceAdapter;
use crate::topic::{extract_title, viral_score, Topic};

const DATASET_ID: &str = "gd_lyclm20il4r5helnj";
const DISCOVER_URLS: [&str; 2] = ["https://www.tiktok.com/trending", "https://www.tiktok.com/discover"];

pub struct TikTokAdapter {
    scraper: Option<ScraperClient>,
}

impl TikTokAdapter {
    pub fn from_env(client: reqwest::Client) -> Self {
        Self {
            scraper: ScraperClient::from_env(client),
        }
    }

    fn map_items(items: Vec<serde_json::Value>) -> Vec<Topic> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let content = item
                    .get("description")
                    .or_else(|| item.get("text"))
                    .and_then(|v| v.as_str())?
                    .to_string();
                let likes = item.get("likes").and_then(|v| v.as_u64()).unwrap_or(0);
                let comments = item.get("comments").and_then(|v| v.as_u64()).unwrap_or(0);
                let shares = item.get("shares").and_then(|v| v.as_u64()).unwrap_or(0);
                let url = item
                    .get("video_url")
                    .and_then(|v| v.as_str())
                    .unwrap_or("https://www.tiktok.com/trending")
                    .to_string();
                let mut keywords: Vec<String> = item
                    .get("hashtags")
                    .and_then(|v| v.as_array())
                    .map(|a| {
                        a.iter()
                            .filter_map(|h| h.as_str())
                            .take(4)
                            .map(str::to_lowercase)
                            .collect()
                    })
                    .unwrap_or_default();
                keywords.push("tiktok".into());

                Some(Topic {
                    id: format!("tiktok-{i}"),
                    platform: "tiktok".to_string(),
                    title: extract_title(&content),
                    summary: content,
                    url,
                    score: viral_score(likes, comments, shares, "tiktok"),
                    engagement: likes + comments + shares,
                    fetched_at: Utc::now(),
                    keywords,
                })
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for TikTokAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let Some(scraper) = &self.scraper else {
            return Err(SourceFailure::Unavailable { name: "tiktok" }.into());
        };
        let urls: Vec<String> = DISCOVER_URLS.iter().map(|u| u.to_string()).collect();
        let items = scraper.collect(DATASET_ID, &urls).await?;
        Ok(Self::map_items(items))
    }

    fn is_available(&self) -> bool {
        self.scraper.is_some()
    }

    fn name(&self) -> &'static str {
        "tiktok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_scraped_items_with_platform_weights() {
        let items = vec![
            json!({ "description": "A viral dance takes over. Everyone joins in with it now.",
                    "likes": 10_000, "comments": 500, "shares": 2_000,
                    "video_url": "https://www.tiktok.com/@x/video/1",
                    "hashtags": ["Dance", "Viral"] }),
            json!({ "unrelated": true }),
        ];
        let topics = TikTokAdapter::map_items(items);
        assert_eq!(topics.len(), 1);
        let t = &topics[0];
        assert_eq!(t.title, "A viral dance takes over");
        assert_eq!(t.engagement, 12_500);
        assert!(t.keywords.contains(&"dance".to_string()));
    }
}
