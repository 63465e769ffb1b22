// src/sources/providers/instagram.rs
// Instagram explore/hashtag trends via the dataset-scraper vendor.
// Structurally unavailable without SCRAPER_API_TOKEN.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use crate::error::SourceFailure;
use crate::sources::providers::scraper::ScraperClient;
use crate::sources::SourceAdapter;
use crate::topic::{extract_title, viral_score, Topic};

const DATASET_ID: &str = "gd_ltppn085pokosxh13";
const EXPLORE_TAGS: [&str; 4] = ["trending", "viral", "innovation", "tech"];

pub struct InstagramAdapter {
    scraper: Option<ScraperClient>,
}

impl InstagramAdapter {
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
                    .get("caption")
                    .or_else(|| item.get("description"))
                    .and_then(|v| v.as_str())?
                    .to_string();
                let likes = item.get("likes").and_then(|v| v.as_u64()).unwrap_or(0);
                let comments = item
                    .get("comments_count")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                let url = item
                    .get("post_url")
                    .and_then(|v| v.as_str())
                    .unwrap_or("https://www.instagram.com/explore")
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
                keywords.push("instagram".into());

                Some(Topic {
                    id: format!("instagram-{i}"),
                    platform: "instagram".to_string(),
                    title: extract_title(&content),
                    summary: content,
                    url,
                    score: viral_score(likes, comments, 0, "instagram"),
                    engagement: likes + comments,
                    fetched_at: Utc::now(),
                    keywords,
                })
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for InstagramAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let Some(scraper) = &self.scraper else {
            return Err(SourceFailure::Unavailable { name: "instagram" }.into());
        };
        let urls: Vec<String> = EXPLORE_TAGS
            .iter()
            .map(|tag| format!("https://www.instagram.com/explore/tags/{tag}/"))
            .collect();
        let items = scraper.collect(DATASET_ID, &urls).await?;
        Ok(Self::map_items(items))
    }

    fn is_available(&self) -> bool {
        self.scraper.is_some()
    }

    fn name(&self) -> &'static str {
        "instagram"
    }
}
