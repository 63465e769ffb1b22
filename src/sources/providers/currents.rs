// src/sources/providers/currents.rs
// Currents news API. Requires CURRENTS_API_KEY.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::SourceFailure;
use crate::sources::SourceAdapter;
use crate::topic::Topic;

pub const ENV_API_KEY: &str = "CURRENTS_API_KEY";
const LATEST_URL: &str = "https://api.currentsapi.services/v1/latest-news";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<Article>,
}
#[derive(Debug, Deserialize)]
struct Article {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    url: String,
    #[serde(default)]
    category: Vec<String>,
}

pub struct CurrentsAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl CurrentsAdapter {
    pub fn from_env(client: reqwest::Client) -> Self {
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());
        Self { client, api_key }
    }

    fn map_articles(resp: NewsResponse) -> Vec<Topic> {
        resp.news
            .into_iter()
            .enumerate()
            .map(|(i, a)| Topic {
                id: format!("currents-{}", a.id),
                platform: "currents".to_string(),
                title: a.title,
                summary: a.description,
                url: a.url,
                // Wire order is recency; newer articles rank higher.
                score: (80.0 - i as f32 * 2.0).max(40.0),
                engagement: 0,
                fetched_at: Utc::now(),
                keywords: a.category.into_iter().take(4).collect(),
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for CurrentsAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceFailure::Unavailable { name: "currents" }.into());
        };

        let resp: NewsResponse = self
            .client
            .get(LATEST_URL)
            .query(&[
                ("language", "en"),
                ("category", "business,technology"),
                ("apiKey", key),
            ])
            .send()
            .await
            .context("currents request")?
            .error_for_status()
            .context("currents status")?
            .json()
            .await
            .context("currents body")?;

        Ok(Self::map_articles(resp))
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "currents"
    }
}
