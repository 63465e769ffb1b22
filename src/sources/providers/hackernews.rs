// src/sources/providers/hackernews.rs
// Hacker News: Firebase API for trending stories, Algolia for search.
// No credentials required, which is why this adapter holds a slot in the
// search subset.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::sources::SourceAdapter;
use crate::topic::{viral_score, Topic};

const TOP_STORIES_URL: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";
const ITEM_URL: &str = "https://hacker-news.firebaseio.com/v0/item";
const SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";
const STORY_LIMIT: usize = 15;

#[derive(Debug, Deserialize)]
struct Story {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    score: u64,
    #[serde(default)]
    descendants: u64,
    #[serde(default)]
    by: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}
#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    points: Option<u64>,
    #[serde(default)]
    num_comments: Option<u64>,
}

pub struct HackerNewsAdapter {
    client: reqwest::Client,
}

impl HackerNewsAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn story_topic(s: Story) -> Topic {
        let item_url = format!("https://news.ycombinator.com/item?id={}", s.id);
        Topic {
            id: format!("hn-{}", s.id),
            platform: "hackernews".to_string(),
            title: s.title,
            summary: format!("{} points, {} comments, by {}", s.score, s.descendants, s.by),
            url: s.url.unwrap_or(item_url),
            score: viral_score(s.score, s.descendants, 0, "hackernews"),
            engagement: s.score + s.descendants,
            fetched_at: Utc::now(),
            keywords: vec!["hackernews".into(), "technology".into()],
        }
    }
}

#[async_trait]
impl SourceAdapter for HackerNewsAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let ids: Vec<u64> = self
            .client
            .get(TOP_STORIES_URL)
            .send()
            .await
            .context("hn topstories request")?
            .json()
            .await
            .context("hn topstories body")?;

        let mut topics = Vec::with_capacity(STORY_LIMIT);
        for id in ids.into_iter().take(STORY_LIMIT) {
            // One story lost to a parse error should not sink the batch.
            let story: Option<Story> = self
                .client
                .get(format!("{ITEM_URL}/{id}.json"))
                .send()
                .await
                .context("hn item request")?
                .json()
                .await
                .unwrap_or(None);
            if let Some(s) = story {
                topics.push(Self::story_topic(s));
            }
        }
        Ok(topics)
    }

    async fn search(&self, query: &str) -> Result<Vec<Topic>> {
        let resp: SearchResponse = self
            .client
            .get(SEARCH_URL)
            .query(&[("query", query), ("tags", "story")])
            .send()
            .await
            .context("hn search request")?
            .json()
            .await
            .context("hn search body")?;

        Ok(resp
            .hits
            .into_iter()
            .filter_map(|h| {
                let title = h.title?;
                let points = h.points.unwrap_or(0);
                let comments = h.num_comments.unwrap_or(0);
                let item_url = format!("https://news.ycombinator.com/item?id={}", h.object_id);
                Some(Topic {
                    id: format!("hn-{}", h.object_id),
                    platform: "hackernews".to_string(),
                    title,
                    summary: format!("{points} points, {comments} comments"),
                    url: h.url.unwrap_or(item_url),
                    score: viral_score(points, comments, 0, "hackernews"),
                    engagement: points + comments,
                    fetched_at: Utc::now(),
                    keywords: vec!["hackernews".into()],
                })
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "hackernews"
    }
}
