// src/sources/providers/reddit.rs
// Reddit public listings. No credentials required.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::sources::SourceAdapter;
use crate::topic::{viral_score, Topic};

const LISTING_URL: &str = "https://www.reddit.com/r/popular.json?limit=50";
const SEARCH_URL: &str = "https://www.reddit.com/search.json";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}
#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}
#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}
#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
    subreddit: String,
    #[serde(default)]
    ups: u64,
    #[serde(default)]
    num_comments: u64,
}

pub struct RedditAdapter {
    client: reqwest::Client,
}

impl RedditAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_posts(listing: Listing) -> Vec<Topic> {
        listing
            .data
            .children
            .into_iter()
            .map(|c| {
                let p = c.data;
                Topic {
                    id: format!("reddit-{}", p.id),
                    platform: "reddit".to_string(),
                    title: p.title,
                    summary: if p.selftext.is_empty() {
                        format!("{} upvotes in r/{}", p.ups, p.subreddit)
                    } else {
                        p.selftext
                    },
                    url: format!("https://reddit.com{}", p.permalink),
                    score: viral_score(p.ups, p.num_comments, 0, "reddit"),
                    engagement: p.ups + p.num_comments,
                    fetched_at: Utc::now(),
                    keywords: vec![p.subreddit.to_lowercase(), "reddit".into()],
                }
            })
            .collect()
    }

    async fn get_listing(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<Topic>> {
        let listing: Listing = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("reddit request")?
            .error_for_status()
            .context("reddit status")?
            .json()
            .await
            .context("reddit listing body")?;
        Ok(Self::map_posts(listing))
    }
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        self.get_listing(LISTING_URL, &[]).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Topic>> {
        self.get_listing(SEARCH_URL, &[("q", query), ("sort", "relevance"), ("limit", "25")])
            .await
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}
