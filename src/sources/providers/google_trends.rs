// src/sources/providers/google_trends.rs
// Google Trends daily RSS feed. No credentials required. The feed ranks
// searches by traffic, so the score is rank-based rather than engagement
// derived.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::sources::SourceAdapter;
use crate::topic::Topic;

const FEED_URL: &str = "https://trends.google.com/trending/rss?geo=US";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    // quick-xml hands serde the local element name, without the ht: prefix.
    #[serde(rename = "approx_traffic")]
    approx_traffic: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// "200,000+" → 200000.
fn parse_traffic(s: &str) -> u64 {
    s.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn is_fresh(pub_date: Option<&str>) -> bool {
    // Items without a parsable date are kept; the feed itself is daily.
    let Some(ts) = pub_date else { return true };
    OffsetDateTime::parse(ts, &Rfc2822)
        .map(|dt| (OffsetDateTime::now_utc() - dt).whole_hours() <= 48)
        .unwrap_or(true)
}

pub struct GoogleTrendsAdapter {
    client: reqwest::Client,
}

impl GoogleTrendsAdapter {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_feed(rss: Rss) -> Vec<Topic> {
        rss.channel
            .item
            .into_iter()
            .filter(|it| is_fresh(it.pub_date.as_deref()))
            .enumerate()
            .filter_map(|(i, it)| {
                let title = it.title?;
                let traffic = it.approx_traffic.as_deref().map(parse_traffic).unwrap_or(0);
                Some(Topic {
                    id: format!("google-trends-{i}"),
                    platform: "google_trends".to_string(),
                    title,
                    summary: it
                        .approx_traffic
                        .map(|t| format!("{t} searches"))
                        .unwrap_or_else(|| "Trending Google search".to_string()),
                    url: it
                        .link
                        .unwrap_or_else(|| "https://trends.google.com".to_string()),
                    // Rank-based: the feed is already ordered by traffic.
                    score: (95.0 - i as f32).max(60.0),
                    engagement: traffic,
                    fetched_at: Utc::now(),
                    keywords: vec!["trending".into(), "google".into(), "search".into()],
                })
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for GoogleTrendsAdapter {
    async fn fetch(&self) -> Result<Vec<Topic>> {
        let body = self
            .client
            .get(FEED_URL)
            .send()
            .await
            .context("google trends request")?
            .error_for_status()
            .context("google trends status")?
            .text()
            .await
            .context("google trends body")?;

        let rss: Rss = from_str(&body).context("parsing google trends rss")?;
        Ok(Self::map_feed(rss))
    }

    /// Related-searches lookup is not exposed by the RSS feed; search
    /// filters the daily list instead.
    async fn search(&self, query: &str) -> Result<Vec<Topic>> {
        let needle = query.to_lowercase();
        let all = self.fetch().await?;
        Ok(all
            .into_iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect())
    }

    fn name(&self) -> &'static str {
        "google_trends"
    }
}
