// src/sources/providers/scraper.rs
// Shared client for the dataset-scraper vendor backing the TikTok and
// Instagram adapters. The vendor exposes an asynchronous collection model:
// trigger a crawl, poll the snapshot until it settles, then fetch items.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

pub const ENV_SCRAPER_TOKEN: &str = "SCRAPER_API_TOKEN";
const BASE_URL: &str = "https://api.brightdata.com/datasets/v3";
const MAX_POLL_ATTEMPTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct TriggerResponse {
    snapshot_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotStatus {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct ScraperClient {
    client: reqwest::Client,
    token: String,
}

impl ScraperClient {
    pub fn from_env(client: reqwest::Client) -> Option<Self> {
        let token = std::env::var(ENV_SCRAPER_TOKEN).ok()?;
        if token.is_empty() {
            return None;
        }
        Some(Self { client, token })
    }

    /// Trigger a collection for `urls` against a vendor dataset and wait for
    /// its items. Polling backs off linearly and gives up well inside the
    /// coordinator's per-source budget.
    pub async fn collect(&self, dataset_id: &str, urls: &[String]) -> Result<Vec<serde_json::Value>> {
        let body: Vec<serde_json::Value> = urls
            .iter()
            .map(|u| serde_json::json!({ "url": u }))
            .collect();

        let trigger: TriggerResponse = self
            .client
            .post(format!("{BASE_URL}/trigger?dataset_id={dataset_id}&format=json"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("scraper trigger request")?
            .error_for_status()
            .context("scraper trigger status")?
            .json()
            .await
            .context("scraper trigger body")?;

        let Some(snapshot_id) = trigger.snapshot_id else {
            bail!("no snapshot_id returned from trigger");
        };

        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(Duration::from_millis(1_000 + u64::from(attempt) * 500)).await;

            let status: SnapshotStatus = self
                .client
                .get(format!("{BASE_URL}/snapshots/{snapshot_id}"))
                .bearer_auth(&self.token)
                .send()
                .await
                .context("scraper poll request")?
                .json()
                .await
                .context("scraper poll body")?;

            match status.status.as_str() {
                "succeeded" | "ready" => {
                    let items: Vec<serde_json::Value> = self
                        .client
                        .get(format!("{BASE_URL}/snapshots/{snapshot_id}/items?format=json"))
                        .bearer_auth(&self.token)
                        .send()
                        .await
                        .context("scraper items request")?
                        .json()
                        .await
                        .context("scraper items body")?;
                    return Ok(items);
                }
                "failed" => bail!(
                    "collection failed: {}",
                    status.error.unwrap_or_else(|| "unknown error".into())
                ),
                _ => {}
            }
        }

        bail!("collection still pending after {MAX_POLL_ATTEMPTS} polls")
    }
}
