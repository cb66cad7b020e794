//! HTTP client for the verification server's sync and status endpoints.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SyncCandidate {
    code: String,
    created_date: DateTime<Utc>,
}

#[derive(Serialize)]
struct SyncRequest {
    codes: Vec<SyncCandidate>,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncStats {
    pub added: u64,
    pub skipped: u64,
    pub errors: u64,
    pub total: u64,
}

#[derive(Deserialize)]
struct SyncResponse {
    stats: SyncStats,
}

#[derive(Debug, Deserialize)]
pub struct ServerStats {
    pub total_codes: u64,
    pub activated_codes: u64,
    pub activation_rate: f64,
    pub today_queries: u64,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub stats: ServerStats,
}

pub struct ServerClient {
    http: Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn sync_codes(
        &self,
        codes: Vec<(String, DateTime<Utc>)>,
        api_key: &str,
    ) -> Result<SyncStats> {
        let request = SyncRequest {
            codes: codes
                .into_iter()
                .map(|(code, created_date)| SyncCandidate { code, created_date })
                .collect(),
            api_key: api_key.to_owned(),
        };

        let resp = self
            .http
            .post(format!("{}/api/sync-codes", self.base_url))
            .json(&request)
            .send()
            .await
            .with_context(|| format!("failed to reach server at {}", self.base_url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("sync rejected ({status}): {body}");
        }

        let parsed: SyncResponse = resp.json().await.context("malformed sync response")?;
        Ok(parsed.stats)
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        let resp = self
            .http
            .get(format!("{}/api/status", self.base_url))
            .send()
            .await
            .with_context(|| format!("failed to reach server at {}", self.base_url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("status request failed ({status})");
        }
        resp.json().await.context("malformed status response")
    }
}
