//! DevRank API client
//!
//! Talks to a running `devrank-server` on behalf of a session.

use anyhow::{anyhow, Result};
use devrank::server::ApiResponse;
use devrank::RankedProfile;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DevRankClient {
    client: Client,
    base_url: String,
}

impl DevRankClient {
    pub fn new(server_url: &str) -> Self {
        // Build HTTP client with timeout, falling back to default client if builder fails
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/api/{}", self.base_url, path)
    }

    /// Ranked profile for the user behind `session`
    pub async fn get_profile(&self, session: &str) -> Result<RankedProfile> {
        let url = self.api_url("github/profile");
        let resp = self.client.get(&url).bearer_auth(session).send().await?;

        let status = resp.status();
        let body: ApiResponse<RankedProfile> = resp
            .json()
            .await
            .map_err(|e| anyhow!("Unexpected response from server ({}): {}", status, e))?;

        match body.data {
            Some(profile) if body.success => Ok(profile),
            _ => Err(anyhow!(
                "Failed to fetch profile ({}): {}",
                status,
                body.message.unwrap_or_else(|| "Unknown error".into())
            )),
        }
    }
}
