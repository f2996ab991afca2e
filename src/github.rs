//! GitHub activity source
//!
//! Fetches a user's contribution profile through the GraphQL API, scoped to
//! the current calendar year (UTC).
//!
//! The CLI reads its token from environment variables:
//! - EXTRA_GITHUB_TOKEN (priority)
//! - GITHUB_TOKEN (fallback)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::GitHubConfig;
use crate::error::ProfileError;
use crate::profile::RawProfile;

/// Minimum remaining requests before we report the budget as low
const RATE_LIMIT_THRESHOLD: u32 = 100;

const PROFILE_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    login
    name
    avatarUrl
    bio
    followers { totalCount }
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalPullRequestContributions
      totalIssueContributions
      totalPullRequestReviewContributions
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays { color contributionCount date }
        }
      }
    }
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
          description
          stargazerCount
          forkCount
          primaryLanguage { name color }
          url
        }
      }
    }
    repositories(first: 100, orderBy: {field: STARGAZERS, direction: DESC}, ownerAffiliations: OWNER, privacy: PUBLIC) {
      totalCount
      nodes { stargazerCount }
    }
  }
}
"#;

/// Get GitHub token from environment (EXTRA_GITHUB_TOKEN takes priority)
pub fn token_from_env() -> Option<String> {
    preferred_token(
        std::env::var("EXTRA_GITHUB_TOKEN").ok(),
        std::env::var("GITHUB_TOKEN").ok(),
    )
}

/// First non-empty token, `extra` before `fallback`.
fn preferred_token(extra: Option<String>, fallback: Option<String>) -> Option<String> {
    extra.into_iter().chain(fallback).find(|t| !t.is_empty())
}

/// Anything that can produce a raw activity profile for a login.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_profile(&self, username: &str, token: &str)
        -> Result<RawProfile, ProfileError>;
}

/// Date range the contribution totals are counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ContributionWindow {
    /// 1 January 00:00 UTC of `now`'s year through `now`.
    pub fn year_to_date(now: DateTime<Utc>) -> Self {
        let from = Utc
            .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        Self { from, to: now }
    }

    fn variables(&self, username: &str) -> serde_json::Value {
        json!({
            "username": username,
            "from": self.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            "to": self.to.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

/// Rate limit information from GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
    pub used: u32,
}

impl RateLimitInfo {
    /// Check if we're running low on API calls
    pub fn is_low(&self) -> bool {
        self.remaining < RATE_LIMIT_THRESHOLD
    }

    /// Seconds until rate limit resets
    pub fn seconds_until_reset(&self) -> i64 {
        let now = Utc::now().timestamp();
        (self.reset - now).max(0)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ProfileData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    user: Option<RawProfile>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Unwrap the GraphQL envelope. Any reported error fails the whole fetch.
fn decode_profile(body: &str) -> Result<RawProfile, ProfileError> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| ProfileError::MalformedInput(format!("invalid GraphQL response: {}", e)))?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(ProfileError::Upstream(messages.join("; ")));
    }

    response
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| ProfileError::Upstream("response contained no user".to_string()))
}

pub struct GitHubClient {
    client: reqwest::Client,
    graphql_url: String,
    api_url: String,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        // Build HTTP client with timeout, falling back to default client if builder fails
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            graphql_url: config.graphql_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn build_request(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut req = request
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        req
    }

    /// Check GitHub API rate limit status
    pub async fn check_rate_limit(&self, token: Option<&str>) -> anyhow::Result<RateLimitInfo> {
        let url = format!("{}/rate_limit", self.api_url);
        let response = self
            .build_request(self.client.get(&url), token)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to check rate limit: {}", response.status());
        }

        #[derive(Deserialize)]
        struct RateLimitResponse {
            rate: RateLimitInfo,
        }

        let data: RateLimitResponse = response.json().await?;
        if data.rate.is_low() {
            warn!(
                "GitHub rate limit low: {}/{} remaining",
                data.rate.remaining, data.rate.limit
            );
        }
        Ok(data.rate)
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    async fn fetch_profile(
        &self,
        username: &str,
        token: &str,
    ) -> Result<RawProfile, ProfileError> {
        let window = ContributionWindow::year_to_date(Utc::now());
        let body = json!({
            "query": PROFILE_QUERY,
            "variables": window.variables(username),
        });

        debug!(
            "Fetching GitHub profile for @{} ({} .. {})",
            username, window.from, window.to
        );

        let response = self
            .build_request(self.client.post(&self.graphql_url), Some(token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("GitHub GraphQL error {} for @{}: {}", status, username, text);
            return Err(ProfileError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let profile = decode_profile(&text)?;
        info!("Fetched GitHub profile for @{}", username);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_starts_at_new_year() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap();
        let window = ContributionWindow::year_to_date(now);
        assert_eq!(window.from, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.to, now);

        let vars = window.variables("octocat");
        assert_eq!(vars["username"], "octocat");
        assert_eq!(vars["from"], "2026-01-01T00:00:00Z");
        assert_eq!(vars["to"], "2026-10-18T14:30:00Z");
    }

    #[test]
    fn test_window_on_new_year_instant() {
        let now = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let window = ContributionWindow::year_to_date(now);
        assert_eq!(window.from, window.to);
    }

    #[test]
    fn test_decode_profile() {
        let body = r#"{ "data": { "user": { "login": "octocat", "followers": { "totalCount": 9 } } } }"#;
        let profile = decode_profile(body).unwrap();
        assert_eq!(profile.login.as_deref(), Some("octocat"));
        assert_eq!(profile.followers.and_then(|f| f.total_count), Some(9));
    }

    #[test]
    fn test_decode_graphql_errors() {
        let body = r#"{
            "data": { "user": null },
            "errors": [
                { "type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'nobody'." }
            ]
        }"#;
        let err = decode_profile(body).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("Could not resolve"));
    }

    #[test]
    fn test_decode_missing_user() {
        let err = decode_profile(r#"{ "data": { "user": null } }"#).unwrap_err();
        assert!(matches!(err, ProfileError::Upstream(_)));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_profile("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ProfileError::MalformedInput(_)));
    }

    #[test]
    fn test_rate_limit_is_low() {
        let info = RateLimitInfo {
            limit: 5000,
            remaining: 42,
            reset: 0,
            used: 4958,
        };
        assert!(info.is_low());
        assert_eq!(info.seconds_until_reset(), 0);
    }

    #[test]
    fn test_preferred_token_priority() {
        assert_eq!(preferred_token(None, None), None);
        assert_eq!(
            preferred_token(None, Some("github_token".into())),
            Some("github_token".to_string())
        );
        assert_eq!(
            preferred_token(Some("extra_token".into()), Some("github_token".into())),
            Some("extra_token".to_string())
        );
        assert_eq!(
            preferred_token(Some(String::new()), Some("github_token".into())),
            Some("github_token".to_string())
        );
        assert_eq!(preferred_token(Some(String::new()), Some(String::new())), None);
    }
}
