//! Profile normalizer
//!
//! Maps the nested GitHub GraphQL `user` payload onto one flat
//! [`ActivityStatistics`] record. Every count in the raw payload is optional;
//! absent (and negative) counts are filled with zero here, at the boundary,
//! so nothing downstream has to reason about missing data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProfileError;

// ============================================================================
// RAW PROVIDER SHAPE
// ============================================================================

/// `user` object as returned by the profile query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfile {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub followers: Option<RawTotalCount>,
    pub contributions_collection: Option<RawContributions>,
    pub pinned_items: Option<RawNodes<RawPinnedRepository>>,
    pub repositories: Option<RawRepositories>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTotalCount {
    pub total_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContributions {
    pub total_commit_contributions: Option<i64>,
    pub total_pull_request_contributions: Option<i64>,
    pub total_issue_contributions: Option<i64>,
    pub total_pull_request_review_contributions: Option<i64>,
    pub contribution_calendar: Option<RawCalendar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalendar {
    pub total_contributions: Option<i64>,
    pub weeks: Option<Vec<RawWeek>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeek {
    pub contribution_days: Option<Vec<RawDay>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDay {
    pub color: Option<String>,
    pub contribution_count: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNodes<T> {
    pub nodes: Option<Vec<T>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPinnedRepository {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stargazer_count: Option<i64>,
    pub fork_count: Option<i64>,
    pub primary_language: Option<RawLanguage>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLanguage {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Owned public repositories, already restricted by the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepositories {
    pub total_count: Option<i64>,
    pub nodes: Option<Vec<RawRepositoryStars>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepositoryStars {
    pub stargazer_count: Option<i64>,
}

// ============================================================================
// NORMALIZED SNAPSHOT
// ============================================================================

/// Provider-agnostic activity snapshot consumed by the rank engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityStatistics {
    pub login: String,
    pub name: String,
    pub avatar_url: String,
    pub bio: String,
    pub total_commits: u64,
    pub total_pull_requests: u64,
    pub total_issues: u64,
    pub total_reviews: u64,
    pub total_stars_earned: u64,
    pub followers: u64,
    pub contribution_calendar: ContributionCalendar,
    pub pinned_repositories: Vec<PinnedRepository>,
    pub total_public_repositories: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributionDay {
    pub color: String,
    pub contribution_count: u64,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinnedRepository {
    pub name: String,
    pub description: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub primary_language: Language,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    pub color: String,
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Absent means zero. Negative counts cannot come from GitHub and are
/// clamped to zero rather than rejected.
fn count(value: Option<i64>) -> u64 {
    value.map_or(0, |v| u64::try_from(v).unwrap_or(0))
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Sum of stargazers over exactly the repositories the provider returned.
pub fn stars_earned(repositories: &[RawRepositoryStars]) -> u64 {
    repositories
        .iter()
        .fold(0u64, |total, repo| total.saturating_add(count(repo.stargazer_count)))
}

fn normalize_calendar(raw: Option<RawCalendar>) -> ContributionCalendar {
    let raw = raw.unwrap_or_default();
    ContributionCalendar {
        total_contributions: count(raw.total_contributions),
        weeks: raw
            .weeks
            .unwrap_or_default()
            .into_iter()
            .map(|week| ContributionWeek {
                contribution_days: week
                    .contribution_days
                    .unwrap_or_default()
                    .into_iter()
                    .map(|day| ContributionDay {
                        color: text(day.color),
                        contribution_count: count(day.contribution_count),
                        date: text(day.date),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn normalize_pinned(raw: RawPinnedRepository) -> PinnedRepository {
    let language = raw.primary_language.unwrap_or_default();
    PinnedRepository {
        name: text(raw.name),
        description: text(raw.description),
        stargazer_count: count(raw.stargazer_count),
        fork_count: count(raw.fork_count),
        primary_language: Language {
            name: text(language.name),
            color: text(language.color),
        },
        url: text(raw.url),
    }
}

/// Flatten a provider response into an [`ActivityStatistics`] snapshot.
///
/// Fails only when the response has no usable login.
pub fn normalize(raw: RawProfile) -> Result<ActivityStatistics, ProfileError> {
    let login = raw
        .login
        .filter(|login| !login.trim().is_empty())
        .ok_or_else(|| ProfileError::MalformedInput("response has no user login".to_string()))?;

    let contributions = raw.contributions_collection.unwrap_or_default();
    let repositories = raw.repositories.unwrap_or_default();
    let owned = repositories.nodes.unwrap_or_default();

    let stats = ActivityStatistics {
        login,
        name: text(raw.name),
        avatar_url: text(raw.avatar_url),
        bio: text(raw.bio),
        total_commits: count(contributions.total_commit_contributions),
        total_pull_requests: count(contributions.total_pull_request_contributions),
        total_issues: count(contributions.total_issue_contributions),
        total_reviews: count(contributions.total_pull_request_review_contributions),
        total_stars_earned: stars_earned(&owned),
        followers: count(raw.followers.and_then(|f| f.total_count)),
        contribution_calendar: normalize_calendar(contributions.contribution_calendar),
        pinned_repositories: raw
            .pinned_items
            .and_then(|items| items.nodes)
            .unwrap_or_default()
            .into_iter()
            .map(normalize_pinned)
            .collect(),
        total_public_repositories: count(repositories.total_count),
    };

    debug!(
        "Normalized @{}: {} calendar weeks, {} pinned repos, {} stars over {} repos",
        stats.login,
        stats.contribution_calendar.weeks.len(),
        stats.pinned_repositories.len(),
        stats.total_stars_earned,
        owned.len()
    );

    Ok(stats)
}
