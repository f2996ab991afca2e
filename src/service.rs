//! Ranked profile service
//!
//! Fetch → normalize → rank. A failed fetch or a malformed response stops
//! the pipeline; no rank is produced without a complete snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProfileError;
use crate::github::ActivitySource;
use crate::profile::{normalize, ActivityStatistics};
use crate::rank::{RankEngine, RankResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProfile {
    pub profile: ActivityStatistics,
    pub rank: RankResult,
}

#[derive(Clone)]
pub struct ProfileService {
    source: Arc<dyn ActivitySource>,
    engine: Arc<RankEngine>,
}

impl ProfileService {
    pub fn new(source: Arc<dyn ActivitySource>, engine: RankEngine) -> Self {
        Self {
            source,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &RankEngine {
        &self.engine
    }

    pub async fn ranked_profile(
        &self,
        username: &str,
        token: &str,
    ) -> Result<RankedProfile, ProfileError> {
        let raw = self
            .source
            .fetch_profile(username, token)
            .await
            .map_err(|e| {
                warn!("Profile fetch for @{} failed: {}", username, e);
                e
            })?;

        let profile = normalize(raw)?;
        let rank = self.engine.compute_rank(&profile);

        info!(
            "Ranked @{}: {} (score {}, {}% toward {})",
            profile.login,
            rank.rank,
            rank.score,
            rank.progress_percent,
            rank.next_rank.as_deref().unwrap_or("max")
        );

        Ok(RankedProfile { profile, rank })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        RawContributions, RawProfile, RawRepositories, RawRepositoryStars, RawTotalCount,
    };
    use async_trait::async_trait;

    struct FixedSource(RawProfile);

    #[async_trait]
    impl ActivitySource for FixedSource {
        async fn fetch_profile(&self, _: &str, _: &str) -> Result<RawProfile, ProfileError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ActivitySource for FailingSource {
        async fn fetch_profile(&self, _: &str, _: &str) -> Result<RawProfile, ProfileError> {
            Err(ProfileError::Status {
                status: 401,
                body: "Bad credentials".to_string(),
            })
        }
    }

    fn raw_profile() -> RawProfile {
        RawProfile {
            login: Some("octocat".to_string()),
            followers: Some(RawTotalCount {
                total_count: Some(3),
            }),
            contributions_collection: Some(RawContributions {
                total_commit_contributions: Some(10),
                total_pull_request_contributions: Some(5),
                total_issue_contributions: Some(2),
                ..Default::default()
            }),
            repositories: Some(RawRepositories {
                total_count: Some(2),
                nodes: Some(vec![
                    RawRepositoryStars {
                        stargazer_count: Some(15),
                    },
                    RawRepositoryStars {
                        stargazer_count: Some(5),
                    },
                ]),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ranked_profile() {
        let service =
            ProfileService::new(Arc::new(FixedSource(raw_profile())), RankEngine::default());
        let ranked = service.ranked_profile("octocat", "token").await.unwrap();

        assert_eq!(ranked.profile.total_stars_earned, 20);
        assert_eq!(ranked.rank.score, 120);
        assert_eq!(ranked.rank.rank, "B+");
        assert_eq!(ranked.rank.progress_percent, 20);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_rank() {
        let service = ProfileService::new(Arc::new(FailingSource), RankEngine::default());
        let err = service.ranked_profile("octocat", "bad").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(matches!(err, ProfileError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_malformed_response_yields_no_rank() {
        let service = ProfileService::new(
            Arc::new(FixedSource(RawProfile::default())),
            RankEngine::default(),
        );
        let err = service.ranked_profile("octocat", "token").await.unwrap_err();
        assert!(matches!(err, ProfileError::MalformedInput(_)));
    }
}
