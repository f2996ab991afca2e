//! Rank engine
//!
//! Scores an activity snapshot with fixed integer weights, then walks an
//! ordered tier table from the top down to find the highest tier the score
//! reaches. Progress is the integer percentage of the way from the current
//! tier's minimum to the next tier's minimum.

use serde::{Deserialize, Serialize};

use crate::error::RankConfigError;
use crate::profile::ActivityStatistics;

/// Default tier table, lowest first.
pub const DEFAULT_TIERS: [(&str, u64); 7] = [
    ("C", 0),
    ("B", 50),
    ("B+", 100),
    ("A", 200),
    ("A+", 500),
    ("S", 1000),
    ("S+", 2000),
];

// ============================================================================
// WEIGHTS
// ============================================================================

/// Integer weight applied to each activity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub commits: u64,
    pub pull_requests: u64,
    pub issues: u64,
    pub reviews: u64,
    pub stars_earned: u64,
    pub followers: u64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            commits: 2,
            pull_requests: 3,
            issues: 1,
            reviews: 2,
            stars_earned: 4,
            followers: 1,
        }
    }
}

impl ScoreWeights {
    /// Weighted sum of all counts, saturating at `u64::MAX`.
    pub fn score(&self, stats: &ActivityStatistics) -> u64 {
        [
            (stats.total_commits, self.commits),
            (stats.total_pull_requests, self.pull_requests),
            (stats.total_issues, self.issues),
            (stats.total_reviews, self.reviews),
            (stats.total_stars_earned, self.stars_earned),
            (stats.followers, self.followers),
        ]
        .iter()
        .fold(0u64, |total, &(count, weight)| {
            total.saturating_add(count.saturating_mul(weight))
        })
    }
}

// ============================================================================
// TIER TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub label: String,
    pub min_score: u64,
}

impl Tier {
    pub fn new(label: impl Into<String>, min_score: u64) -> Self {
        Self {
            label: label.into(),
            min_score,
        }
    }
}

pub fn default_tiers() -> Vec<Tier> {
    DEFAULT_TIERS
        .iter()
        .map(|&(label, min_score)| Tier::new(label, min_score))
        .collect()
}

/// Ordered tier table. Always non-empty, starts at 0 and strictly ascends,
/// so every score maps to exactly one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankTable {
    tiers: Vec<Tier>,
}

impl RankTable {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, RankConfigError> {
        let first = tiers.first().ok_or(RankConfigError::Empty)?;
        if first.min_score != 0 {
            return Err(RankConfigError::NonZeroBase {
                label: first.label.clone(),
                min_score: first.min_score,
            });
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.label.trim().is_empty() {
                return Err(RankConfigError::BlankLabel(i));
            }
            if tiers[..i].iter().any(|t| t.label == tier.label) {
                return Err(RankConfigError::DuplicateLabel(tier.label.clone()));
            }
            if i > 0 && tier.min_score <= tiers[i - 1].min_score {
                return Err(RankConfigError::NotAscending {
                    label: tier.label.clone(),
                    min_score: tier.min_score,
                    previous: tiers[i - 1].min_score,
                });
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn highest(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Index of the highest tier whose minimum is at or below `score`.
    fn position(&self, score: u64) -> usize {
        self.tiers
            .iter()
            .rposition(|tier| tier.min_score <= score)
            .unwrap_or(0)
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// `[rank]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<Tier>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            tiers: default_tiers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankResult {
    pub rank: String,
    pub score: u64,
    /// `None` at the top tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_rank: Option<String>,
    /// 0 at the top tier.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub next_rank_threshold: u64,
    pub progress_percent: u8,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl RankResult {
    pub fn is_max_tier(&self) -> bool {
        self.next_rank.is_none()
    }

    /// Points still needed to reach the next tier.
    pub fn points_to_next(&self) -> Option<u64> {
        self.next_rank
            .as_ref()
            .map(|_| self.next_rank_threshold.saturating_sub(self.score))
    }
}

/// Integer percentage of `score` between two consecutive tier minimums,
/// clamped to `[0, 100]`.
pub fn progress_percent(score: u64, current_min: u64, next_min: u64) -> u8 {
    let span = u128::from(next_min.saturating_sub(current_min));
    let gained = u128::from(score.saturating_sub(current_min));
    let percent = (gained * 100).checked_div(span).unwrap_or(100);
    percent.min(100) as u8
}

/// Stateless scorer. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankEngine {
    weights: ScoreWeights,
    table: RankTable,
}

impl RankEngine {
    pub fn new(weights: ScoreWeights, table: RankTable) -> Self {
        Self { weights, table }
    }

    pub fn from_config(config: &RankConfig) -> Result<Self, RankConfigError> {
        Ok(Self::new(config.weights, RankTable::new(config.tiers.clone())?))
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }

    pub fn score(&self, stats: &ActivityStatistics) -> u64 {
        self.weights.score(stats)
    }

    pub fn compute_rank(&self, stats: &ActivityStatistics) -> RankResult {
        self.rank_for_score(self.score(stats))
    }

    pub fn rank_for_score(&self, score: u64) -> RankResult {
        let index = self.table.position(score);
        let current = &self.table.tiers[index];

        match self.table.tiers.get(index + 1) {
            Some(next) => RankResult {
                rank: current.label.clone(),
                score,
                next_rank: Some(next.label.clone()),
                next_rank_threshold: next.min_score,
                progress_percent: progress_percent(score, current.min_score, next.min_score),
            },
            None => RankResult {
                rank: current.label.clone(),
                score,
                next_rank: None,
                next_rank_threshold: 0,
                progress_percent: 100,
            },
        }
    }
}
