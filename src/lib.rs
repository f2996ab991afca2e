//! DevRank - rank developers by their GitHub activity
//!
//! A profile is fetched from GitHub, normalized into flat activity
//! statistics and scored against an ordered tier table.
//!
//! # How it works
//!
//! 1. The activity source fetches the raw GraphQL profile for a login
//! 2. The normalizer flattens it, treating absent counts as zero
//! 3. The rank engine computes a weighted score and places it in a tier
//! 4. The server exposes the ranked profile to authenticated sessions
//!
//! # Scoring
//!
//! - score = 2·commits + 3·PRs + 1·issues + 2·reviews + 4·stars + 1·followers
//! - Tiers: C (0), B (50), B+ (100), A (200), A+ (500), S (1000), S+ (2000)
//! - Weights and tiers are configurable in `[rank]` of config.toml

pub mod config;
pub mod error;
pub mod github;
pub mod profile;
pub mod rank;
pub mod server;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{ProfileError, RankConfigError};
pub use github::{ActivitySource, ContributionWindow, GitHubClient, RateLimitInfo};
pub use profile::{normalize, ActivityStatistics, RawProfile};
pub use rank::{RankEngine, RankResult, RankTable, ScoreWeights, Tier};
pub use service::{ProfileService, RankedProfile};
pub use storage::{CredentialStore, GithubCredentials};
