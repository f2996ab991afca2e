//! Configuration management
//!
//! Loads configuration from config.toml with support for:
//! - GitHub API endpoints and request timeout
//! - Server binding and CORS origin
//! - Credential database location and session lifetime
//! - Rank weights and tier table

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::RankConfigError;
use crate::rank::{RankConfig, RankEngine};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub rank: RankConfig,
}

/// GitHub API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub graphql_url: String,
    pub api_url: String,
    pub user_agent: String,
    /// Per-request timeout for the upstream call
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://api.github.com/graphql".to_string(),
            api_url: "https://api.github.com".to_string(),
            user_agent: format!("devrank/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed browser origin, or "*" for any
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// SQLite file holding sessions and GitHub credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("devrank.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 72,
            purge_interval_secs: 600,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }

    pub fn purge_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.purge_interval_secs.max(1))
    }
}

impl Config {
    /// Load from $DEVRANK_CONFIG, ./config.toml, or the embedded defaults
    pub fn load() -> Result<Self> {
        match std::env::var("DEVRANK_CONFIG") {
            Ok(path) if !path.is_empty() => Self::load_from(path),
            _ => Self::load_from("config.toml"),
        }
    }

    /// Load from specific path, then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml(&content).context("Failed to parse config file")?
        } else {
            // Use embedded default config
            Self::from_toml(DEFAULT_CONFIG).context("Failed to parse default config")?
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("DEVRANK_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("DEVRANK_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid DEVRANK_PORT value: {}", port),
            }
        }
        if let Ok(origin) = std::env::var("CORS_ORIGIN") {
            if !origin.is_empty() {
                self.server.cors_origin = origin;
            }
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = PathBuf::from(path);
            }
        }
    }

    /// Build the rank engine from the `[rank]` section
    pub fn rank_engine(&self) -> Result<RankEngine, RankConfigError> {
        RankEngine::from_config(&self.rank)
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded default config is checked by the tests below;
        // fall back to the built-in values if it ever fails to parse.
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            github: GitHubConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            rank: RankConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Tier;

    #[test]
    fn test_embedded_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.github.graphql_url, "https://api.github.com/graphql");
        assert_eq!(config.session.ttl_hours, 72);
        assert_eq!(config.rank, RankConfig::default());
    }

    #[test]
    fn test_embedded_rank_engine_matches_default() {
        let engine = Config::default().rank_engine().unwrap();
        assert_eq!(engine, RankEngine::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[server]\nhost = \"127.0.0.1\"\nport = 9000\ncors_origin = \"*\"\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, PathBuf::from("devrank.db"));
        assert_eq!(config.rank.weights.stars_earned, 4);
        assert_eq!(config.rank.tiers.len(), 7);
    }

    #[test]
    fn test_custom_rank_section() {
        let config = Config::from_toml(
            r#"
            [rank.weights]
            commits = 5

            [[rank.tiers]]
            label = "Bronze"
            min_score = 0

            [[rank.tiers]]
            label = "Gold"
            min_score = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.rank.weights.commits, 5);
        assert_eq!(config.rank.weights.pull_requests, 3);
        assert_eq!(
            config.rank.tiers,
            vec![Tier::new("Bronze", 0), Tier::new("Gold", 10)]
        );

        let engine = config.rank_engine().unwrap();
        assert_eq!(engine.rank_for_score(10).rank, "Gold");
    }

    #[test]
    fn test_invalid_tier_table_rejected() {
        let config = Config::from_toml(
            r#"
            [[rank.tiers]]
            label = "B"
            min_score = 50
            "#,
        )
        .unwrap();
        assert!(config.rank_engine().is_err());
    }

    #[test]
    fn test_session_durations() {
        let session = SessionConfig {
            ttl_hours: 2,
            purge_interval_secs: 0,
        };
        assert_eq!(session.ttl(), chrono::Duration::hours(2));
        assert_eq!(session.purge_interval(), std::time::Duration::from_secs(1));
    }
}
