//! Local storage for sessions and linked GitHub credentials
//!
//! The identity layer issues opaque bearer sessions and records each user's
//! GitHub login and access token here. Only a SHA-256 digest of a session
//! token is ever written to disk.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS github_credentials (
    user_id INTEGER PRIMARY KEY,
    github_username TEXT NOT NULL DEFAULT '',
    github_token TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions (expires_at);
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCredentials {
    pub user_id: i64,
    pub github_username: String,
    #[serde(skip_serializing, default)]
    pub github_token: String,
    pub updated_at: DateTime<Utc>,
}

impl GithubCredentials {
    /// Both the login and the token are needed to query GitHub.
    pub fn is_complete(&self) -> bool {
        !self.github_username.is_empty() && !self.github_token.is_empty()
    }
}

/// Fixed-width UTC timestamps so that string comparison orders them.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn query_credentials(conn: &Connection, user_id: i64) -> Result<Option<GithubCredentials>> {
    let credentials = conn
        .query_row(
            "SELECT user_id, github_username, github_token, updated_at
             FROM github_credentials WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(GithubCredentials {
                    user_id: row.get(0)?,
                    github_username: row.get(1)?,
                    github_token: row.get(2)?,
                    updated_at: parse_timestamp(row, 3)?,
                })
            },
        )
        .optional()?;
    Ok(credentials)
}

pub struct CredentialStore {
    conn: Mutex<Connection>,
}

impl CredentialStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.run_migrations()?;
        info!("Credential store opened at {}", path.display());
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.run_migrations()?;
        Ok(storage)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(SCHEMA)
            .context("Failed to apply credential store schema")
    }

    // ========================================================================
    // GITHUB CREDENTIALS
    // ========================================================================

    /// Set the GitHub login and/or token for a user. A blank or missing
    /// field keeps whatever is already stored.
    pub fn update_github_credentials(
        &self,
        user_id: i64,
        github_username: Option<&str>,
        github_token: Option<&str>,
    ) -> Result<GithubCredentials> {
        let username = non_blank(github_username);
        let token = non_blank(github_token);
        if username.is_none() && token.is_none() {
            anyhow::bail!("GitHub username or token required");
        }

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO github_credentials (user_id, github_username, github_token, updated_at)
             VALUES (?1, COALESCE(?2, ''), COALESCE(?3, ''), ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                github_username = COALESCE(?2, github_username),
                github_token = COALESCE(?3, github_token),
                updated_at = ?4",
            params![user_id, username, token, timestamp(Utc::now())],
        )?;

        debug!("Updated GitHub credentials for user {}", user_id);
        query_credentials(&conn, user_id)?
            .context("GitHub credentials missing after update")
    }

    pub fn github_credentials(&self, user_id: i64) -> Result<Option<GithubCredentials>> {
        let conn = self.conn.lock();
        query_credentials(&conn, user_id)
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Issue a new bearer token for `user_id`, valid for `ttl`.
    pub fn create_session(&self, user_id: i64, ttl: chrono::Duration) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                hash_token(&token),
                user_id,
                timestamp(now),
                timestamp(now + ttl)
            ],
        )?;

        debug!("Created session for user {}", user_id);
        Ok(token)
    }

    /// User id behind an unexpired session token.
    pub fn resolve_session(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.conn.lock();
        let user_id = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
                params![hash_token(token), timestamp(Utc::now())],
                |row| row.get(0),
            )
            .optional()?;
        Ok(user_id)
    }

    pub fn revoke_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![hash_token(token)],
        )?;
        Ok(deleted > 0)
    }

    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![timestamp(Utc::now())],
        )?;
        Ok(deleted)
    }

    pub fn active_session_count(&self) -> Result<u32> {
        let conn = self.conn.lock();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE expires_at > ?1",
            params![timestamp(Utc::now())],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
