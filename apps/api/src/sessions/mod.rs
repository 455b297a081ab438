//! Browser sessions: an opaque token mapped to a username until it expires.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session for `username` that lives for `ttl`.
    async fn create(&self, username: &str, ttl: Duration) -> Result<Uuid>;

    /// Returns the session's username, or `None` if unknown or expired.
    async fn resolve(&self, token: Uuid) -> Result<Option<String>>;

    async fn destroy(&self, token: Uuid) -> Result<()>;

    /// Deletes every expired session, returning how many were removed.
    async fn prune_expired(&self) -> Result<u64>;
}

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, username: &str, ttl: Duration) -> Result<Uuid> {
        // Sessions that never log out are swept here.
        self.prune_expired().await?;

        let token = Uuid::new_v4();
        sqlx::query("INSERT INTO sessions (token, username, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(username)
            .bind(Utc::now() + ttl)
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    async fn resolve(&self, token: Uuid) -> Result<Option<String>> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT username FROM sessions WHERE token = $1 AND expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn destroy(&self, token: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Parses the cookie value; anything that is not a UUID is no session at all.
pub fn parse_token(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
