//! Match history: append-only records of every ranking run, per user.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::match_record::MatchRecord;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &MatchRecord) -> Result<()>;

    /// All records for `username`, newest first.
    async fn list_for(&self, username: &str) -> Result<Vec<MatchRecord>>;
}

pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: &MatchRecord) -> Result<()> {
        // Append-only: records are never updated.
        sqlx::query(
            r#"
            INSERT INTO match_records (id, username, job_description, results, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.job_description)
        .bind(&record.results)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        info!(
            "Stored match record {} for {} ({} results)",
            record.id,
            record.username,
            record.results.len()
        );
        Ok(())
    }

    async fn list_for(&self, username: &str) -> Result<Vec<MatchRecord>> {
        Ok(sqlx::query_as::<_, MatchRecord>(
            "SELECT * FROM match_records WHERE username = $1 ORDER BY created_at DESC",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?)
    }
}
