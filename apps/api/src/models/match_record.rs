use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One ranked resume inside a match record. `similarity` is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume_name: String,
    pub similarity: f64,
}

/// A persisted ranking run. Results are sorted descending and hold at most five entries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRecord {
    pub id: Uuid,
    pub username: String,
    pub job_description: String,
    pub results: Json<Vec<MatchResult>>,
    #[sqlx(rename = "created_at")]
    pub timestamp: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(username: &str, job_description: &str, results: Vec<MatchResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            job_description: job_description.to_string(),
            results: Json(results),
            timestamp: Utc::now(),
        }
    }
}
