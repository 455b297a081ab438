//! In-memory store doubles used by unit and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::accounts::AccountStore;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::models::account::Account;
use crate::models::match_record::MatchRecord;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find(&self, username: &str) -> Result<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(username).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<Account>> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(username) {
            return Ok(None);
        }
        let account = Account {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        accounts.insert(username.to_string(), account.clone());
        Ok(Some(account))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, (String, DateTime<Utc>)>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, username: &str, ttl: Duration) -> Result<Uuid> {
        let token = Uuid::new_v4();
        self.sessions
            .lock()
            .unwrap()
            .insert(token, (username.to_string(), Utc::now() + ttl));
        Ok(token)
    }

    async fn resolve(&self, token: Uuid) -> Result<Option<String>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(&token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(username, _)| username.clone()))
    }

    async fn destroy(&self, token: Uuid) -> Result<()> {
        self.sessions.lock().unwrap().remove(&token);
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<MatchRecord>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: &MatchRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_for(&self, username: &str) -> Result<Vec<MatchRecord>> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.username == username)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}

/// History backend that is always down.
pub struct FailingHistoryStore;

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn append(&self, _record: &MatchRecord) -> Result<()> {
        anyhow::bail!("history backend unavailable")
    }

    async fn list_for(&self, _username: &str) -> Result<Vec<MatchRecord>> {
        anyhow::bail!("history backend unavailable")
    }
}

pub fn test_config(upload_dir: &str) -> Config {
    Config {
        database_url: "postgres://localhost/matcher_test".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        upload_dir: upload_dir.to_string(),
        session_ttl_hours: 1,
        max_upload_mb: 16,
    }
}

/// App state wired to fresh in-memory stores.
pub fn test_state(upload_dir: &str) -> AppState {
    AppState {
        accounts: Arc::new(MemoryAccountStore::default()),
        sessions: Arc::new(MemorySessionStore::default()),
        history: Arc::new(MemoryHistoryStore::default()),
        config: test_config(upload_dir),
    }
}
