//! Accounts: registration and credential checks over a pluggable store.

pub mod password;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::account::Account;

use self::password::{hash, verify};

/// Persistence for accounts. Carried in `AppState` as `Arc<dyn AccountStore>`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<Account>>;

    /// Inserts a new account. Returns `None` when the username is already taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<Account>>;
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find(&self, username: &str) -> Result<Option<Account>> {
        Ok(
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<Option<Account>> {
        Ok(sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?)
    }
}

/// Usernames are compared trimmed and lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub async fn register(
    store: &dyn AccountStore,
    username: &str,
    password: &str,
) -> Result<Account, AppError> {
    let username = normalize_username(username);
    if store.find(&username).await?.is_some() {
        return Err(AppError::AlreadyExists);
    }

    let hashed = hash(password.to_string()).await?;
    // A concurrent registration can still win the race; the insert reports it.
    let account = store
        .insert(&username, &hashed)
        .await?
        .ok_or(AppError::AlreadyExists)?;

    info!("Registered account {username}");
    Ok(account)
}

/// Unknown users and wrong passwords both yield `InvalidCredentials`.
pub async fn authenticate(
    store: &dyn AccountStore,
    username: &str,
    password: &str,
) -> Result<Account, AppError> {
    let username = normalize_username(username);
    let Some(account) = store.find(&username).await? else {
        return Err(AppError::InvalidCredentials);
    };
    if verify(password.to_string(), account.password_hash.clone()).await? {
        Ok(account)
    } else {
        Err(AppError::InvalidCredentials)
    }
}
