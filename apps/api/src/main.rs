mod accounts;
mod config;
mod db;
mod errors;
mod extract;
mod history;
mod matching;
mod models;
mod routes;
mod sessions;
mod state;
#[cfg(test)]
mod testing;
mod web;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::PgAccountStore;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::history::PgHistoryStore;
use crate::routes::build_router;
use crate::sessions::{PgSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Uploads land here before text extraction
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory '{}'", config.upload_dir))?;
    info!("Upload directory: {}", config.upload_dir);

    let sessions = PgSessionStore::new(db.clone());
    let pruned = sessions.prune_expired().await?;
    info!("Pruned {pruned} expired sessions");

    // Build app state
    let state = AppState {
        accounts: Arc::new(PgAccountStore::new(db.clone())),
        sessions: Arc::new(sessions),
        history: Arc::new(PgHistoryStore::new(db)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
