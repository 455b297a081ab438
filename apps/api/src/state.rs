use std::sync::Arc;

use crate::accounts::AccountStore;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub history: Arc<dyn HistoryStore>,
    pub config: Config,
}
