pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::web::{auth::require_session, handlers};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_mb * 1024 * 1024;

    // Pages that need a logged-in user
    let protected = Router::new()
        .route("/matchresume", get(handlers::match_form))
        .route("/matcher", post(handlers::matcher))
        .route("/history", get(handlers::history))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(health::health_handler))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
