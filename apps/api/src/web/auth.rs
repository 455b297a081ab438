use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::errors::AppError;
use crate::sessions::{parse_token, SESSION_COOKIE};
use crate::state::AppState;

/// The logged-in user, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
    pub token: Uuid,
}

/// Resolves the session cookie to a live session, if any.
pub async fn current_user(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<SessionUser>, AppError> {
    let Some(token) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| parse_token(cookie.value()))
    else {
        return Ok(None);
    };

    Ok(state
        .sessions
        .resolve(token)
        .await?
        .map(|username| SessionUser { username, token }))
}

/// Gate for protected pages: without a live session the browser goes to `/login`.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match current_user(&state, &jar).await? {
        Some(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        None => {
            tracing::debug!("no session for {}, redirecting to login", request.uri().path());
            Ok(Redirect::to("/login").into_response())
        }
    }
}
