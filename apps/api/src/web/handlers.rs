//! Axum route handlers for the matcher pages.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::accounts::{self, normalize_username};
use crate::errors::AppError;
use crate::extract::extract;
use crate::matching::{rank, Candidate};
use crate::models::match_record::MatchRecord;
use crate::sessions::SESSION_COOKIE;
use crate::state::AppState;
use crate::web::auth::{current_user, SessionUser};
use crate::web::templates::{render, HistoryPage, LoginPage, MatchPage, RegisterPage};
use crate::web::uploads::{read_match_upload, save_uploads};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Turns a form-level error into the message shown on the page; anything else propagates.
fn form_message(err: AppError) -> Result<String, AppError> {
    match err.form_message() {
        Some(message) => Ok(message.to_string()),
        None => Err(err),
    }
}

/// GET /
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Result<Redirect, AppError> {
    if current_user(&state, &jar).await?.is_some() {
        Ok(Redirect::to("/matchresume"))
    } else {
        Ok(Redirect::to("/login"))
    }
}

/// GET /register
pub async fn register_form() -> Result<Html<String>, AppError> {
    render(&RegisterPage { message: None })
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match accounts::register(state.accounts.as_ref(), &form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(err) => {
            let message = form_message(err)?;
            Ok(render(&RegisterPage {
                message: Some(message),
            })?
            .into_response())
        }
    }
}

/// GET /login
pub async fn login_form() -> Result<Html<String>, AppError> {
    render(&LoginPage { message: None })
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match accounts::authenticate(state.accounts.as_ref(), &form.username, &form.password).await {
        Ok(account) => {
            let token = state
                .sessions
                .create(&account.username, state.config.session_ttl())
                .await?;
            info!("User {} logged in", account.username);

            let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            Ok((jar.add(cookie), Redirect::to("/matchresume")).into_response())
        }
        Err(err) => {
            let message = form_message(err)?;
            warn!(
                "Failed login attempt for {}",
                normalize_username(&form.username)
            );
            Ok(render(&LoginPage {
                message: Some(message),
            })?
            .into_response())
        }
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(user) = current_user(&state, &jar).await? {
        state.sessions.destroy(user.token).await?;
        info!("User {} logged out", user.username);
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/login")))
}

/// GET /matchresume
pub async fn match_form(Extension(user): Extension<SessionUser>) -> Result<Html<String>, AppError> {
    render(&MatchPage {
        username: user.username,
        message: None,
        results: vec![],
    })
}

/// POST /matcher
///
/// Saves every upload first, then extracts each saved file, ranks the texts
/// against the job description and records the outcome in the user's history.
pub async fn matcher(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let upload = read_match_upload(multipart).await?;
    let saved = save_uploads(Path::new(&state.config.upload_dir), &upload.resumes).await?;

    let mut candidates = Vec::with_capacity(saved.len());
    for resume in saved {
        let text = extract(&resume.path).await?;
        candidates.push(Candidate::new(resume.file_name, text));
    }

    let results = match rank(&upload.job_description, &candidates) {
        Ok(results) => results,
        Err(err) => {
            let message = form_message(err)?;
            return render(&MatchPage {
                username: user.username,
                message: Some(message),
                results: vec![],
            });
        }
    };

    info!(
        "Ranked {} resumes for {}; top score {:.2}",
        candidates.len(),
        user.username,
        results.first().map(|r| r.similarity).unwrap_or_default()
    );

    let record = MatchRecord::new(&user.username, &upload.job_description, results.clone());
    if let Err(e) = state.history.append(&record).await {
        error!("Failed to store match record for {}: {e:?}", user.username);
    }

    render(&MatchPage {
        username: user.username,
        message: Some("Top matching resumes:".to_string()),
        results,
    })
}

/// GET /history
pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, AppError> {
    let records = state.history.list_for(&user.username).await?;
    render(&HistoryPage {
        username: user.username,
        records,
    })
}
