use askama::Template;
use axum::response::Html;

use crate::errors::AppError;
use crate::models::match_record::{MatchRecord, MatchResult};

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "matchresume.html")]
pub struct MatchPage {
    pub username: String,
    pub message: Option<String>,
    pub results: Vec<MatchResult>,
}

#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryPage {
    pub username: String,
    pub records: Vec<MatchRecord>,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
