//! Server-rendered pages: session gate, form and upload handling, templates.

pub mod auth;
pub mod handlers;
pub mod templates;
pub mod uploads;
