//! Server-side pages: templates are plain HTML files with literal placeholders
//! (`<!--ERROR-->`, `{{userName}}`, ...) substituted per request.

use std::path::Path;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::instrument;

use crate::{error::AppError, state::AppState};

pub const ERROR_SLOT: &str = "<!--ERROR-->";

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub async fn load_template(dir: &Path, name: &str) -> Result<String, AppError> {
    tokio::fs::read_to_string(dir.join(name))
        .await
        .map_err(|source| AppError::Template {
            name: name.to_string(),
            source,
        })
}

/// Loads `name` and replaces every occurrence of each placeholder. Values are inserted verbatim.
pub async fn render(
    state: &AppState,
    name: &str,
    slots: &[(&str, &str)],
) -> Result<Html<String>, AppError> {
    let mut page = load_template(&state.config.template_dir, name).await?;
    for (placeholder, value) in slots {
        page = page.replace(placeholder, value);
    }
    Ok(Html(page))
}

/// Renders a form page with `message` shown in its error slot.
pub async fn render_with_error(
    state: &AppState,
    name: &str,
    message: &str,
) -> Result<Html<String>, AppError> {
    let banner = format!("<div class=\"error\">{}</div>", escape(message));
    render(state, name, &[(ERROR_SLOT, &banner)]).await
}

/// Plain `302 Found`.
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// `302 Found` that also sets a cookie.
pub fn found_with_cookie(location: &'static str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "index.html", &[]).await
}
