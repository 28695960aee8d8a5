use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::SessionUser,
    error::AppError,
    state::AppState,
    views::{escape, found, render},
};

use super::dto::ProjectForm;
use super::repo_types::{NewProject, Project};
use super::services::project_cards;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/projects/new", get(new_project_page))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route(
        "/projects",
        post(create_project).fallback(projects_method_not_allowed),
    )
}

/// Other methods on `/projects`; the session is checked first so anonymous callers go to `/login`.
pub async fn projects_method_not_allowed(_session: SessionUser) -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST")]).into_response()
}

#[instrument(skip(state, session), fields(email = %session.user.email))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Html<String>, AppError> {
    let projects = Project::list_by_owner(&state.store, &session.user.email).await;
    let cards = project_cards(&projects);
    let user_name = escape(&session.user.name);
    render(
        &state,
        "dashboard.html",
        &[("{{userName}}", &user_name), ("{{projects}}", &cards)],
    )
    .await
}

#[instrument(skip(state, _session))]
pub async fn new_project_page(
    State(state): State<AppState>,
    _session: SessionUser,
) -> Result<Html<String>, AppError> {
    render(&state, "project_form.html", &[]).await
}

#[instrument(skip(state, session, form), fields(email = %session.user.email))]
pub async fn create_project(
    State(state): State<AppState>,
    session: SessionUser,
    Form(form): Form<ProjectForm>,
) -> Response {
    let new = NewProject {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        tech_stack: form.tech_stack.trim().to_string(),
    };

    let project = Project::create(&state.store, &session.user, new).await;
    info!(project_id = %project.id, owner = %project.owner, title = %project.title, "project created");
    found("/dashboard")
}
