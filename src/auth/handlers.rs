use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        repo_types::{NewUser, Session, User},
        services::{
            cleared_session_cookie, hash_password, normalize_email,
            session_cookie, session_ids, verify_password,
        },
    },
    error::AppError,
    state::AppState,
    views::{found_with_cookie, render, render_with_error},
};

pub(crate) const ALL_FIELDS_REQUIRED: &str = "All fields required.";
pub(crate) const EMAIL_TAKEN: &str = "Email already registered.";
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip(state))]
pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "register.html", &[]).await
}

#[instrument(skip(state))]
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "login.html", &[]).await
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim().to_string();
    let email = normalize_email(&form.email);
    let password = form.password.trim().to_string();

    // Later checks override earlier ones, so a taken email always reports as taken.
    let mut problem = None;
    if name.is_empty() || email.is_empty() || password.is_empty() {
        problem = Some(ALL_FIELDS_REQUIRED);
    }
    if User::find_by_email(&state.store, &email).await.is_some() {
        problem = Some(EMAIL_TAKEN);
    }
    if let Some(message) = problem {
        warn!(%email, reason = message, "registration rejected");
        return Ok(render_with_error(&state, "register.html", message)
            .await?
            .into_response());
    }

    let password_hash = hash_password(&password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e)
    })?;

    let user = match User::create(
        &state.store,
        NewUser {
            name,
            email,
            password_hash,
        },
    )
    .await
    {
        Ok(u) => u,
        Err(AppError::EmailTaken) => {
            warn!("registration lost race for email");
            return Ok(render_with_error(&state, "register.html", EMAIL_TAKEN)
                .await?
                .into_response());
        }
        Err(e) => return Err(e),
    };

    let session = Session::create(&state.store, &user.email).await;
    info!(email = %user.email, "user registered");
    Ok(found_with_cookie("/dashboard", session_cookie(&session.id)))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = normalize_email(&form.email);
    let password = form.password.trim();

    let Some(user) = User::find_by_email(&state.store, &email).await else {
        warn!(%email, "login unknown email");
        return Ok(render_with_error(&state, "login.html", INVALID_CREDENTIALS)
            .await?
            .into_response());
    };

    let ok = verify_password(password, &user.password_hash).map_err(|e| {
        error!(error = %e, %email, "verify_password failed");
        AppError::Internal(e)
    })?;
    if !ok {
        warn!(%email, "login invalid password");
        return Ok(render_with_error(&state, "login.html", INVALID_CREDENTIALS)
            .await?
            .into_response());
    }

    let session = Session::create(&state.store, &user.email).await;
    info!(email = %user.email, member_since = %user.created_at.date(), "user logged in");
    Ok(found_with_cookie("/dashboard", session_cookie(&session.id)))
}

#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut closed = 0usize;
    for id in session_ids(&headers) {
        if Session::delete(&state.store, &id).await {
            closed += 1;
        }
    }
    info!(closed, "logout");
    found_with_cookie("/", cleared_session_cookie())
}
