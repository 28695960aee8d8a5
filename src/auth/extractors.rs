use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};
use tracing::debug;

use super::repo_types::{Session, User};
use super::services::session_ids;
use crate::state::AppState;
use crate::views::found;

/// Resolves the `SESSIONID` cookie to a logged-in user; anything else bounces to `/login`.
pub struct SessionUser {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_ids(&parts.headers).into_iter().next().ok_or_else(|| {
            debug!(path = %parts.uri.path(), "no session cookie");
            found("/login")
        })?;

        let email = Session::find_email(&state.store, &session_id)
            .await
            .ok_or_else(|| {
                debug!(path = %parts.uri.path(), "unknown session");
                found("/login")
            })?;

        // A session whose email has no user record counts as logged out.
        let user = User::find_by_email(&state.store, &email)
            .await
            .ok_or_else(|| {
                debug!(%email, "session points at missing user");
                found("/login")
            })?;

        Ok(SessionUser { user })
    }
}
