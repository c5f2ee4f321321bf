//! Authenticated principal extractor
//!
//! Handlers that take a `CurrentUser` argument are only reachable with a live
//! session; everyone else is redirected to the login page.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;

use crate::store::User;
use crate::AppState;

use super::session::{cookie_value, Session, SESSION_COOKIE};

/// The logged-in user and the session they arrived with
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let to_login = || Redirect::to("/login");

        let value = cookie_value(&parts.headers, SESSION_COOKIE).ok_or_else(to_login)?;
        let session = state.sessions.resolve(value).await.ok_or_else(to_login)?;

        match state.credentials.user(&session.user_id).await {
            Ok(Some(user)) => Ok(Self { user, session }),
            Ok(None) => {
                tracing::debug!("Session {} points at a missing user", session.id);
                state.sessions.revoke(&session.id).await;
                Err(to_login())
            }
            Err(e) => {
                tracing::error!("Failed to load session user: {}", e);
                Err(to_login())
            }
        }
    }
}
