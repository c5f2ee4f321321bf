//! Login, logout and registration

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::session::{clear_cookie, cookie_value, set_cookie, SESSION_COOKIE};
use crate::auth::CurrentUser;
use crate::views::{self, Flash, Notice};
use crate::AppState;

use super::AppError;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Render a form page, consuming any notice queued by a redirect
fn with_notice(headers: &HeaderMap, render: fn(&[Flash]) -> Html<String>) -> Response {
    match Notice::from_headers(headers) {
        Some(notice) => (
            AppendHeaders([(SET_COOKIE, Notice::clear_cookie())]),
            render(&[notice.flash()]),
        )
            .into_response(),
        None => render(&[]).into_response(),
    }
}

pub async fn login_form(headers: HeaderMap) -> Response {
    with_notice(&headers, views::login_page)
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match state
        .credentials
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            // A fresh login replaces whatever session this browser held
            if let Some(previous) = cookie_value(&headers, SESSION_COOKIE) {
                if let Some(session) = state.sessions.resolve(previous).await {
                    state.sessions.revoke(&session.id).await;
                }
            }

            let value = state.sessions.create(&user.id).await;
            tracing::info!(
                "User {} logged in ({} active session(s))",
                user.username,
                state.sessions.active().await
            );
            Ok((
                AppendHeaders([
                    (SET_COOKIE, set_cookie(SESSION_COOKIE, &value)),
                    (SET_COOKIE, Notice::clear_cookie()),
                ]),
                Redirect::to("/profile"),
            )
                .into_response())
        }
        Err(e) if e.is_user_facing() => {
            tracing::warn!("Failed login attempt for {:?}", form.username);
            Ok(views::login_page(&[Flash::error(e.to_string())]).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>, current: CurrentUser) -> Response {
    state.sessions.revoke(&current.session.id).await;
    tracing::info!("User {} logged out", current.user.username);

    (
        AppendHeaders([
            (SET_COOKIE, clear_cookie(SESSION_COOKIE)),
            (SET_COOKIE, Notice::LoggedOut.set_cookie()),
        ]),
        Redirect::to("/login"),
    )
        .into_response()
}

pub async fn register_form(headers: HeaderMap) -> Response {
    with_notice(&headers, views::register_page)
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match state
        .credentials
        .register(&form.username, &form.password)
        .await
    {
        Ok(_) => Ok((
            AppendHeaders([(SET_COOKIE, Notice::Registered.set_cookie())]),
            Redirect::to("/login"),
        )
            .into_response()),
        Err(e) if e.is_user_facing() => {
            tracing::debug!("Registration rejected for {:?}: {}", form.username, e);
            Ok(views::register_page(&[Flash::error(e.to_string())]).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
