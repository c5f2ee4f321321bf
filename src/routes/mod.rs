//! HTTP routes

mod account;
mod chat;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use thiserror::Error;

use crate::auth::{AuthError, CurrentUser};
use crate::providers::ProviderError;
use crate::store::StoreError;
use crate::views;
use crate::AppState;

/// Failures that are not the user's doing
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<!DOCTYPE html><title>Error</title><h1>Something went wrong</h1><p>{}</p>",
                views::escape(&self.to_string())
            )),
        )
            .into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn home(_current: CurrentUser) -> Redirect {
    Redirect::to("/profile")
}

async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, AppError> {
    let conversations = state.conversations.list(&current.user.id).await?;
    Ok(views::profile_page(&current, conversations.len()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/register", get(account::register_form).post(account::register))
        .route("/profile", get(profile))
        .route("/chat", get(chat::show).post(chat::submit))
        .route("/delete_chat/:chat_id", post(chat::delete))
}
