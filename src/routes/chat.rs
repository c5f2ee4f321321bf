//! Conversation pages

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::views::{self, ChatView, Flash};
use crate::AppState;

use super::AppError;

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub chat_id: Option<String>,
}

impl ChatQuery {
    fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

/// Chat page with `chat_id` selected; unknown ids select nothing
async fn render(
    state: &AppState,
    current: &CurrentUser,
    chat_id: Option<&str>,
    flashes: &[Flash],
) -> Result<Html<String>, AppError> {
    let user_id = &current.user.id;
    let conversations = state.conversations.list(user_id).await?;
    let selected = match chat_id {
        Some(id) => state.conversations.get(user_id, id).await?,
        None => None,
    };

    Ok(views::chat_page(&ChatView {
        username: &current.user.username,
        conversations: &conversations,
        selected: selected.as_ref(),
        suggestions: &state.prompts.suggestions.questions,
        flashes,
    }))
}

pub async fn show(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ChatQuery>,
) -> Result<Html<String>, AppError> {
    render(&state, &current, query.chat_id(), &[]).await
}

pub async fn submit(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ChatQuery>,
    Form(form): Form<PromptForm>,
) -> Result<Response, AppError> {
    let chat_id = query.chat_id();

    if form.prompt.is_empty() {
        return Ok(render(&state, &current, chat_id, &[]).await?.into_response());
    }

    let reply = match state.replies.generate(&form.prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Reply generation failed: {}", e);
            let flash = Flash::error(format!("The assistant could not answer: {}", e));
            return Ok(render(&state, &current, chat_id, &[flash])
                .await?
                .into_response());
        }
    };

    let conversation = state
        .conversations
        .append_exchange(&current.user.id, chat_id, &form.prompt, reply)
        .await?;

    tracing::debug!(
        "Appended exchange to conversation {} ({} messages)",
        conversation.id,
        conversation.messages.len()
    );

    Ok(Redirect::to(&format!("/chat?chat_id={}", conversation.id)).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(chat_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.conversations.delete(&current.user.id, &chat_id).await?;
    tracing::info!("User {} deleted conversation {}", current.user.username, chat_id);
    Ok(Redirect::to("/chat"))
}
