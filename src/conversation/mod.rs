//! Conversation types and state management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters of the opening prompt used as a title
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// An assistant reply produced for a single prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Start a conversation seeded with its first prompt/reply pair
    pub fn start(prompt: &str, reply: Reply) -> Self {
        let mut conversation = Self {
            id: Uuid::new_v4().to_string(),
            title: derive_title(prompt),
            messages: Vec::with_capacity(2),
            created_at: Utc::now(),
        };
        conversation.push_exchange(prompt, reply);
        conversation
    }

    /// Append a user message followed by the assistant's reply
    pub fn push_exchange(&mut self, prompt: &str, reply: Reply) {
        self.messages.push(Message {
            role: Role::User,
            content: prompt.to_string(),
            timestamp: Utc::now(),
        });
        self.messages.push(Message {
            role: Role::Assistant,
            content: reply.content,
            timestamp: reply.timestamp,
        });
    }
}

/// First `TITLE_MAX_CHARS` characters of the prompt, with "..." when cut
pub fn derive_title(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
