//! Storage interfaces for accounts and their conversations
//!
//! Route handlers only see the repository traits, so the in-memory store can
//! be replaced by a persistent backend without touching them.

mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::{Conversation, Reply};

pub use memory::InMemoryStore;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account; the password must already be hashed
    async fn create_user(&self, username: &str, password_hash: String) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// A user's conversations in the order they were started
    async fn list(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError>;

    async fn get(&self, user_id: &str, conversation_id: &str)
        -> Result<Option<Conversation>, StoreError>;

    /// Append a prompt/reply pair to `conversation_id`, or start a new
    /// conversation when it is absent or unknown
    async fn append_exchange(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
        prompt: &str,
        reply: Reply,
    ) -> Result<Conversation, StoreError>;

    /// Remove a conversation; unknown ids are ignored
    async fn delete(&self, user_id: &str, conversation_id: &str) -> Result<(), StoreError>;
}
