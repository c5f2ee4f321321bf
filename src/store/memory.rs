//! Process-local store; everything is lost on restart

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::conversation::{Conversation, Reply};

use super::{ConversationRepository, StoreError, User, UserRepository};

/// A user record with its conversations embedded
#[derive(Debug)]
struct Account {
    user: User,
    conversations: Vec<Conversation>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub async fn user_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, username: &str, password_hash: String) -> Result<User, StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.user.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
        };
        accounts.insert(
            user.id.clone(),
            Account {
                user: user.clone(),
                conversations: Vec::new(),
            },
        );

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.user.username == username)
            .map(|a| a.user.clone()))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user_id).map(|a| a.user.clone()))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        Ok(account.conversations.clone())
    }

    async fn get(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Option<Conversation>, StoreError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        Ok(account
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned())
    }

    async fn append_exchange(
        &self,
        user_id: &str,
        conversation_id: Option<&str>,
        prompt: &str,
        reply: Reply,
    ) -> Result<Conversation, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        let existing = conversation_id.and_then(|id| {
            account
                .conversations
                .iter_mut()
                .find(|c| c.id == id)
        });

        match existing {
            Some(conversation) => {
                conversation.push_exchange(prompt, reply);
                Ok(conversation.clone())
            }
            None => {
                let conversation = Conversation::start(prompt, reply);
                account.conversations.push(conversation.clone());
                Ok(conversation)
            }
        }
    }

    async fn delete(&self, user_id: &str, conversation_id: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        account.conversations.retain(|c| c.id != conversation_id);
        Ok(())
    }
}
