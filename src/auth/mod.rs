//! Accounts, credentials and login sessions
//!
//! - `password` hashes and verifies credentials
//! - `session` keeps the server-side session table and the signed cookie
//! - `extract` turns a request into the authenticated principal

pub mod extract;
pub mod password;
pub mod session;

use std::sync::Arc;
use thiserror::Error;

use crate::store::{StoreError, User, UserRepository};

pub use extract::CurrentUser;
pub use session::{SessionSigner, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username and password are required")]
    EmptyUsernameOrPassword,

    #[error("That username is already taken")]
    DuplicateUsername,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => AuthError::DuplicateUsername,
            other => AuthError::Store(other),
        }
    }
}

impl AuthError {
    /// Whether the error is the user's to fix rather than an internal fault
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::EmptyUsernameOrPassword
                | AuthError::DuplicateUsername
        )
    }
}

/// Password hashed once at startup so unknown usernames cost a full verify
const DUMMY_PASSWORD: &str = "liaotian-no-such-user";

/// Registration and credential checks on top of a user repository
pub struct Credentials {
    users: Arc<dyn UserRepository>,
    dummy_hash: String,
}

impl Credentials {
    pub fn new(users: Arc<dyn UserRepository>) -> Result<Self, AuthError> {
        Ok(Self {
            users,
            dummy_hash: password::hash_password(DUMMY_PASSWORD)?,
        })
    }

    /// Create an account; the password is stored only as a salted hash
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyUsernameOrPassword);
        }

        let password_hash = password::hash_password(password)?;
        let user = self.users.create_user(username, password_hash).await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            // Same Argon2 work as a real account, so timing does not reveal usernames
            password::verify_password(password, &self.dummy_hash);
            return Err(AuthError::InvalidCredentials);
        };

        if self.verify(&user, password) {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn verify(&self, user: &User, password: &str) -> bool {
        password::verify_password(password, &user.password_hash)
    }

    pub async fn user(&self, user_id: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_user(user_id).await?)
    }
}
