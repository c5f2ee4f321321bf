//! Server-side login sessions carried in a signed cookie
//!
//! The cookie holds `<session id>.<hex HMAC-SHA256 of the id>`. The signature
//! only proves the id was issued by this process; whether the session is
//! still live is decided by the in-memory table.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "liaotian_session";

/// How long a session stays valid after login
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid session signing key: {0}")]
    InvalidKey(String),
}

/// A live session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Signs and checks session ids with the configured secret
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Result<Self, SessionError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| SessionError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Cookie value for a session id
    pub fn sign(&self, id: &Uuid) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.to_string().as_bytes());
        format!("{}.{}", id, hex::encode(mac.finalize().into_bytes()))
    }

    /// Recover the session id from a cookie value if the signature holds
    pub fn verify(&self, value: &str) -> Option<Uuid> {
        let (id, signature) = value.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Uuid::parse_str(id).ok()
    }
}

impl Session {
    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// Table of live sessions
pub struct SessionStore {
    signer: SessionSigner,
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(signer: SessionSigner) -> Self {
        Self::with_ttl(signer, Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn with_ttl(signer: SessionSigner, ttl: Duration) -> Self {
        Self {
            signer,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session for a user and return the signed cookie value.
    /// Expired sessions are dropped on the way.
    pub async fn create(&self, user_id: &str) -> String {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            created_at: now,
        };
        let value = self.signer.sign(&session.id);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        if sessions.len() < before {
            tracing::debug!("Pruned {} expired session(s)", before - sessions.len());
        }
        sessions.insert(session.id, session);

        value
    }

    /// Look up the live session behind a cookie value
    pub async fn resolve(&self, value: &str) -> Option<Session> {
        let id = self.signer.verify(value)?;
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| !s.is_expired(self.ttl, Utc::now()))
            .cloned()
    }

    pub async fn revoke(&self, id: &Uuid) {
        self.sessions.write().await.remove(id);
    }

    pub async fn active(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Find a cookie value in the request headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value storing `value` for the rest of the browser session
pub fn set_cookie(name: &str, value: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", name, value)
}

/// `Set-Cookie` value that deletes the cookie
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}
