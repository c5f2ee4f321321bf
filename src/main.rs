//! Liaotian - minimal authenticated web chat
//!
//! Users register, log in and hold conversations with an assistant whose
//! replies come from a pluggable provider. Accounts, sessions and
//! conversations live in memory and are gone after a restart.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod conversation;
mod providers;
mod routes;
mod store;
mod views;

use auth::{Credentials, SessionSigner, SessionStore};
use config::{ChatPrompts, Config};
use providers::ReplyGenerator;
use store::{ConversationRepository, InMemoryStore};

/// Demo account created at startup unless `SEED_DEMO_USER` is off
const DEMO_USERNAME: &str = "testuser";
const DEMO_PASSWORD: &str = "testpass";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<Credentials>,
    pub sessions: Arc<SessionStore>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub replies: Arc<dyn ReplyGenerator>,
    pub prompts: Arc<ChatPrompts>,
}

impl AppState {
    /// Wire every component against a fresh in-memory store
    pub async fn in_memory(config: &Config, prompts: &ChatPrompts) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        let credentials = Credentials::new(store.clone())?;

        if config.seed_demo_user {
            credentials.register(DEMO_USERNAME, DEMO_PASSWORD).await?;
            tracing::info!(
                "👤 Seeded demo account {} ({} account(s))",
                DEMO_USERNAME,
                store.user_count().await
            );
        }

        Ok(Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(SessionStore::new(SessionSigner::new(&config.secret_key)?)),
            conversations: store,
            replies: providers::from_config(config, prompts)?,
            prompts: Arc::new(prompts.clone()),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liaotian=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; sessions are signed with the development key");
    }

    let prompts = config.load_prompts().await?;
    tracing::info!(
        "💬 Reply provider: {} ({} suggestion(s))",
        config.reply_provider,
        prompts.suggestions.questions.len()
    );

    let state = AppState::in_memory(&config, &prompts).await?;

    let app = Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("🔥 Liaotian running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
