//! Application configuration

pub mod prompts;

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use prompts::{ChatPrompts, PromptError};

/// Session key used when `SECRET_KEY` is not set; only fit for development
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";

pub const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    /// Reserved for a real DeepSeek integration
    pub deepseek_api_key: Option<String>,
    pub deepseek_api_url: String,
    pub reply_provider: String,
    pub prompts_file: Option<PathBuf>,
    pub seed_demo_user: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            secret_key: DEFAULT_SECRET_KEY.into(),
            deepseek_api_key: None,
            deepseek_api_url: DEFAULT_DEEPSEEK_API_URL.into(),
            reply_provider: "stub".into(),
            prompts_file: None,
            seed_demo_user: true,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(p) => p
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", p, e))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            secret_key: env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            deepseek_api_key: env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty()),
            deepseek_api_url: env::var("DEEPSEEK_API_URL").unwrap_or(defaults.deepseek_api_url),
            reply_provider: env::var("REPLY_PROVIDER").unwrap_or(defaults.reply_provider),
            prompts_file: env::var("CHAT_PROMPTS_FILE").ok().map(PathBuf::from),
            seed_demo_user: env::var("SEED_DEMO_USER")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.seed_demo_user),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Prompts from `prompts_file`, or the built-in ones
    pub async fn load_prompts(&self) -> Result<ChatPrompts, PromptError> {
        match &self.prompts_file {
            Some(path) => ChatPrompts::load_from_file(path).await,
            None => Ok(ChatPrompts::default()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
