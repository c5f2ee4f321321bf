//! Assistant reply providers

mod stub;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ChatPrompts, Config};
use crate::conversation::Reply;

pub use stub::StubProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Produces the assistant's answer to a prompt
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Reply, ProviderError>;
}

/// Build the reply generator named by `config.reply_provider`
pub fn from_config(
    config: &Config,
    prompts: &ChatPrompts,
) -> Result<Arc<dyn ReplyGenerator>, ProviderError> {
    match config.reply_provider.to_lowercase().as_str() {
        "stub" => {
            if config.deepseek_api_key.is_some() {
                tracing::info!(
                    "DEEPSEEK_API_KEY is set but replies are stubbed; {} is not called",
                    config.deepseek_api_url
                );
            }
            Ok(Arc::new(StubProvider::new(prompts.reply.template.clone())))
        }
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_is_the_default() {
        let provider = from_config(&Config::default(), &ChatPrompts::default()).unwrap();
        let reply = provider.generate("Hello").await.unwrap();
        assert!(reply.content.contains("Hello"));
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let config = Config {
            reply_provider: "STUB".into(),
            ..Config::default()
        };
        assert!(from_config(&config, &ChatPrompts::default()).is_ok());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = Config {
            reply_provider: "deepseek".into(),
            ..Config::default()
        };
        let err = from_config(&config, &ChatPrompts::default()).err().unwrap();
        assert!(matches!(err, ProviderError::UnknownProvider(ref name) if name == "deepseek"));
    }
}
