//! Canned replies that echo the prompt back

use async_trait::async_trait;
use chrono::Utc;

use crate::conversation::Reply;

use super::{ProviderError, ReplyGenerator};

/// Placeholder in the reply template replaced by the prompt
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

pub struct StubProvider {
    template: String,
}

impl StubProvider {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, prompt: &str) -> String {
        self.template.replace(PROMPT_PLACEHOLDER, prompt)
    }
}

#[async_trait]
impl ReplyGenerator for StubProvider {
    async fn generate(&self, prompt: &str) -> Result<Reply, ProviderError> {
        Ok(Reply {
            content: self.render(prompt),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply_echoes_prompt() {
        let provider = StubProvider::new("You said '{prompt}'.");
        let reply = provider.generate("Hello").await.unwrap();
        assert_eq!(reply.content, "You said 'Hello'.");
    }

    #[test]
    fn test_render_is_pure() {
        let provider = StubProvider::new("Echo: {prompt} / {prompt}");
        assert_eq!(provider.render("hi"), "Echo: hi / hi");
        assert_eq!(provider.render("hi"), provider.render("hi"));
    }

    #[test]
    fn test_template_without_placeholder() {
        let provider = StubProvider::new("Always the same");
        assert_eq!(provider.render("anything"), "Always the same");
    }
}
