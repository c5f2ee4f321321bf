//! Reply template and prompt suggestions
//!
//! Loaded from an optional TOML file; every section falls back to the
//! built-in text.
//!
//! # Example Prompts File
//!
//! ```toml
//! [reply]
//! template = "Mock answer to '{prompt}'."
//!
//! [suggestions]
//! questions = ["How can I be more productive?", "Explain quantum computing"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Chat page text that can be customised per deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatPrompts {
    #[serde(default)]
    pub reply: ReplyTemplate,

    #[serde(default)]
    pub suggestions: Suggestions,
}

/// Text of the stubbed assistant reply; `{prompt}` is replaced by the prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyTemplate {
    pub template: String,
}

impl Default for ReplyTemplate {
    fn default() -> Self {
        Self {
            template: builtin::REPLY_TEMPLATE.to_string(),
        }
    }
}

/// Prompts offered on an empty chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub questions: Vec<String>,
}

impl Default for Suggestions {
    fn default() -> Self {
        Self {
            questions: builtin::SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChatPrompts {
    /// Load prompts from a TOML file
    pub async fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    /// Parse prompts from a TOML string
    pub fn parse(content: &str) -> Result<Self, PromptError> {
        toml::from_str(content).map_err(|e| PromptError::ParseError(e.to_string()))
    }
}

/// Errors from prompt loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Built-in text used when no prompts file is configured
pub mod builtin {
    pub const REPLY_TEMPLATE: &str = "This is a simulated reply to '{prompt}'. In a real deployment this is where the DeepSeek R1 API would be called.";

    pub const SUGGESTIONS: &[&str] = &[
        "How can I be more productive at work?",
        "Explain the basic concepts of quantum computing",
        "Write a template for a resignation letter",
    ];
}
