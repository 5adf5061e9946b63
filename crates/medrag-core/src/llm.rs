//! Chat LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub model_id: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model_id: "deepseek-chat".to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ChatConfig {
    /// Deterministic configuration for routing decisions
    pub fn deterministic(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            temperature: 0.0,
            ..Default::default()
        }
    }

    /// Creative configuration for free-text answers
    pub fn creative(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            temperature: 1.0,
            ..Default::default()
        }
    }
}

/// Trait for chat-completion LLM providers (e.g. DeepSeek, OpenAI, etc.)
///
/// This trait defines the interface for interacting with chat language
/// models. Implementations send the message list as-is and return the text
/// content of the first choice.
#[async_trait]
pub trait ChatLlm: Send + Sync {
    /// Run a chat completion and return the assistant's text content
    async fn chat(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<String>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
