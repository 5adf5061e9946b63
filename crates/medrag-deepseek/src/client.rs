//! DeepSeek chat client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use medrag_core::{ChatConfig, ChatLlm, ChatMessage, Error, Result};

use crate::config::DeepSeekConfig;

/// DeepSeek chat-completions client
///
/// Talks the OpenAI-style `/chat/completions` API that DeepSeek exposes.
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl DeepSeekClient {
    /// Create a new DeepSeek client from configuration
    pub fn new(config: DeepSeekConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new DeepSeek client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = DeepSeekConfig::from_env()?;
        Self::new(config)
    }

    /// Perform the actual chat-completion request
    async fn perform_chat(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<String> {
        let request_body = ChatRequest {
            model: &config.model_id,
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.api_url);
        tracing::debug!(model = %config.model_id, temperature = config.temperature, "chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::LlmProvider(format!(
                "DeepSeek API request failed with status {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Error::LlmProvider(
                "Empty response from DeepSeek API".to_string(),
            ));
        }

        Ok(content)
    }
}

#[async_trait]
impl ChatLlm for DeepSeekClient {
    async fn chat(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<String> {
        let chat_future = self.perform_chat(messages, config);

        match timeout(config.timeout, chat_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Request timed out".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrag_core::ChatRole;

    #[test]
    fn chat_request_serializes_openai_shape() {
        let messages = vec![
            ChatMessage::system("You are a router."),
            ChatMessage::user("How many patients have diabetes?"),
        ];
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "deepseek-chat");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn chat_response_reads_first_choice() {
        let raw = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "hello" } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices.into_iter().next().unwrap().message.content,
            Some("hello".to_string())
        );
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let msg = ChatMessage {
            role: ChatRole::Assistant,
            content: "ok".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
    }
}
